//! Value Serialization Module
//!
//! Converts stored values to and from the byte payloads drivers keep.
//! Every type takes exactly one codec path, picked once per type in
//! priority order:
//!
//! 1. a custom binary codec ([`BinaryCodec`]), the fastest option and the
//!    only one that can cover state the structural encoder cannot see;
//! 2. a custom text codec ([`TextCodec`]);
//! 3. the generic structural encoder (serde, JSON representation).
//!
//! The [`impl_cache_value!`] macro wires a type to its path. Because the
//! path is fixed per type, a payload is always decoded by the same codec
//! that produced it; the paths are not cross-compatible and are not meant
//! to be.
//!
//! Primitive integers, `String`, `Vec<u8>`, `bool` and
//! `chrono::DateTime<Utc>` ship with fixed fast-path representations
//! (decimal text, raw bytes, `"true"`/`"false"`, RFC 3339) instead of going
//! through the structural encoder. The decimal representation is the same
//! one counters use, so an integer written by `set` can be read back
//! through a counter and vice versa.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SerializeError;

// == Capability Traits ==
/// Custom cache-specific binary codec, the highest-priority path.
///
/// Implement this when the structural encoder is too slow or cannot
/// express the type (for example state that `Serialize` skips).
pub trait BinaryCodec: Sized {
    /// Encodes the value into its stored byte form.
    fn encode_cache(&self) -> std::result::Result<Vec<u8>, SerializeError>;

    /// Decodes a value previously produced by [`BinaryCodec::encode_cache`].
    fn decode_cache(raw: &[u8]) -> std::result::Result<Self, SerializeError>;
}

/// Custom text codec, checked after [`BinaryCodec`].
pub trait TextCodec: Sized {
    /// Encodes the value into text.
    fn encode_text(&self) -> std::result::Result<String, SerializeError>;

    /// Decodes a value previously produced by [`TextCodec::encode_text`].
    fn decode_text(text: &str) -> std::result::Result<Self, SerializeError>;
}

// == Cache Value ==
/// A value that can cross the byte boundary into a cache driver.
///
/// This is the only trait drivers and the [`Cache`](crate::Cache) facade
/// see. Use [`impl_cache_value!`] to wire a type to one of the codec
/// paths; primitives and timestamps already have fast-path
/// implementations.
pub trait CacheValue: Sized {
    /// Encodes the value for storage.
    fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError>;

    /// Decodes a stored payload back into the value.
    fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError>;
}

// == Structural Encoder ==
/// Encodes through the generic structural path (serde).
///
/// Only state exposed by the type's `Serialize` implementation makes it
/// into the payload: a `#[serde(skip)]` field is dropped on encode and
/// comes back as its default on decode. That loss is part of the contract
/// of this path, not something callers should expect to round-trip.
pub fn encode_structural<T: Serialize>(
    value: &T,
) -> std::result::Result<Vec<u8>, SerializeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes a payload produced by [`encode_structural`].
pub fn decode_structural<T: DeserializeOwned>(
    raw: &[u8],
) -> std::result::Result<T, SerializeError> {
    Ok(serde_json::from_slice(raw)?)
}

// == Strategy Macro ==
/// Wires a type into the serializer on exactly one codec path.
///
/// The path tag is resolved once per type and mirrors the priority order
/// of the capability traits:
///
/// ```ignore
/// impl_cache_value!(binary: Fingerprint);      // uses its BinaryCodec impl
/// impl_cache_value!(text: Hostname);           // uses its TextCodec impl
/// impl_cache_value!(structural: UserProfile);  // serde round-trip
/// ```
#[macro_export]
macro_rules! impl_cache_value {
    (binary: $($ty:ty),+ $(,)?) => {$(
        impl $crate::serialize::CacheValue for $ty {
            fn encode(&self) -> std::result::Result<Vec<u8>, $crate::SerializeError> {
                $crate::serialize::BinaryCodec::encode_cache(self)
            }

            fn decode(raw: &[u8]) -> std::result::Result<Self, $crate::SerializeError> {
                <$ty as $crate::serialize::BinaryCodec>::decode_cache(raw)
            }
        }
    )+};
    (text: $($ty:ty),+ $(,)?) => {$(
        impl $crate::serialize::CacheValue for $ty {
            fn encode(&self) -> std::result::Result<Vec<u8>, $crate::SerializeError> {
                $crate::serialize::TextCodec::encode_text(self).map(String::into_bytes)
            }

            fn decode(raw: &[u8]) -> std::result::Result<Self, $crate::SerializeError> {
                let text = std::str::from_utf8(raw).map_err(|e| {
                    $crate::SerializeError::Decode(format!("payload is not utf-8: {e}"))
                })?;
                <$ty as $crate::serialize::TextCodec>::decode_text(text)
            }
        }
    )+};
    (structural: $($ty:ty),+ $(,)?) => {$(
        impl $crate::serialize::CacheValue for $ty {
            fn encode(&self) -> std::result::Result<Vec<u8>, $crate::SerializeError> {
                $crate::serialize::encode_structural(self)
            }

            fn decode(raw: &[u8]) -> std::result::Result<Self, $crate::SerializeError> {
                $crate::serialize::decode_structural(raw)
            }
        }
    )+};
}

// == Fast Paths ==
// Integers store their ASCII decimal form, matching the counter payload
// representation.
macro_rules! impl_decimal_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl CacheValue for $ty {
            fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError> {
                Ok(self.to_string().into_bytes())
            }

            fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError> {
                let text = std::str::from_utf8(raw).map_err(|e| {
                    SerializeError::Decode(format!("payload is not utf-8: {e}"))
                })?;
                text.parse::<$ty>().map_err(|e| {
                    SerializeError::Decode(format!(
                        "{text:?} is not {}: {e}",
                        stringify!($ty)
                    ))
                })
            }
        }
    )+};
}

impl_decimal_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl CacheValue for String {
    fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError> {
        Ok(self.clone().into_bytes())
    }

    fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError> {
        String::from_utf8(raw.to_vec())
            .map_err(|e| SerializeError::Decode(format!("payload is not utf-8: {e}")))
    }
}

impl CacheValue for Vec<u8> {
    fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError> {
        Ok(self.clone())
    }

    fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError> {
        Ok(raw.to_vec())
    }
}

impl CacheValue for bool {
    fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError> {
        Ok(if *self { b"true".to_vec() } else { b"false".to_vec() })
    }

    fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError> {
        match std::str::from_utf8(raw) {
            Ok("true") => Ok(true),
            Ok("false") => Ok(false),
            _ => Err(SerializeError::Decode(format!(
                "{:?} is not a bool payload",
                String::from_utf8_lossy(raw)
            ))),
        }
    }
}

impl CacheValue for DateTime<Utc> {
    fn encode(&self) -> std::result::Result<Vec<u8>, SerializeError> {
        Ok(self
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .into_bytes())
    }

    fn decode(raw: &[u8]) -> std::result::Result<Self, SerializeError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| SerializeError::Decode(format!("payload is not utf-8: {e}")))?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| SerializeError::Decode(format!("{text:?} is not rfc3339: {e}")))
    }
}
