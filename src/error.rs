//! Error types for the cache abstraction
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type shared by every cache driver.
///
/// `Miss` is the only kind callers are expected to branch on
/// programmatically; check it with [`CacheError::is_miss`] or by pattern
/// matching, never by comparing display strings.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, or present but already expired
    #[error("cache miss: {0}")]
    Miss(String),

    /// Stored payload is incompatible with the requested type
    #[error("type mismatch for key {key}: {reason}")]
    TypeMismatch {
        /// Key whose payload failed to convert
        key: String,
        /// What the conversion expected and found
        reason: String,
    },

    /// Encode or decode failure in the serializer layer
    #[error("serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    /// Backend rejected the key format (never raised by the memory driver)
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl CacheError {
    /// Returns true for the cache-miss kind.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }

    pub(crate) fn miss(key: &str) -> Self {
        CacheError::Miss(key.to_string())
    }

    pub(crate) fn type_mismatch(key: &str, reason: impl Into<String>) -> Self {
        CacheError::TypeMismatch {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// == Serialize Error Enum ==
/// Failure inside a codec path, kept separate so drivers can wrap it.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Value could not be encoded by its codec
    #[error("encode: {0}")]
    Encode(String),

    /// Stored bytes could not be decoded into the target type
    #[error("decode: {0}")]
    Decode(String),

    /// Structural encoder failure
    #[error(transparent)]
    Structural(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_miss() {
        assert!(CacheError::miss("k1").is_miss());
        assert!(!CacheError::type_mismatch("k1", "not a number").is_miss());
        assert!(!CacheError::InvalidKey("a b".to_string()).is_miss());
    }

    #[test]
    fn test_display_contains_key() {
        let err = CacheError::miss("user:1");
        assert!(err.to_string().contains("user:1"));

        let err = CacheError::type_mismatch("hits", "payload is not decimal");
        let text = err.to_string();
        assert!(text.contains("hits"));
        assert!(text.contains("payload is not decimal"));
    }

    #[test]
    fn test_serialize_error_wraps() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = CacheError::from(SerializeError::from(json_err));
        assert!(matches!(err, CacheError::Serialize(_)));
    }
}
