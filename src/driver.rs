//! Driver Contract Module
//!
//! Defines the backend contract every cache driver implements and the
//! typed facade layered on top of it. Drivers move raw byte payloads; the
//! [`Cache`] extension trait runs values through the serializer so the
//! in-memory driver and remote drivers stay interchangeable behind one
//! interface.

use std::any::Any;
use std::time::Duration;

use crate::error::Result;
use crate::serialize::CacheValue;

/// TTL sentinel: an entry stored with this ttl never expires.
pub const FOREVER: Duration = Duration::ZERO;

// == Driver ==
/// Backend contract implemented by every cache driver.
///
/// The trait is object-safe so decorators and callers can hold
/// `Box<dyn Driver>`. Typed access lives in [`Cache`], which is
/// implemented for every driver automatically.
pub trait Driver: Send + Sync {
    /// Fetches the raw payload stored at `key`.
    ///
    /// Fails with the cache-miss kind when the key is absent or expired;
    /// an expired entry is evicted as a side effect of the lookup.
    fn get_raw(&self, key: &str) -> Result<Vec<u8>>;

    /// Stores `payload` under `key`, overwriting any previous entry.
    ///
    /// Every call resets the expiry clock to `now + ttl`; [`FOREVER`]
    /// keeps the entry alive until it is deleted.
    fn set_raw(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Reports whether `key` holds a live entry, with the same lazy
    /// expiration semantics as [`Driver::get_raw`].
    fn exists(&self, key: &str) -> bool;

    /// Refreshes the expiry of `key` to `now + ttl` without touching the
    /// payload. Absent keys are a no-op, not an error.
    fn touch(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Opens the atomic counter stored at `key`.
    ///
    /// An absent key is initialized to zero with `ttl` and reported as
    /// `existed = false`; a live key is parsed and reported as
    /// `existed = true`. A payload that is not decimal text surfaces a
    /// type-mismatch error. Returns the current value, the mutator
    /// handle and the existed flag.
    fn counter(&self, key: &str, ttl: Duration) -> Result<(u64, Box<dyn Counter>, bool)>;

    /// Removes every entry.
    fn clean(&self) -> Result<()>;

    /// Stops background resources owned by the driver.
    ///
    /// Closing never drains stored data; a closed driver still answers
    /// reads. Calling it more than once is allowed.
    fn close(&self) -> Result<()>;

    /// Exposes the underlying native resource for advanced callers.
    ///
    /// The memory driver hands back its concurrent map; remote drivers
    /// would hand back their connection handle. Downcast with
    /// [`Any::downcast_ref`].
    fn native(&self) -> &dyn Any;
}

// == Counter ==
/// Mutator handle for one counter key.
///
/// Obtained from [`Driver::counter`]; the only sanctioned way to mutate a
/// counter value.
pub trait Counter: Send + Sync + std::fmt::Debug {
    /// Applies `delta` atomically and returns the resulting value.
    ///
    /// `0` is a pure read, positive deltas increment, negative deltas
    /// decrement. Decrement saturates at zero and increment at
    /// `u64::MAX`; the value never wraps. Writing deltas refresh the
    /// entry's expiry from the counter's ttl, a pure read does not.
    /// Concurrent calls against the same key never lose an update.
    fn apply(&self, delta: i64) -> Result<u64>;

    /// Reads the current value without mutating it.
    ///
    /// Fails with a cache miss if the key has been deleted meanwhile.
    fn value(&self) -> Result<u64>;

    /// Removes the counter key. Deleting an absent counter is Ok.
    fn delete(&self) -> Result<()>;
}

// == Cache Facade ==
/// Typed access over any [`Driver`], routing values through the
/// serializer.
pub trait Cache: Driver {
    /// Decodes the entry at `key` into `V`.
    fn get<V: CacheValue>(&self, key: &str) -> Result<V> {
        let raw = self.get_raw(key)?;
        Ok(V::decode(&raw)?)
    }

    /// Encodes `value` and stores it under `key`.
    fn set<V: CacheValue>(&self, key: &str, value: &V, ttl: Duration) -> Result<()> {
        let raw = value.encode()?;
        self.set_raw(key, raw, ttl)
    }

    /// Returns the entry at `key`, or computes, stores and returns it on
    /// a miss. Errors other than a miss propagate unchanged.
    fn get_or_init<V, F>(&self, key: &str, ttl: Duration, init: F) -> Result<V>
    where
        V: CacheValue,
        F: FnOnce() -> Result<V>,
    {
        match self.get(key) {
            Ok(value) => Ok(value),
            Err(err) if err.is_miss() => {
                let value = init()?;
                self.set(key, &value, ttl)?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }
}

impl<T: Driver + ?Sized> Cache for T {}

// == Pointer Drivers ==
// Shared and boxed handles delegate, so decorators can wrap either a
// driver by value or a handle to one.
impl<T: Driver + ?Sized> Driver for std::sync::Arc<T> {
    fn get_raw(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        (**self).set_raw(key, payload, ttl)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn touch(&self, key: &str, ttl: Duration) -> Result<()> {
        (**self).touch(key, ttl)
    }

    fn counter(&self, key: &str, ttl: Duration) -> Result<(u64, Box<dyn Counter>, bool)> {
        (**self).counter(key, ttl)
    }

    fn clean(&self) -> Result<()> {
        (**self).clean()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn native(&self) -> &dyn Any {
        (**self).native()
    }
}

impl Driver for Box<dyn Driver> {
    fn get_raw(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        (**self).set_raw(key, payload, ttl)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn touch(&self, key: &str, ttl: Duration) -> Result<()> {
        (**self).touch(key, ttl)
    }

    fn counter(&self, key: &str, ttl: Duration) -> Result<(u64, Box<dyn Counter>, bool)> {
        (**self).counter(key, ttl)
    }

    fn clean(&self) -> Result<()> {
        (**self).clean()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn native(&self) -> &dyn Any {
        (**self).native()
    }
}
