//! Counter Module
//!
//! Atomic u64 counters layered over the same keyspace as the byte store.
//!
//! A counter's payload is the ASCII decimal text of its value, which is
//! also the fast-path representation for integers, so `set(key, 7u64, ..)`
//! and a counter on `key` read each other. A counter key read through a
//! structural-codec type will not decode; the two views deliberately keep
//! their own encodings.

use std::time::Duration;

use dashmap::mapref::entry::Entry as MapEntry;

use crate::driver::Counter;
use crate::error::{CacheError, Result};
use crate::memory::{Entry, Store};

// == Decimal Payload ==
fn format_value(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn parse_value(key: &str, payload: &[u8]) -> Result<u64> {
    std::str::from_utf8(payload)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| {
            CacheError::type_mismatch(
                key,
                format!(
                    "counter payload is not decimal text: {:?}",
                    String::from_utf8_lossy(payload)
                ),
            )
        })
}

// == Memory Counter ==
/// Counter handle bound to one key of a [`Store`].
///
/// Every read-modify-write runs under the map's per-key entry lock, so
/// concurrent mutations through any number of handles on the same key
/// never lose an update.
#[derive(Debug)]
pub struct MemoryCounter {
    store: Store,
    key: String,
    ttl: Duration,
}

impl MemoryCounter {
    // == Open ==
    /// Opens the counter at `key`, initializing an absent (or expired)
    /// key to zero with `ttl`.
    ///
    /// Returns the current value, the handle, and whether the key already
    /// held a live counter.
    pub(crate) fn open(store: Store, key: &str, ttl: Duration) -> Result<(u64, Self, bool)> {
        let (value, existed) = match store.items().entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(Entry::new(format_value(0), ttl));
                    (0, false)
                } else {
                    (parse_value(key, occupied.get().payload())?, true)
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::new(format_value(0), ttl));
                (0, false)
            }
        };

        let counter = Self {
            store,
            key: key.to_string(),
            ttl,
        };
        Ok((value, counter, existed))
    }
}

impl Counter for MemoryCounter {
    fn apply(&self, delta: i64) -> Result<u64> {
        match self.store.items().entry(self.key.clone()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.remove();
                    return Err(CacheError::miss(&self.key));
                }

                let current = parse_value(&self.key, occupied.get().payload())?;
                if delta == 0 {
                    return Ok(current);
                }

                let next = if delta > 0 {
                    current.saturating_add(delta as u64)
                } else {
                    current.saturating_sub(delta.unsigned_abs())
                };

                // A write refreshes the expiry from the counter's ttl.
                occupied.insert(Entry::new(format_value(next), self.ttl));
                Ok(next)
            }
            MapEntry::Vacant(_) => Err(CacheError::miss(&self.key)),
        }
    }

    fn value(&self) -> Result<u64> {
        let payload = self
            .store
            .get(&self.key)
            .ok_or_else(|| CacheError::miss(&self.key))?;
        parse_value(&self.key, &payload)
    }

    fn delete(&self) -> Result<()> {
        self.store.delete(&self.key);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::thread::sleep;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_counter_initializes_to_zero() {
        let store = Store::default();

        let (value, counter, existed) = MemoryCounter::open(store.clone(), "hits", MINUTE).unwrap();

        assert_eq!(value, 0);
        assert!(!existed);
        assert_eq!(counter.value().unwrap(), 0);
        // The zero is visible in the store as decimal text.
        assert_eq!(store.get("hits"), Some(b"0".to_vec()));
    }

    #[test]
    fn test_counter_reopens_existing_value() {
        let store = Store::default();

        let (_, counter, _) = MemoryCounter::open(store.clone(), "hits", MINUTE).unwrap();
        counter.apply(5).unwrap();

        let (value, _, existed) = MemoryCounter::open(store, "hits", MINUTE).unwrap();
        assert_eq!(value, 5);
        assert!(existed);
    }

    #[test]
    fn test_counter_reinitializes_expired_key() {
        let store = Store::default();

        store.set("hits", b"42".to_vec(), Duration::from_millis(20));
        sleep(Duration::from_millis(40));

        let (value, _, existed) = MemoryCounter::open(store, "hits", MINUTE).unwrap();
        assert_eq!(value, 0);
        assert!(!existed);
    }

    #[test]
    fn test_counter_rejects_non_numeric_payload() {
        let store = Store::default();
        store.set("hits", b"not a number".to_vec(), MINUTE);

        let err = MemoryCounter::open(store, "hits", MINUTE).unwrap_err();
        assert!(matches!(err, CacheError::TypeMismatch { .. }));
        assert!(!err.is_miss());
    }

    #[test]
    fn test_apply_increments_and_decrements() {
        let store = Store::default();
        let (_, counter, _) = MemoryCounter::open(store, "hits", MINUTE).unwrap();

        assert_eq!(counter.apply(5).unwrap(), 5);
        assert_eq!(counter.apply(-3).unwrap(), 2);
        assert_eq!(counter.apply(0).unwrap(), 2);
        assert_eq!(counter.value().unwrap(), 2);
    }

    #[test]
    fn test_apply_decrement_saturates_at_zero() {
        let store = Store::default();
        let (_, counter, _) = MemoryCounter::open(store, "hits", MINUTE).unwrap();

        assert_eq!(counter.apply(-5).unwrap(), 0);

        counter.apply(3).unwrap();
        assert_eq!(counter.apply(-100).unwrap(), 0);
    }

    #[test]
    fn test_apply_increment_saturates_at_max() {
        let store = Store::default();
        store.set("hits", u64::MAX.to_string().into_bytes(), MINUTE);

        let (value, counter, existed) = MemoryCounter::open(store, "hits", MINUTE).unwrap();
        assert_eq!(value, u64::MAX);
        assert!(existed);
        assert_eq!(counter.apply(1).unwrap(), u64::MAX);
    }

    #[test]
    fn test_apply_after_delete_is_a_miss() {
        let store = Store::default();
        let (_, counter, _) = MemoryCounter::open(store.clone(), "hits", MINUTE).unwrap();

        counter.delete().unwrap();
        assert!(!store.exists("hits"));

        assert!(counter.apply(1).unwrap_err().is_miss());
        assert!(counter.apply(-1).unwrap_err().is_miss());
        assert!(counter.apply(0).unwrap_err().is_miss());
        assert!(counter.value().unwrap_err().is_miss());

        // Deleting again stays Ok.
        counter.delete().unwrap();
    }

    #[test]
    fn test_apply_write_refreshes_expiry() {
        let store = Store::default();
        let (_, counter, _) =
            MemoryCounter::open(store.clone(), "hits", Duration::from_millis(60)).unwrap();

        sleep(Duration::from_millis(30));
        counter.apply(1).unwrap();
        sleep(Duration::from_millis(40));

        // The write at 30ms pushed the deadline out to 90ms.
        assert_eq!(counter.value().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_increments_lose_no_updates() {
        let store = Store::default();
        let (_, counter, _) = MemoryCounter::open(store.clone(), "hits", MINUTE).unwrap();
        let counter = Arc::new(counter);

        let threads: u64 = 8;
        let per_thread: u64 = 200;
        let mut handles = vec![];

        for _ in 0..threads {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..per_thread {
                    counter.apply(1).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().expect("incrementer thread panicked");
        }

        assert_eq!(counter.value().unwrap(), threads * per_thread);
    }

    #[test]
    fn test_concurrent_handles_on_same_key() {
        let store = Store::default();
        let (_, first, _) = MemoryCounter::open(store.clone(), "hits", MINUTE).unwrap();
        let (_, second, _) = MemoryCounter::open(store, "hits", MINUTE).unwrap();

        let first = Arc::new(first);
        let second = Arc::new(second);

        let mut handles = vec![];
        for counter in [Arc::clone(&first), Arc::clone(&second)] {
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    counter.apply(1).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().expect("incrementer thread panicked");
        }

        // Updates through distinct handles must not race each other.
        assert_eq!(first.value().unwrap(), 1000);
    }
}
