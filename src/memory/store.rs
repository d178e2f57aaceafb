//! Cache Store Module
//!
//! Concurrency-safe byte store with TTL expiration. Expired entries are
//! evicted lazily on access; the background reaper sweeps the rest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::memory::Entry;

// == Store ==
/// Key-to-entry container shared by callers and the reaper.
///
/// Reads and writes are safe from any number of threads without
/// caller-side locking; cloning is cheap and clones share the same
/// underlying map. Store operations never fail; errors only arise in
/// the serializer layer above it.
#[derive(Debug, Clone, Default)]
pub struct Store {
    items: Arc<DashMap<String, Entry>>,
}

impl Store {
    // == Constructor ==
    /// Creates an empty store with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Shared handle to the underlying map, for the counter view and the
    /// driver's native-resource accessor.
    pub(crate) fn items(&self) -> &Arc<DashMap<String, Entry>> {
        &self.items
    }

    // == Get ==
    /// Returns the payload at `key`, or None when absent or expired.
    ///
    /// An expired entry is removed in the same call. The removal
    /// re-checks expiry under the key's write lock so a concurrent
    /// overwrite is never deleted by mistake.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.items.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.items.remove_if(key, |_, e| e.is_expired());
            return None;
        }
        Some(entry.payload().to_vec())
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// Each call resets the expiry clock to `now + ttl`; a zero ttl keeps
    /// the entry forever.
    pub fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) {
        self.items.insert(key.to_string(), Entry::new(payload, ttl));
    }

    // == Delete ==
    /// Removes `key`; absent keys are a no-op.
    pub fn delete(&self, key: &str) {
        self.items.remove(key);
    }

    // == Exists ==
    /// Reports whether `key` holds a live entry, evicting it when it
    /// turns out to be expired.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Touch ==
    /// Refreshes the expiry of `key` to `now + ttl` without touching the
    /// payload. An expired entry is evicted instead; an absent key is a
    /// no-op.
    pub fn touch(&self, key: &str, ttl: Duration) {
        if let Some(mut entry) = self.items.get_mut(key) {
            if entry.is_expired() {
                drop(entry);
                self.items.remove_if(key, |_, e| e.is_expired());
                return;
            }
            entry.refresh(ttl);
        }
    }

    // == Clean ==
    /// Empties the container. Concurrent readers observe each key either
    /// before or after the clean, never in between.
    pub fn clean(&self) {
        self.items.clear();
    }

    // == Sweep ==
    /// Removes every entry expired as of the scan's reference time.
    ///
    /// Returns the number of entries removed. Used by the reaper;
    /// redundant with lazy eviction but bounds memory held by entries
    /// nobody reads again.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.items.len();
        self.items.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(self.items.len())
    }

    // == Length ==
    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
