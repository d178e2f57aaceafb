//! In-Memory Driver Module
//!
//! Provides the in-process cache driver: a concurrent TTL-aware store,
//! an optional background reaper, and atomic counters over the same
//! keyspace.

mod counter;
mod entry;
mod store;


// Re-export public types
pub use counter::MemoryCounter;
pub use entry::Entry;
pub use store::Store;

use std::any::Any;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::MemoryConfig;
use crate::driver::{Counter, Driver};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_reaper;

// == Reaper Control ==
/// Stop signal and task handle for an owned reaper.
struct ReaperControl {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReaperControl {
    /// Signals the task and aborts it. After this returns no new sweep
    /// starts; an in-flight sweep finishes its scan (sweeps hold no await
    /// points, so the abort cannot cut one short).
    fn stop(&self) {
        let _ = self.shutdown.send(true);
        self.handle.abort();
    }
}

// == Memory Driver ==
/// In-process cache driver.
///
/// Entries live in a concurrent map safe for parallel callers; expired
/// entries are evicted lazily on access and, when configured, actively by
/// a background reaper. Strictly single-process: nothing survives a
/// restart and nothing is shared across processes.
pub struct Memory {
    store: Store,
    reaper: Option<ReaperControl>,
}

impl Memory {
    // == Constructors ==
    /// Creates a driver relying on lazy eviction alone.
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    /// Creates a driver from `config`.
    ///
    /// # Panics
    ///
    /// Panics if a sweep interval is configured and no tokio runtime is
    /// available to spawn the reaper on.
    pub fn with_config(config: MemoryConfig) -> Self {
        let store = Store::with_capacity(config.initial_capacity);

        let reaper = config.sweep_interval.map(|interval| {
            let (shutdown, rx) = watch::channel(false);
            let handle = spawn_reaper(store.clone(), interval, rx);
            ReaperControl { shutdown, handle }
        });

        Self { store, reaper }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for Memory {
    fn get_raw(&self, key: &str) -> Result<Vec<u8>> {
        self.store.get(key).ok_or_else(|| CacheError::miss(key))
    }

    fn set_raw(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        self.store.set(key, payload, ttl);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.store.exists(key)
    }

    fn touch(&self, key: &str, ttl: Duration) -> Result<()> {
        self.store.touch(key, ttl);
        Ok(())
    }

    fn counter(&self, key: &str, ttl: Duration) -> Result<(u64, Box<dyn Counter>, bool)> {
        let (value, counter, existed) = MemoryCounter::open(self.store.clone(), key, ttl)?;
        Ok((value, Box::new(counter), existed))
    }

    fn clean(&self) -> Result<()> {
        self.store.clean();
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if let Some(reaper) = &self.reaper {
            reaper.stop();
            debug!("memory driver closed, reaper stopped");
        }
        Ok(())
    }

    fn native(&self) -> &dyn Any {
        self.store.items()
    }
}

impl Drop for Memory {
    fn drop(&mut self) {
        if let Some(reaper) = &self.reaper {
            reaper.stop();
        }
    }
}
