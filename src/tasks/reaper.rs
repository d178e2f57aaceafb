//! Reaper Task
//!
//! Background task that periodically sweeps expired entries out of the
//! store, independent of access patterns. Lazy eviction already keeps
//! reads correct on its own; the reaper exists to bound memory held by
//! entries nobody reads again.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memory::Store;

/// Spawns the reaper for `store`, sweeping every `interval`.
///
/// The task stops when `shutdown` flips to true. The flag is re-checked
/// right before every sweep, so once a stop has been signalled no new
/// sweep starts; a sweep that is already running holds no await points
/// and always finishes its scan.
///
/// Must be called from within a tokio runtime.
pub(crate) fn spawn_reaper(
    store: Store,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "reaper started");

        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; wait a full interval instead.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    let removed = store.sweep();
                    if removed > 0 {
                        info!(removed, "reaper swept expired entries");
                    } else {
                        debug!("reaper found no expired entries");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("reaper stopped");
    })
}
