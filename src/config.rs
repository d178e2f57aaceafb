//! Configuration Module
//!
//! Construction parameters for the in-memory driver.

use std::time::Duration;

/// Construction parameters for [`Memory`](crate::Memory).
///
/// The reaper is opt-in: without a sweep interval the driver relies on
/// lazy eviction alone, which is correct but lets entries nobody reads
/// again occupy memory until they are swept by hand.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Interval between background sweeps, None = reaper disabled
    pub sweep_interval: Option<Duration>,
    /// Initial capacity of the underlying map
    pub initial_capacity: usize,
}

impl MemoryConfig {
    /// Creates a config with the reaper disabled and default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the background reaper with the given sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Sets the initial capacity of the underlying map.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            sweep_interval: None,
            initial_capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MemoryConfig::default();
        assert!(config.sweep_interval.is_none());
        assert_eq!(config.initial_capacity, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = MemoryConfig::new()
            .with_sweep_interval(Duration::from_secs(5))
            .with_initial_capacity(1024);

        assert_eq!(config.sweep_interval, Some(Duration::from_secs(5)));
        assert_eq!(config.initial_capacity, 1024);
    }
}
