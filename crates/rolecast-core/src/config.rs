//! Core configuration

use serde::{Deserialize, Serialize};

/// Tunables for contexts, followers, and dispensers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Bound on notifications a follower buffers while offline
    pub follower_capacity: usize,
    /// Candy units loaded into a new dispenser
    pub initial_stock: u64,
    /// `tracing` filter directive installed at the composition root
    pub log_filter: String,
}

impl CoreConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a follower buffer bound
    #[inline]
    #[must_use]
    pub fn with_follower_capacity(mut self, capacity: usize) -> Self {
        self.follower_capacity = capacity;
        self
    }

    /// With an initial dispenser stock
    #[inline]
    #[must_use]
    pub fn with_initial_stock(mut self, stock: u64) -> Self {
        self.initial_stock = stock;
        self
    }

    /// With a tracing filter directive
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            follower_capacity: rolecast_notify::DEFAULT_CAPACITY,
            initial_stock: 1,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stock_is_one() {
        let config = CoreConfig::new();
        assert_eq!(config.initial_stock, 1);
        assert_eq!(config.follower_capacity, rolecast_notify::DEFAULT_CAPACITY);
    }

    #[test]
    fn builder_overrides() {
        let config = CoreConfig::new()
            .with_follower_capacity(8)
            .with_initial_stock(12)
            .with_log_filter("debug");

        assert_eq!(config.follower_capacity, 8);
        assert_eq!(config.initial_stock, 12);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = CoreConfig::new().with_initial_stock(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: CoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
