//! Engine configuration

use crate::decision::CacheConfig;
use std::time::Duration;

/// Behavior knobs for a [`Palisade`](crate::Palisade) instance.
#[derive(Debug, Clone)]
pub struct PalisadeConfig {
    /// Permission node that skips every authorization check.
    pub bypass_permission: String,

    /// Permission node that admits an actor into a full region.
    pub limit_bypass_permission: String,

    /// Decision-cache tuning (TTL and entry bound).
    pub cache: CacheConfig,

    /// Period of the stay notifier's re-announcement tick.
    pub stay_interval: Duration,
}

impl Default for PalisadeConfig {
    fn default() -> Self {
        Self {
            bypass_permission: "palisade.bypass".to_string(),
            limit_bypass_permission: "palisade.bypass.limit".to_string(),
            cache: CacheConfig::default(),
            stay_interval: Duration::from_secs(5),
        }
    }
}
