use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_MAX_ADDRESSES;
use crate::constants::DEFAULT_MAX_ADDRESSES_CEILING;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Distinct addresses whose history is fetched per build.
    pub max_addresses: usize,
    /// Upper limit for per-request `max_addresses` overrides.
    pub max_addresses_ceiling: usize,
    pub build_deadline_ms: u64,
    pub max_retries: usize,
    pub base_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_addresses: DEFAULT_MAX_ADDRESSES,
            max_addresses_ceiling: DEFAULT_MAX_ADDRESSES_CEILING,
            build_deadline_ms: 30_000,
            max_retries: 2,
            base_retry_delay_ms: 250,
            max_retry_delay_ms: 5_000,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_addresses == 0 {
            return Err(ConfigError::InvalidValue {
                field: "graph.max_addresses",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.build_deadline_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "graph.build_deadline_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_addresses > self.max_addresses_ceiling {
            return Err(ConfigError::InvalidValue {
                field: "graph.max_addresses",
                reason: format!("exceeds max_addresses_ceiling ({})", self.max_addresses_ceiling),
            });
        }
        Ok(())
    }

    /// Clamp a per-request bound into `[1, max_addresses_ceiling]`.
    pub fn clamp_bound(
        &self,
        requested: Option<usize>,
    ) -> usize {
        requested
            .unwrap_or(self.max_addresses)
            .clamp(1, self.max_addresses_ceiling.max(1))
    }
}
