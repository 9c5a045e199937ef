use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::constants::DEFAULT_BLOCKSCOUT_URL;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub rate_limit: usize, // requests per second, 0 = unlimited
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BLOCKSCOUT_URL.to_string(),
            request_timeout_ms: 10_000,
            rate_limit: 5,
            user_agent: concat!("address-graph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "upstream.base_url",
            reason: e.to_string(),
        })?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upstream.request_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
