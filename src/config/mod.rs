pub mod graph;
pub mod log;
pub mod server;
pub mod upstream;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use toml;

pub use graph::GraphConfig;
pub use log::LoggingConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub graph: GraphConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.graph.validate()?;
        self.upstream.validate()?;
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let config_str = std::fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}
