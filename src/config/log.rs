use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    // Directory where rolling log files are stored, terminal only when unset
    pub directory: Option<String>,
}
