use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, JsonSchema)]
#[serde(rename_all = "lowercase")]
/// The log level that the server should use
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct AppConfig {
    #[serde(rename = "ApiKeys", default)]
    /// The API keys accepted by the authentication gate
    pub api_keys: Vec<String>,
    /// Basic logging configuration
    pub logging: Option<Logging>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Logging {
    #[serde(default = "default_logging_level")]
    /// The log level that the server should use
    pub level: LogLevel,
}

fn default_logging_level() -> LogLevel {
    LogLevel::INFO
}

/// Reads and parses the config file. The caller decides how to recover from
/// a failure; the server falls back to an empty key list, which rejects every
/// authenticated request.
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&contents)?;

    Ok(config)
}
