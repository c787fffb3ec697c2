use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{FeedbackError, Result};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feedback store settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Inference service settings
    pub inference: InferenceConfig,
}

/// Feedback store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file
    pub path: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Optional log file path; console-only when absent
    pub file_path: Option<String>,
    /// Log format: "text" or "json"
    pub format: String,
}

/// Inference service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Endpoint of the hosted 3-label sentiment model
    pub endpoint: String,
    /// Bearer token for the endpoint, if it requires one
    pub api_token: Option<String>,
    /// Client-side timeout for the single inference request
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "data/feedback.db".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            inference: InferenceConfig {
                endpoint:
                    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment"
                        .to_string(),
                api_token: None,
                request_timeout_secs: 30,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config files, and environment
    /// variables, in that precedence order.
    ///
    /// Environment variables use the `FEEDBACK` prefix with `__` as the
    /// nesting separator, e.g. `FEEDBACK_INFERENCE__API_TOKEN`.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("database.path", defaults.database.path)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.connection_timeout_secs",
                defaults.database.connection_timeout_secs as i64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("inference.endpoint", defaults.inference.endpoint)?
            .set_default(
                "inference.request_timeout_secs",
                defaults.inference.request_timeout_secs as i64,
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("FEEDBACK").separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(FeedbackError::InvalidConfig(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(FeedbackError::InvalidConfig(
                "connection_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(FeedbackError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                self.logging.level
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(FeedbackError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {valid_formats:?}",
                self.logging.format
            )));
        }

        if !self.inference.endpoint.starts_with("http") {
            return Err(FeedbackError::InvalidConfig(format!(
                "Invalid inference endpoint: {}",
                self.inference.endpoint
            )));
        }
        if self.inference.request_timeout_secs == 0 {
            return Err(FeedbackError::InvalidConfig(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
