// Configuration management with layered configuration (file, env)

use crate::schedule;
use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    pub reminder: ReminderConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// API host, overridable so tests can point at a local mock server
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub token: String,
    pub chat_id: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Consecutive days an afternoon event is reminded before the category resets
    pub max_remind_days: i32,
    /// IANA zone name the wall clock is evaluated in
    pub timezone: Tz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment-specific configuration
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        // Validate database config
        if self.database.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }

        // Validate Telegram config
        if self.telegram.api_base.is_empty() {
            return Err("Telegram api_base cannot be empty".to_string());
        }
        if self.telegram.token.is_empty() {
            return Err("Telegram token cannot be empty".to_string());
        }
        if self.telegram.chat_id.is_empty() {
            return Err("Telegram chat_id cannot be empty".to_string());
        }

        // Validate reminder config
        if self.reminder.max_remind_days < 1 {
            return Err("Reminder max_remind_days must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/reminders".to_string(),
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 30,
            },
            telegram: TelegramConfig {
                api_base: default_api_base(),
                token: String::new(),
                chat_id: String::new(),
                request_timeout_seconds: default_request_timeout(),
            },
            reminder: ReminderConfig {
                max_remind_days: 3,
                timezone: schedule::default_timezone(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}
