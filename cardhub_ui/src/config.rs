//! Client configuration.
//!
//! Values are read from an optional `config/cardhub.toml` and from environment variables
//! prefixed with `CARDHUB__` (e.g. `CARDHUB__TIMING__SEARCH_DEBOUNCE_MS=500`). Every field has
//! a default, so an empty configuration is valid.

use cardhub::Urls;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error that can occur while loading the configuration or setting up logging.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] config::ConfigError),
    #[error("invalid base URL")]
    Url(#[from] url::ParseError),
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Root client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the catalog server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timing: TimingConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads `config/cardhub.toml` (if present) merged with `CARDHUB__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/cardhub")
    }

    /// Loads the configuration file at `path` (extension optional) merged with the environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CARDHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Returns the endpoint URLs for the configured server.
    pub fn urls(&self) -> Result<Urls, ConfigError> {
        Ok(Urls::parse(&self.base_url)?)
    }
}

/// Delays of the interactive components, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Window in which a second click turns into a double click.
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
    /// Press animation played before a double click navigates.
    #[serde(default = "default_press_feedback_ms")]
    pub press_feedback_ms: u64,
    /// Press animation played when the context menu opens the settings.
    #[serde(default = "default_context_feedback_ms")]
    pub context_feedback_ms: u64,
    /// Idle time after the last keystroke before a search is sent.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Delay before an opening modal becomes fully visible.
    #[serde(default = "default_modal_open_ms")]
    pub modal_open_ms: u64,
    /// Duration of the closing transition of a modal.
    #[serde(default = "default_modal_close_ms")]
    pub modal_close_ms: u64,
    /// How long a notification stays on screen.
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
    /// Duration of the fade out of a notification.
    #[serde(default = "default_notification_fade_ms")]
    pub notification_fade_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            double_click_ms: default_double_click_ms(),
            press_feedback_ms: default_press_feedback_ms(),
            context_feedback_ms: default_context_feedback_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            modal_open_ms: default_modal_open_ms(),
            modal_close_ms: default_modal_close_ms(),
            notification_ms: default_notification_ms(),
            notification_fade_ms: default_notification_fade_ms(),
        }
    }
}

impl TimingConfig {
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn press_feedback(&self) -> Duration {
        Duration::from_millis(self.press_feedback_ms)
    }

    pub fn context_feedback(&self) -> Duration {
        Duration::from_millis(self.context_feedback_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn modal_open(&self) -> Duration {
        Duration::from_millis(self.modal_open_ms)
    }

    pub fn modal_close(&self) -> Duration {
        Duration::from_millis(self.modal_close_ms)
    }

    pub fn notification(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn notification_fade(&self) -> Duration {
        Duration::from_millis(self.notification_fade_ms)
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries with fewer characters never reach the server.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

/// Output format of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `cardhub=debug,cardhub_ui=trace`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000/".to_owned()
}

fn default_double_click_ms() -> u64 {
    300
}

fn default_press_feedback_ms() -> u64 {
    150
}

fn default_context_feedback_ms() -> u64 {
    200
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_modal_open_ms() -> u64 {
    10
}

fn default_modal_close_ms() -> u64 {
    300
}

fn default_notification_ms() -> u64 {
    5000
}

fn default_notification_fade_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_level() -> String {
    "info".to_owned()
}

fn default_format() -> LogFormat {
    LogFormat::Pretty
}
