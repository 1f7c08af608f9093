use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gemini::RetryPolicy;

pub const CONFIG_FILE: &str = "voyages.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoyagesConfig {
    /// Backend model id
    pub model: String,
    /// Override for the backend base URL
    pub base_url: Option<String>,
    /// Booking cost above which a human must approve, in USD
    pub approval_threshold: f64,
    pub retry: RetrySettings,
}

impl Default for VoyagesConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-lite".to_string(),
            base_url: None,
            approval_threshold: 1000.0,
            retry: RetrySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: u32,
    pub exp_base: u32,
    pub initial_delay_secs: u64,
    pub max_delay_secs: u64,
    pub retryable_status: Vec<u16>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7,
            initial_delay_secs: 1,
            max_delay_secs: 60,
            retryable_status: vec![429, 500, 503, 504],
        }
    }
}

impl VoyagesConfig {
    /// Read config from a file, falling back to defaults when it is
    /// missing or unparseable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_attempts(self.retry.attempts)
            .with_exp_base(self.retry.exp_base)
            .with_initial_delay(Duration::from_secs(self.retry.initial_delay_secs))
            .with_max_delay(Duration::from_secs(self.retry.max_delay_secs))
            .with_retryable_status(self.retry.retryable_status.clone())
    }
}
