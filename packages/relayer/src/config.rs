use std::env;
use std::path::Path;
use std::time::Duration;

use eyre::{eyre, Result, WrapErr};

use crate::confirmation::ConfirmationConfig;
use crate::retry::RetryConfig;

/// Relayer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RelayerConfig {
    /// Address that signs deliveries on destination chains
    pub relayer_address: String,
    /// Address credited with fees on source chains; the signer when unset
    pub reward_address: Option<String>,
    pub confirmation: ConfirmationConfig,
    pub retry: RetryConfig,
    /// Check delivery before submitting and skip messages already delivered
    pub skip_delivered: bool,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            relayer_address: String::new(),
            reward_address: None,
            confirmation: ConfirmationConfig::default(),
            retry: RetryConfig::default(),
            skip_delivered: true,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| eyre!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(None),
    }
}

fn env_millis(key: &str) -> Result<Option<Duration>> {
    Ok(env_parse::<u64>(key)?.map(Duration::from_millis))
}

impl RelayerConfig {
    /// Defaults for `relayer_address`.
    pub fn new(relayer_address: impl Into<String>) -> Self {
        Self {
            relayer_address: relayer_address.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    /// Loads .env file if present, then reads from environment
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env").or_else(|_| Self::load_from_env())
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let defaults = Self::default();

        let relayer_address = env::var("RELAYER_ADDRESS")
            .map_err(|_| eyre!("RELAYER_ADDRESS environment variable is required"))?;
        let reward_address = env::var("RELAYER_REWARD_ADDRESS")
            .ok()
            .filter(|v| !v.is_empty());

        let confirmation = ConfirmationConfig {
            timeout: env_millis("INCLUSION_TIMEOUT_MS")?
                .unwrap_or(defaults.confirmation.timeout),
            poll_interval: env_millis("POLL_INTERVAL_MS")?
                .unwrap_or(defaults.confirmation.poll_interval),
        };

        let retry = RetryConfig {
            max_retries: env_parse("RETRY_ATTEMPTS")?.unwrap_or(defaults.retry.max_retries),
            initial_backoff: env_millis("RETRY_INITIAL_BACKOFF_MS")?
                .unwrap_or(defaults.retry.initial_backoff),
            max_backoff: env_millis("RETRY_MAX_BACKOFF_MS")?
                .unwrap_or(defaults.retry.max_backoff),
            ..defaults.retry
        };

        let config = RelayerConfig {
            relayer_address,
            reward_address,
            confirmation,
            retry,
            skip_delivered: env_parse("SKIP_DELIVERED")?.unwrap_or(defaults.skip_delivered),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.relayer_address.is_empty() {
            return Err(eyre!("relayer_address cannot be empty"));
        }
        if self.confirmation.poll_interval.is_zero() {
            return Err(eyre!("poll_interval must be greater than zero"));
        }
        if self.confirmation.timeout < self.confirmation.poll_interval {
            return Err(eyre!("inclusion timeout must be at least one poll interval"));
        }
        if self.retry.max_backoff < self.retry.initial_backoff {
            return Err(eyre!("retry max backoff must not be below the initial backoff"));
        }
        Ok(())
    }

    /// Address credited with delivery fees.
    pub fn reward_address(&self) -> &str {
        self.reward_address
            .as_deref()
            .unwrap_or(&self.relayer_address)
    }
}
