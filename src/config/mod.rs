//! Environment-driven configuration, read once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::delivery::service::DeliveryConfig;
use crate::signals::bands::SafetyThresholds;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment name (`APP_ENV`), used to pick the log format.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: i64,
    pub telegram_api_url: String,
    pub command_text: String,
    pub cron_spec: String,
    pub max_send_attempts: usize,
    pub leverage: f64,
    pub thresholds: SafetyThresholds,
    pub poll_timeout: Duration,
    pub poll_retry_delay: Duration,
    pub binance_api_url: String,
    pub proxy: Option<String>,
    pub run_on_start: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = parse(&get, "TELEGRAM_CHAT_ID")?.ok_or(ConfigError::Missing("TELEGRAM_CHAT_ID"))?;

        let defaults = SafetyThresholds::default();
        let thresholds = SafetyThresholds {
            halt_leverage: parse(&get, "HALT_LEVERAGE")?.unwrap_or(defaults.halt_leverage),
            warning_leverage: parse(&get, "WARNING_LEVERAGE")?.unwrap_or(defaults.warning_leverage),
        };
        if thresholds.warning_leverage > thresholds.halt_leverage {
            return Err(ConfigError::Invalid {
                key: "WARNING_LEVERAGE",
                value: thresholds.warning_leverage.to_string(),
                reason: format!("must not exceed HALT_LEVERAGE ({})", thresholds.halt_leverage),
            });
        }

        let leverage: f64 = parse(&get, "LEVERAGE")?.unwrap_or(1.0);
        if leverage < 0.0 {
            return Err(ConfigError::Invalid {
                key: "LEVERAGE",
                value: leverage.to_string(),
                reason: "must be >= 0".to_string(),
            });
        }

        Ok(Self {
            bot_token,
            chat_id,
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| crate::delivery::telegram::DEFAULT_API_URL.to_string()),
            command_text: get("COMMAND_TEXT").unwrap_or_else(|| "/advice".to_string()),
            cron_spec: get("CRON_SPEC").unwrap_or_else(|| "0 0 9 * * Mon".to_string()),
            max_send_attempts: parse(&get, "MAX_SEND_ATTEMPTS")?.unwrap_or(3),
            leverage,
            thresholds,
            poll_timeout: Duration::from_secs(parse(&get, "POLL_TIMEOUT_SECONDS")?.unwrap_or(30)),
            poll_retry_delay: Duration::from_secs(
                parse(&get, "POLL_RETRY_DELAY_SECONDS")?.unwrap_or(5),
            ),
            binance_api_url: get("BINANCE_API_URL")
                .unwrap_or_else(|| crate::services::binance::DEFAULT_API_URL.to_string()),
            proxy: get("HTTPS_PROXY").or_else(|| get("HTTP_PROXY")),
            run_on_start: parse(&get, "RUN_ON_START")?.unwrap_or(false),
        })
    }

    pub fn delivery(&self) -> DeliveryConfig {
        DeliveryConfig {
            recipient_chat_id: self.chat_id,
            command_text: self.command_text.clone(),
            poll_timeout: self.poll_timeout,
            poll_retry_delay: self.poll_retry_delay,
        }
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            }),
    }
}
