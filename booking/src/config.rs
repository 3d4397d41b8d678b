//! Configuration management for the booking studio.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values are reported instead of silently replaced.

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::ledger::WildcardPolicy;
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use studio_anthropic::messages::DEFAULT_MODEL;

/// Default relay endpoint
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3333/api/send-whatsapp-message";

/// Number that receives new-booking notices
pub const DEFAULT_SHOP_NOTIFICATION_NUMBER: &str = "5583981927402";

/// Shop local time offset when none is configured (UTC-3)
pub const DEFAULT_SHOP_UTC_OFFSET_MINUTES: i32 = -180;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay and notification settings
    pub notifications: NotificationConfig,
    /// Text generation settings
    pub generation: GenerationConfig,
    /// Scheduling settings
    pub scheduling: SchedulingConfig,
    /// Log filter (`RUST_LOG` syntax)
    pub log_level: String,
}

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Relay endpoint receiving `{ targetNumber, message }`
    pub relay_url: String,
    /// Number that receives new-booking notices
    pub shop_number: String,
    /// Timeout for the shop notice
    pub shop_timeout: Duration,
    /// Timeout for the client confirmation
    pub client_timeout: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            shop_number: DEFAULT_SHOP_NOTIFICATION_NUMBER.to_string(),
            shop_timeout: Duration::from_secs(10),
            client_timeout: Duration::from_secs(15),
        }
    }
}

/// Text generation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// API key; `None` selects template confirmations
    pub api_key: Option<String>,
    /// Override for the API base URL
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Output length cap
    pub max_tokens: u32,
    /// Bound on one generation call
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_tokens: 300,
            timeout: Duration::from_secs(20),
        }
    }
}

/// Scheduling configuration
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Shop data
    pub catalog: Catalog,
    /// Offset used to turn the UTC clock into shop time
    pub utc_offset: FixedOffset,
    /// How wildcard bookings are recorded
    pub wildcard_policy: WildcardPolicy,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::studio(),
            utc_offset: default_offset(),
            wildcard_policy: WildcardPolicy::default(),
        }
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_SHOP_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `RELAY_URL` | `http://localhost:3333/api/send-whatsapp-message` |
    /// | `SHOP_NOTIFICATION_NUMBER` | `5583981927402` |
    /// | `SHOP_NOTIFICATION_TIMEOUT_SECS` | `10` |
    /// | `CLIENT_NOTIFICATION_TIMEOUT_SECS` | `15` |
    /// | `ANTHROPIC_API_KEY` | unset (template confirmations) |
    /// | `ANTHROPIC_BASE_URL` | public API |
    /// | `GENERATION_MODEL` | `claude-sonnet-4-5-20250929` |
    /// | `GENERATION_TEMPERATURE` / `_TOP_P` / `_TOP_K` | `0.7` / `0.95` / `40` |
    /// | `GENERATION_MAX_TOKENS` | `300` |
    /// | `GENERATION_TIMEOUT_SECS` | `20` |
    /// | `SHOP_UTC_OFFSET_MINUTES` | `-180` |
    /// | `CATALOG_PATH` | built-in studio catalog |
    /// | `WILDCARD_POLICY` | `resolve` (`record` keeps wildcard records) |
    /// | `RUST_LOG` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable values and
    /// [`ConfigError::Catalog`] when `CATALOG_PATH` cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults_n = NotificationConfig::default();
        let defaults_g = GenerationConfig::default();

        let notifications = NotificationConfig {
            relay_url: env::var("RELAY_URL").unwrap_or(defaults_n.relay_url),
            shop_number: env::var("SHOP_NOTIFICATION_NUMBER").unwrap_or(defaults_n.shop_number),
            shop_timeout: parse_var("SHOP_NOTIFICATION_TIMEOUT_SECS")?
                .map_or(defaults_n.shop_timeout, Duration::from_secs),
            client_timeout: parse_var("CLIENT_NOTIFICATION_TIMEOUT_SECS")?
                .map_or(defaults_n.client_timeout, Duration::from_secs),
        };

        let generation = GenerationConfig {
            api_key: env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("ANTHROPIC_BASE_URL").ok(),
            model: env::var("GENERATION_MODEL").unwrap_or(defaults_g.model),
            temperature: parse_var("GENERATION_TEMPERATURE")?.unwrap_or(defaults_g.temperature),
            top_p: parse_var("GENERATION_TOP_P")?.unwrap_or(defaults_g.top_p),
            top_k: parse_var("GENERATION_TOP_K")?.unwrap_or(defaults_g.top_k),
            max_tokens: parse_var("GENERATION_MAX_TOKENS")?.unwrap_or(defaults_g.max_tokens),
            timeout: parse_var("GENERATION_TIMEOUT_SECS")?
                .map_or(defaults_g.timeout, Duration::from_secs),
        };

        let utc_offset = match parse_var::<i32>("SHOP_UTC_OFFSET_MINUTES")? {
            Some(minutes) => FixedOffset::east_opt(minutes.saturating_mul(60)).ok_or(
                ConfigError::InvalidValue {
                    name: "SHOP_UTC_OFFSET_MINUTES",
                    value: minutes.to_string(),
                },
            )?,
            None => default_offset(),
        };

        let catalog = match env::var("CATALOG_PATH") {
            Ok(path) => Catalog::load(path)?,
            Err(_) => Catalog::studio(),
        };

        Ok(Self {
            notifications,
            generation,
            scheduling: SchedulingConfig {
                catalog,
                utc_offset,
                wildcard_policy: parse_var("WILDCARD_POLICY")?.unwrap_or_default(),
            },
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notifications: NotificationConfig::default(),
            generation: GenerationConfig::default(),
            scheduling: SchedulingConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::InvalidValue { name, value }),
        },
        Err(_) => Ok(None),
    }
}
