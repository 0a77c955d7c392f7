use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "PantryDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend the dashboard talks to when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Ceiling for a single backend request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Simulated latency added to every call answered by the in-memory fallback.
pub const DEFAULT_FALLBACK_LATENCY_MS: u64 = 500;

/// Where the development server listens by default.
pub const DEFAULT_DEV_SERVER_ADDR: &str = "127.0.0.1:3001";

const ENV_API_URL: &str = "PANTRYDESK_API_URL";
const ENV_MODE: &str = "PANTRYDESK_ENV";
const ENV_TIMEOUT: &str = "PANTRYDESK_TIMEOUT_SECS";
const ENV_FALLBACK_LATENCY: &str = "PANTRYDESK_FALLBACK_LATENCY_MS";
const ENV_DEV_SERVER_ADDR: &str = "PANTRYDESK_DEV_SERVER_ADDR";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "pantrydesk_lib=info,pantrydesk=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown run mode: {0} (expected development, production or offline)")]
    InvalidMode(String),
    #[error("Invalid number for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("Invalid socket address for {key}: {value}")]
    InvalidAddr { key: &'static str, value: String },
}

/// Selects which store answers resource calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Live backend first, in-memory fallback when it is unreachable.
    Development,
    /// Live backend only. Failures reach the caller.
    Production,
    /// In-memory store only, no network.
    Offline,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "offline" => Ok(Self::Offline),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// Runtime configuration, read from `PANTRYDESK_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub mode: RunMode,
    pub request_timeout: Duration,
    pub fallback_latency: Duration,
    pub dev_server_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            mode: RunMode::Development,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fallback_latency: Duration::from_millis(DEFAULT_FALLBACK_LATENCY_MS),
            dev_server_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(mode) = get(ENV_MODE) {
            config.mode = mode.parse()?;
        }
        if let Some(raw) = get(ENV_TIMEOUT) {
            config.request_timeout = Duration::from_secs(parse_number(ENV_TIMEOUT, &raw)?);
        }
        if let Some(raw) = get(ENV_FALLBACK_LATENCY) {
            config.fallback_latency =
                Duration::from_millis(parse_number(ENV_FALLBACK_LATENCY, &raw)?);
        }
        if let Some(raw) = get(ENV_DEV_SERVER_ADDR) {
            config.dev_server_addr = raw.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                key: ENV_DEV_SERVER_ADDR,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.mode == RunMode::Production
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}
