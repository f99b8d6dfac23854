use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub proxy_key: String,
    pub upstream_key: String,
    pub upstream_url: String,
    /// `None` leaves the upstream call unbounded.
    pub upstream_timeout: Option<Duration>,
    pub environment: String,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let proxy_key = required("PROXY_KEY")?;
        let upstream_key = required("OPENAI_KEY")?;

        let port = match lookup("PORT") {
            Some(val) => val.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: val,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: val,
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let upstream_url = lookup("UPSTREAM_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let environment = lookup("APP_ENV")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Ok(Self {
            port,
            proxy_key,
            upstream_key,
            upstream_url,
            upstream_timeout,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("proxy_key", &"<redacted>")
            .field("upstream_key", &"<redacted>")
            .field("upstream_url", &self.upstream_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("environment", &self.environment)
            .finish()
    }
}
