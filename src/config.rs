use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub notes_api_url: String,
    pub notes_api_token: Option<String>,
    pub notes_api_timeout: Duration,
    pub site_url: String,
    pub session_idle: Duration,
    pub max_sessions: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let notes_api_url = var("NOTEHUB_API_URL").ok_or(ConfigError::Missing("NOTEHUB_API_URL"))?;

        let bind_addr = match var("BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let notes_api_timeout = match var("NOTEHUB_API_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "NOTEHUB_API_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(10),
        };

        let session_idle = match var("NOTEHUB_SESSION_IDLE_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "NOTEHUB_SESSION_IDLE_SECS",
                    value,
                })?,
            None => Duration::from_secs(30 * 60),
        };

        let max_sessions = match var("NOTEHUB_MAX_SESSIONS") {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "NOTEHUB_MAX_SESSIONS",
                value,
            })?,
            None => 10_000,
        };

        Ok(Self {
            bind_addr,
            notes_api_url,
            notes_api_token: var("NOTEHUB_API_TOKEN"),
            notes_api_timeout,
            site_url: var("NOTEHUB_SITE_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            session_idle,
            max_sessions,
        })
    }
}
