use std::env;

use url::Url;

use crate::error::ConfigError;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const BACKEND_API_URL: &str = "http://localhost:5000/api/";
const BACKEND_TIMEOUT_SECS: u64 = 10;
const SEARCH_DEBOUNCE_MS: u64 = 300;
const SESSION_IDLE_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend_url: Url,
    pub backend_token: Option<String>,
    pub backend_timeout_secs: u64,
    pub search_debounce_ms: u64,
    /// Builder sessions untouched for longer than this are discarded.
    pub session_idle_minutes: i64,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url =
            env::var("BACKEND_API_URL").unwrap_or_else(|_| BACKEND_API_URL.to_string());

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: parse_or("PORT", PORT),
            backend_url: parse_base_url(&backend_url)?,
            backend_token: env::var("BACKEND_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            backend_timeout_secs: parse_or("BACKEND_TIMEOUT_SECS", BACKEND_TIMEOUT_SECS),
            search_debounce_ms: parse_or("SEARCH_DEBOUNCE_MS", SEARCH_DEBOUNCE_MS),
            session_idle_minutes: parse_or("SESSION_IDLE_MINUTES", SESSION_IDLE_MINUTES).max(1),
            environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Config pointing at an explicit backend, everything else defaulted.
    pub fn with_backend(backend_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            host: HOST.to_string(),
            port: PORT,
            backend_url: parse_base_url(backend_url)?,
            backend_token: None,
            backend_timeout_secs: BACKEND_TIMEOUT_SECS,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            session_idle_minutes: SESSION_IDLE_MINUTES,
            environment: "test".to_string(),
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

// Url::join drops the last path segment unless the base ends with '/'.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        name: "BACKEND_API_URL",
        source,
    })
}
