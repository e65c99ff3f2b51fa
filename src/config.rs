//! Process configuration loaded from the environment.

use crate::error::ConfigError;
use crate::video::PollPolicy;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default provider base URL (ModelArk, BytePlus ap-southeast).
pub const DEFAULT_BASE_URL: &str = "https://ark.ap-southeast.bytepluses.com/api/v3";

/// Settings shared read-only by every request once the process starts.
#[derive(Clone)]
pub struct Settings {
    /// Bearer credential for the provider.
    pub api_key: String,
    /// Provider model (or inference endpoint) identifier.
    pub model_id: String,
    /// Provider API base URL.
    pub base_url: String,
    /// Timeout for each outbound provider call.
    pub request_timeout: Duration,
    /// Log filter directive (e.g. `info`, `vidgen=debug`).
    pub log_level: String,
    /// Environment name; only changes log formatting.
    pub environment: String,
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Polling behaviour for callers that wait on a task.
    pub poll: PollPolicy,
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the environment.
    ///
    /// Reads:
    /// - `BYTEDANCE_ARK_API_KEY` or `ARK_API_KEY` (required)
    /// - `BYTEDANCE_MODEL_ID` (required)
    /// - `ARK_BASE_URL`, `ARK_TIMEOUT_SECS`
    /// - `LOG_LEVEL`, `ENV`, `HOST`, `PORT`
    /// - `POLL_INTERVAL_SECS`, `POLL_DEADLINE_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("BYTEDANCE_ARK_API_KEY")
            .or_else(|| get("ARK_API_KEY"))
            .ok_or(ConfigError::Missing("BYTEDANCE_ARK_API_KEY"))?;
        let model_id = get("BYTEDANCE_MODEL_ID").ok_or(ConfigError::Missing("BYTEDANCE_MODEL_ID"))?;

        let base_url = get("ARK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        parse_base_url(&base_url)?;

        let request_timeout = parse_secs("ARK_TIMEOUT_SECS", get("ARK_TIMEOUT_SECS"), 30)?;
        let poll_interval = parse_secs("POLL_INTERVAL_SECS", get("POLL_INTERVAL_SECS"), 1)?;
        let poll_deadline = parse_secs("POLL_DEADLINE_SECS", get("POLL_DEADLINE_SECS"), 600)?;

        Ok(Self {
            api_key,
            model_id,
            base_url,
            request_timeout,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            environment: get("ENV").unwrap_or_else(|| "dev".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 8000)?,
            poll: PollPolicy::default()
                .with_interval(poll_interval)
                .with_deadline(poll_deadline),
        })
    }

    /// Returns true in the development environment.
    pub fn is_dev(&self) -> bool {
        self.environment.eq_ignore_ascii_case("dev")
            || self.environment.eq_ignore_ascii_case("development")
    }

    /// `host:port` to bind the HTTP server to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the provider client described by these settings.
    #[cfg(feature = "ark")]
    pub fn ark_provider(&self) -> Result<crate::video::providers::ArkProvider, ConfigError> {
        crate::video::providers::ArkProvider::builder()
            .api_key(&self.api_key)
            .model(&self.model_id)
            .base_url(&self.base_url)
            .timeout(self.request_timeout)
            .build()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("poll", &self.poll)
            .finish()
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("{raw}: {e}"),
        }),
    }
}

/// Whole seconds, must be greater than zero.
fn parse_secs(name: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match parse_or(name, raw, default)? {
        0 => Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// Parses and checks a provider base URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "ARK_BASE_URL",
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid(format!("{raw}: expected an http(s) URL")));
    }
    Ok(url)
}
