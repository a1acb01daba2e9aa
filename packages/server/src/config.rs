use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use extraction::pipeline::fetch::DESKTOP_USER_AGENT;
use extraction::types::config::DEFAULT_BASE_URL;

const MAX_TIMEOUT_SECS: u64 = 300;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub debug: bool,
    pub debug_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub stream_user_agent: String,
    pub patterns_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            debug: false,
            debug_dir: PathBuf::from("debug"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            upstream_base_url: DEFAULT_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(30),
            stream_user_agent: DESKTOP_USER_AGENT.to_string(),
            patterns_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, then validate it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            port: match lookup("PORT") {
                Some(v) => v.parse().context("PORT must be a number between 1 and 65535")?,
                None => defaults.port,
            },
            debug: match lookup("DEBUG") {
                Some(v) => parse_bool(&v).context("DEBUG must be true/false/1/0")?,
                None => defaults.debug,
            },
            debug_dir: lookup("DEBUG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.debug_dir),
            log_level: lookup("LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
                None | Some("text") => LogFormat::Text,
                Some("json") => LogFormat::Json,
                Some(other) => bail!("LOG_FORMAT must be text or json, got {other}"),
            },
            upstream_base_url: lookup("UPSTREAM_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: match lookup("UPSTREAM_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse()
                        .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => defaults.upstream_timeout,
            },
            stream_user_agent: lookup("STREAM_USER_AGENT").unwrap_or(defaults.stream_user_agent),
            patterns_file: lookup("PATTERNS_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that parsing alone doesn't catch
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("PORT must be between 1 and 65535");
        }

        if !matches!(self.log_level.as_str(), "debug" | "info" | "warn" | "error") {
            bail!(
                "LOG_LEVEL must be one of debug, info, warn, error, got {}",
                self.log_level
            );
        }

        let base = url::Url::parse(&self.upstream_base_url)
            .with_context(|| format!("UPSTREAM_BASE_URL is not a valid URL: {}", self.upstream_base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("UPSTREAM_BASE_URL must use http or https");
        }

        let secs = self.upstream_timeout.as_secs();
        if secs == 0 || secs > MAX_TIMEOUT_SECS {
            bail!("UPSTREAM_TIMEOUT_SECS must be between 1 and {MAX_TIMEOUT_SECS}");
        }

        let ua_len = self.stream_user_agent.chars().count();
        if !(10..=500).contains(&ua_len) {
            bail!("STREAM_USER_AGENT must be between 10 and 500 characters");
        }

        Ok(())
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn log_directive(&self) -> String {
        format!(
            "{level},server_core={level},extraction={level},tower_http={level}",
            level = self.log_level
        )
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("invalid boolean: {other}"),
    }
}
