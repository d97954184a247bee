use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// URL or filesystem path of the badge embedded in DOCX exports.
    pub badge_asset: String,
    pub asset_fetch_timeout: Duration,
    /// When set, every DOCX export is also saved here.
    pub export_dir: Option<PathBuf>,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            badge_asset: lookup("BADGE_ASSET").unwrap_or_else(|| "assets/badge.png".to_string()),
            asset_fetch_timeout: Duration::from_secs(
                parse_or(&lookup, "ASSET_FETCH_TIMEOUT_SECS", 30)
                    .context("ASSET_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            export_dir: lookup("EXPORT_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 1024 * 1024)
                .context("MAX_BODY_BYTES must be a byte count")?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}
