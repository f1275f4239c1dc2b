use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub webhook_url: String,
    pub webhook_api_key: String,
    pub webhook_timeout: Duration,
    /// When the webhook reply matches no known shape, store placeholder text
    /// instead of failing the request.
    pub allow_placeholder_fallback: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is the
    /// process-environment flavour of this.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let webhook_timeout_secs: u64 = parse_positive(
            "WEBHOOK_TIMEOUT_SECS",
            lookup("WEBHOOK_TIMEOUT_SECS"),
            30,
        )?;

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            database_max_connections: parse_positive(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            webhook_url: require("TAILOR_WEBHOOK_URL")?,
            webhook_api_key: require("TAILOR_WEBHOOK_API_KEY")?,
            webhook_timeout: Duration::from_secs(webhook_timeout_secs),
            allow_placeholder_fallback: parse_bool(
                "ALLOW_PLACEHOLDER_FALLBACK",
                lookup("ALLOW_PLACEHOLDER_FALLBACK"),
                true,
            )?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Parses an optional positive integer; zero is rejected at startup.
fn parse_positive<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default())
        .with_context(|| format!("{key} must be a positive integer, got '{raw}'"))
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}
