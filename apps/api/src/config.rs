use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How the uploaded PDF is handed to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentMode {
    /// Attach the raw PDF bytes.
    #[default]
    Pdf,
    /// Extract text locally and attach only the text.
    Text,
}

impl FromStr for DocumentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentMode::Pdf),
            "text" => Ok(DocumentMode::Text),
            other => Err(anyhow!(
                "DOCUMENT_MODE must be 'pdf' or 'text', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    pub max_upload_bytes: usize,
    pub document_mode: DocumentMode,
    pub session_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: llm_timeout(parse_env("LLM_TIMEOUT_SECS", 120)?)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            document_mode: parse_env("DOCUMENT_MODE", DocumentMode::Pdf)?,
            session_ttl: session_ttl(parse_env("SESSION_TTL_MINUTES", 60)?)?,
        })
    }
}

/// A zero timeout would fail every model call.
fn llm_timeout(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(anyhow!("LLM_TIMEOUT_SECS must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

fn session_ttl(minutes: i64) -> Result<chrono::Duration> {
    if minutes <= 0 {
        return Err(anyhow!(
            "SESSION_TTL_MINUTES must be greater than zero, got {minutes}"
        ));
    }
    chrono::Duration::try_minutes(minutes)
        .ok_or_else(|| anyhow!("SESSION_TTL_MINUTES is out of range: {minutes}"))
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        return Err(anyhow!("Required environment variable '{key}' is empty"));
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}"))
}
