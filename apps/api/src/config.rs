use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub gemini_api_key: String,
    pub openai_model: String,
    pub gemini_model: String,
    /// Provider weights for the aggregation merge. Injectable so they can
    /// be tuned per deployment without a code change.
    pub provider_weight_openai: f64,
    pub provider_weight_gemini: f64,
    /// Process-wide cap on simultaneous in-flight provider calls.
    pub max_concurrent_provider_calls: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-pro"),
            provider_weight_openai: parse_env("PROVIDER_WEIGHT_OPENAI", 0.55)?,
            provider_weight_gemini: parse_env("PROVIDER_WEIGHT_GEMINI", 0.45)?,
            max_concurrent_provider_calls: parse_env("MAX_CONCURRENT_PROVIDER_CALLS", 3usize)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid value")),
        Err(_) => Ok(default),
    }
}
