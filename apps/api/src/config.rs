use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemma-3-4b-it";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub ai_timeout_secs: u64,
    pub ai_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            db_max_connections: or_default("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            jwt_secret: require("JWT_SECRET")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            ai_timeout_secs: or_default("AI_TIMEOUT_SECS", "60")
                .parse()
                .context("AI_TIMEOUT_SECS must be a number of seconds")?,
            ai_max_retries: or_default("AI_MAX_RETRIES", "2")
                .parse()
                .context("AI_MAX_RETRIES must be a non-negative integer")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}
