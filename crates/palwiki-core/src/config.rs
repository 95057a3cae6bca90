use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_NEWS_URL: &str = "https://store.steampowered.com/news/app/1623730";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("PALWIKI_ENV", "development"))?;

    let bind_addr = parse("PALWIKI_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("PALWIKI_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("PALWIKI_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PALWIKI_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PALWIKI_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let news_url = or_default("PALWIKI_NEWS_URL", DEFAULT_NEWS_URL);
    let ingest_interval_secs = parse_u64("PALWIKI_INGEST_INTERVAL_SECS", "3600")?;
    if ingest_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PALWIKI_INGEST_INTERVAL_SECS".to_string(),
            reason: "interval must be at least one second".to_string(),
        });
    }

    let scraper_request_timeout_secs = parse_u64("PALWIKI_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("PALWIKI_SCRAPER_USER_AGENT", "palwiki/0.1 (news-ingest)");

    let gemini_model = or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    let gemini_base_url = or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let synthesis_timeout_secs = parse_u64("PALWIKI_SYNTHESIS_TIMEOUT_SECS", "120")?;
    if synthesis_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PALWIKI_SYNTHESIS_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let generate_max_chars = parse_usize("PALWIKI_GENERATE_MAX_CHARS", "2000")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        news_url,
        ingest_interval_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        synthesis_timeout_secs,
        generate_max_chars,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PALWIKI_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
