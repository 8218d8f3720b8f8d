use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "https://labdados.com/produtos";
pub const DEFAULT_FALLBACK_PATH: &str = "dados_fallback.csv";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SALESDASH_ENV", "development"))?;
    let log_level = or_default("SALESDASH_LOG_LEVEL", "info");
    let api_url = or_default("SALESDASH_API_URL", DEFAULT_API_URL);
    let user_agent = or_default("SALESDASH_USER_AGENT", "salesdash/0.1 (sales-analytics)");
    let fallback_path = PathBuf::from(or_default("SALESDASH_FALLBACK_PATH", DEFAULT_FALLBACK_PATH));

    let max_attempts = parse_u32("SALESDASH_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(invalid("SALESDASH_MAX_ATTEMPTS", "must be at least 1".to_owned()));
    }

    let request_timeout_secs = parse_u64("SALESDASH_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SALESDASH_REQUEST_TIMEOUT_SECS",
            "must be greater than 0".to_owned(),
        ));
    }

    let backoff_base = parse_f64("SALESDASH_BACKOFF_BASE", "2")?;
    if !backoff_base.is_finite() || backoff_base <= 1.0 {
        return Err(invalid(
            "SALESDASH_BACKOFF_BASE",
            "must be a finite number greater than 1".to_owned(),
        ));
    }

    let backoff_unit_ms = parse_u64("SALESDASH_BACKOFF_UNIT_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        api_url,
        user_agent,
        fallback_path,
        max_attempts,
        request_timeout_secs,
        backoff_base,
        backoff_unit_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
