use std::str::FromStr;

use crate::app_config::{AnalysisConfig, AppConfig, Environment};
use crate::ConfigError;

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("ADGAP_ENV", "development"))?;
    let log_level = or_default("ADGAP_LOG_LEVEL", "info");

    let db_max_connections = parse_var(&lookup, "ADGAP_DB_MAX_CONNECTIONS", 10_u32)?;
    let db_min_connections = parse_var(&lookup, "ADGAP_DB_MIN_CONNECTIONS", 1_u32)?;
    let db_acquire_timeout_secs = parse_var(&lookup, "ADGAP_DB_ACQUIRE_TIMEOUT_SECS", 10_u64)?;

    let ad_library_url = or_default(
        "ADGAP_AD_LIBRARY_URL",
        "https://graph.facebook.com/v19.0/ads_archive",
    );
    let ad_library_token = optional("ADGAP_AD_LIBRARY_TOKEN");
    let scraper_request_timeout_secs =
        parse_var(&lookup, "ADGAP_SCRAPER_REQUEST_TIMEOUT_SECS", 30_u64)?;
    let scraper_user_agent = or_default("ADGAP_SCRAPER_USER_AGENT", "adgap/0.1 (ad-intelligence)");
    let scraper_inter_request_delay_ms =
        parse_var(&lookup, "ADGAP_SCRAPER_INTER_REQUEST_DELAY_MS", 250_u64)?;
    let scraper_max_retries = parse_var(&lookup, "ADGAP_SCRAPER_MAX_RETRIES", 3_u32)?;
    let scraper_retry_backoff_base_secs =
        parse_var(&lookup, "ADGAP_SCRAPER_RETRY_BACKOFF_BASE_SECS", 5_u64)?;

    let anthropic_api_key = optional("ANTHROPIC_API_KEY");
    let llm_url = or_default("ADGAP_LLM_URL", "https://api.anthropic.com");
    let llm_model = or_default("ADGAP_LLM_MODEL", "claude-3-5-haiku-latest");
    let llm_max_tokens = parse_var(&lookup, "ADGAP_LLM_MAX_TOKENS", 4096_u32)?;
    let llm_request_timeout_secs = parse_var(&lookup, "ADGAP_LLM_REQUEST_TIMEOUT_SECS", 120_u64)?;

    let defaults = AnalysisConfig::default();
    let analysis = AnalysisConfig {
        max_ads_per_brand: parse_var(&lookup, "ADGAP_MAX_ADS_PER_BRAND", defaults.max_ads_per_brand)?,
        days_back: parse_var(&lookup, "ADGAP_DAYS_BACK", defaults.days_back)?,
        classify_batch_size: parse_var(
            &lookup,
            "ADGAP_CLASSIFY_BATCH_SIZE",
            defaults.classify_batch_size,
        )?,
        classify_text_prefix_chars: parse_var(
            &lookup,
            "ADGAP_CLASSIFY_TEXT_PREFIX",
            defaults.classify_text_prefix_chars,
        )?,
        classify_concurrency: parse_var(
            &lookup,
            "ADGAP_CLASSIFY_CONCURRENCY",
            defaults.classify_concurrency,
        )?,
        retrieval_concurrency: parse_var(
            &lookup,
            "ADGAP_RETRIEVAL_CONCURRENCY",
            defaults.retrieval_concurrency,
        )?,
        retrieval_timeout_secs: parse_var(
            &lookup,
            "ADGAP_RETRIEVAL_TIMEOUT_SECS",
            defaults.retrieval_timeout_secs,
        )?,
        classify_timeout_secs: parse_var(
            &lookup,
            "ADGAP_CLASSIFY_TIMEOUT_SECS",
            defaults.classify_timeout_secs,
        )?,
        recommend_timeout_secs: parse_var(
            &lookup,
            "ADGAP_RECOMMEND_TIMEOUT_SECS",
            defaults.recommend_timeout_secs,
        )?,
        max_recommendations: parse_var(
            &lookup,
            "ADGAP_MAX_RECOMMENDATIONS",
            defaults.max_recommendations,
        )?,
        min_competitors_with_ads: defaults.min_competitors_with_ads,
    };

    if analysis.classify_concurrency > 2 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADGAP_CLASSIFY_CONCURRENCY".to_string(),
            reason: format!(
                "{} exceeds the classification rate-limit ceiling of 2",
                analysis.classify_concurrency
            ),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        ad_library_url,
        ad_library_token,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        anthropic_api_key,
        llm_url,
        llm_model,
        llm_max_tokens,
        llm_request_timeout_secs,
        analysis,
    })
}

/// Parse `var` with `FromStr`, using `default` when it is unset.
fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADGAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
