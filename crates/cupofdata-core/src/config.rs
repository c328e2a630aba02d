use crate::app_config::AppConfig;
use crate::ConfigError;

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
/// Every variable is optional; the classifier services stay disabled when
/// `OPENAI_API_KEY` is absent or blank.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
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

    let log_level = or_default("CUPOFDATA_LOG_LEVEL", "info");
    let openai_api_key = optional("OPENAI_API_KEY");
    let llm_base_url = or_default("CUPOFDATA_LLM_BASE_URL", "https://api.openai.com/v1")
        .trim_end_matches('/')
        .to_string();
    let llm_model = or_default("CUPOFDATA_LLM_MODEL", "gpt-4o-mini");
    let call_timeout_secs = parse_u64("CUPOFDATA_CALL_TIMEOUT_SECS", "20")?;

    let ptt_base_url = or_default("CUPOFDATA_PTT_BASE_URL", "https://www.ptt.cc")
        .trim_end_matches('/')
        .to_string();
    let ptt_board = or_default("CUPOFDATA_PTT_BOARD", "Drink");
    let user_agent = or_default("USER_AGENT", "CupOfData/0.1 (+project:unknown)");
    let rate_limit_ms = parse_u64("RATE_LIMIT_MS", "1200")?;
    let max_retries = parse_u32("CUPOFDATA_MAX_RETRIES", "3")?;
    let request_timeout_secs = parse_u64("CUPOFDATA_REQUEST_TIMEOUT_SECS", "30")?;

    if call_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CUPOFDATA_CALL_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let dictionary_path = optional("CUPOFDATA_DICTIONARY_PATH").map(PathBuf::from);
    let known_brands = optional("CUPOFDATA_KNOWN_BRANDS")
        .map(|raw| parse_brand_list(&raw))
        .unwrap_or_default();

    Ok(AppConfig {
        log_level,
        openai_api_key,
        llm_base_url,
        llm_model,
        call_timeout_secs,
        ptt_base_url,
        ptt_board,
        user_agent,
        rate_limit_ms,
        max_retries,
        request_timeout_secs,
        dictionary_path,
        known_brands,
    })
}

/// Split a comma-separated brand list, accepting the full-width comma too.
fn parse_brand_list(raw: &str) -> Vec<String> {
    let mut brands: Vec<String> = Vec::new();
    for name in raw.split([',', '，']).map(str::trim) {
        if !name.is_empty() && !brands.iter().any(|b| b == name) {
            brands.push(name.to_string());
        }
    }
    brands
}
