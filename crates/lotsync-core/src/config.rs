use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, MapSchema};
use crate::lots::{load_lot_table, LotTable};
use crate::thresholds::Thresholds;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing, values are invalid,
/// or the lot table file cannot be loaded.
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
/// Returns `ConfigError` if required env vars are missing, values are invalid,
/// or the lot table file cannot be loaded.
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
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = or_default("LOTSYNC_API_BASE_URL", "http://localhost:5002");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "LOTSYNC_API_BASE_URL",
            format!("'{api_base_url}' is not an http(s) URL"),
        ));
    }
    let api_key = require("LOTSYNC_API_KEY")?;

    let poll_interval_ms = parse_u64("LOTSYNC_POLL_INTERVAL_MS", "30000")?;
    if poll_interval_ms == 0 {
        return Err(invalid(
            "LOTSYNC_POLL_INTERVAL_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let open_max = parse_u8("LOTSYNC_OPEN_MAX", "60")?;
    let busy_max = parse_u8("LOTSYNC_BUSY_MAX", "85")?;
    let thresholds = Thresholds::new(open_max, busy_max)?;

    let map_schema = parse_map_schema(&or_default("LOTSYNC_MAP_SCHEMA", "percent"))?;

    let lots_path = lookup("LOTSYNC_LOTS_PATH").ok().map(PathBuf::from);
    let lots = match &lots_path {
        Some(path) => load_lot_table(path)?,
        None => LotTable::default(),
    };
    // An explicit allow-list narrows or widens whatever table is in effect.
    let lots = match lookup("LOTSYNC_ALLOWED_LOTS") {
        Ok(raw) => {
            let ids = split_list(&raw);
            if ids.is_empty() {
                return Err(invalid(
                    "LOTSYNC_ALLOWED_LOTS",
                    "must name at least one lot".to_string(),
                ));
            }
            lots.with_allowed(ids)?
        }
        Err(_) => lots,
    };

    let request_timeout_secs = parse_u64("LOTSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOTSYNC_USER_AGENT", "lotsync/0.1 (occupancy-sync)");
    let log_level = or_default("LOTSYNC_LOG_LEVEL", "info");

    Ok(AppConfig {
        api_base_url,
        api_key,
        poll_interval: Duration::from_millis(poll_interval_ms),
        thresholds,
        map_schema,
        lots,
        lots_path,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

/// Parse the `LOTSYNC_MAP_SCHEMA` discriminator.
fn parse_map_schema(s: &str) -> Result<MapSchema, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "percent" => Ok(MapSchema::Percent),
        "available" => Ok(MapSchema::Available),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOTSYNC_MAP_SCHEMA".to_string(),
            reason: format!("unknown schema '{other}'; expected 'percent' or 'available'"),
        }),
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
