use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let parse_opt_usize = |var: &str| -> Result<Option<usize>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .parse::<usize>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    };

    let listing_url = lookup("BBYSCRAPE_LISTING_URL").ok();
    let output_path = PathBuf::from(or_default(
        "BBYSCRAPE_OUTPUT_PATH",
        "data/out/products.jsonl",
    ));
    let max_items = parse_opt_usize("BBYSCRAPE_MAX_ITEMS")?;
    let log_level = or_default("BBYSCRAPE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("BBYSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BBYSCRAPE_USER_AGENT", "bbyscrape/0.1 (catalog-research)");
    let max_retries = parse_u32("BBYSCRAPE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("BBYSCRAPE_RETRY_BACKOFF_BASE_SECS", "1")?;
    let inter_request_delay_ms = parse_u64("BBYSCRAPE_DELAY_MS", "250")?;

    Ok(AppConfig {
        listing_url,
        output_path,
        max_items,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert!(cfg.listing_url.is_none());
        assert_eq!(cfg.output_path.to_str(), Some("data/out/products.jsonl"));
        assert!(cfg.max_items.is_none());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "bbyscrape/0.1 (catalog-research)");
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_secs, 1);
        assert_eq!(cfg.inter_request_delay_ms, 250);
    }

    #[test]
    fn build_app_config_reads_listing_url() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert(
            "BBYSCRAPE_LISTING_URL",
            "https://www.bestbuy.com/site/all-cell-phones/pcmcat209400050001.c",
        );
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.listing_url.as_deref(),
            Some("https://www.bestbuy.com/site/all-cell-phones/pcmcat209400050001.c")
        );
    }

    #[test]
    fn build_app_config_overrides_output_path() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_OUTPUT_PATH", "/tmp/out.jsonl");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.output_path.to_str(), Some("/tmp/out.jsonl"));
    }

    #[test]
    fn build_app_config_parses_max_items() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_MAX_ITEMS", "40");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_items, Some(40));
    }

    #[test]
    fn build_app_config_rejects_invalid_max_items() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_MAX_ITEMS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BBYSCRAPE_MAX_ITEMS"),
            "expected InvalidEnvVar(BBYSCRAPE_MAX_ITEMS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_delay_ms() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_DELAY_MS", "1000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.inter_request_delay_ms, 1000);
    }

    #[test]
    fn build_app_config_rejects_invalid_retries() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BBYSCRAPE_MAX_RETRIES"),
            "expected InvalidEnvVar(BBYSCRAPE_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_user_agent() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BBYSCRAPE_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }
}
