//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VulnexConfig;
use super::secret::secret_string;
use crate::domain::errors::VulnexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VulnexConfig
/// 4. Applies environment variable overrides (VULNEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use vulnex::config::loader::load_config;
///
/// let config = load_config("vulnex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VulnexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VulnexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VulnexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VulnexConfig = toml::from_str(&contents)
        .map_err(|e| VulnexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        VulnexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VulnexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the VULNEX_* prefix
///
/// Environment variables follow the pattern VULNEX_<SECTION>_<KEY>,
/// for example VULNEX_API_BASE_URL or VULNEX_EXPORT_WORKERS.
/// Values that fail to parse are ignored.
fn apply_env_overrides(config: &mut VulnexConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("VULNEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("VULNEX_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // API overrides
    if let Ok(val) = std::env::var("VULNEX_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("VULNEX_API_USERNAME") {
        config.api.username = val;
    }
    if let Ok(val) = std::env::var("VULNEX_API_PASSWORD") {
        config.api.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("VULNEX_API_TLS_PIN_CERTIFICATE") {
        config.api.tls_pin_certificate = val.parse().unwrap_or(true);
    }

    // Query overrides
    if let Ok(val) = std::env::var("VULNEX_QUERY_FILTER") {
        config.query.filter = val;
    }
    if let Some(size) = parsed_env("VULNEX_QUERY_PAGE_SIZE") {
        config.query.page_size = size;
    }

    // Export overrides
    if let Some(workers) = parsed_env("VULNEX_EXPORT_WORKERS") {
        config.export.workers = workers;
    }
    if let Some(retries) = parsed_env("VULNEX_EXPORT_MAX_RETRIES") {
        config.export.max_retries = retries;
    }
    if let Some(delay) = parsed_env("VULNEX_EXPORT_RETRY_DELAY_MS") {
        config.export.retry_delay_ms = delay;
    }

    // Output overrides
    if let Ok(val) = std::env::var("VULNEX_OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }
    if let Ok(val) = std::env::var("VULNEX_OUTPUT_FILE_PREFIX") {
        config.output.file_prefix = val;
    }
    if let Ok(val) = std::env::var("VULNEX_OUTPUT_ARCHIVE") {
        config.output.archive = val.parse().unwrap_or(true);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VULNEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VULNEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
