//! Configuration schema types
//!
//! This module defines the configuration structure for Vulnex.

use crate::config::SecretString;
use crate::domain::{Result, VulnexError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Main Vulnex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// GraphQL API connection and credentials
    pub api: ApiConfig,

    /// Query parameters
    #[serde(default)]
    pub query: QueryConfig,

    /// Worker pool and retry settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VulnexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.query.validate()?;
        self.export.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (fetch and flatten, but don't write the CSV)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// GraphQL API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the vendor tenant, e.g. `https://tenant.example.net`
    pub base_url: String,

    /// Path of the GraphQL endpoint
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,

    /// Path of the login endpoint
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Login user name
    pub username: String,

    /// Login password
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Fetch the server's certificate chain and trust only that chain
    ///
    /// Ignored for `http://` base URLs.
    #[serde(default = "default_true")]
    pub tls_pin_certificate: bool,

    /// File name of the pinned chain, written to the system temp directory
    #[serde(default = "default_trust_anchor_file")]
    pub trust_anchor_file: String,

    /// Login request timeout in seconds
    #[serde(default = "default_login_timeout_seconds")]
    pub login_timeout_seconds: u64,

    /// Count query timeout in seconds
    #[serde(default = "default_count_timeout_seconds")]
    pub count_timeout_seconds: u64,

    /// Page query timeout in seconds
    #[serde(default = "default_data_timeout_seconds")]
    pub data_timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;

        if !self.graphql_path.starts_with('/') || !self.login_path.starts_with('/') {
            return Err("api.graphql_path and api.login_path must start with '/'".to_string());
        }

        if self.username.is_empty() {
            return Err("api.username cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("api.password cannot be empty".to_string());
        }

        if self.trust_anchor_file.is_empty() || self.trust_anchor_file.contains(['/', '\\']) {
            return Err("api.trust_anchor_file must be a plain file name".to_string());
        }

        if self.login_timeout_seconds == 0
            || self.count_timeout_seconds == 0
            || self.data_timeout_seconds == 0
        {
            return Err("api timeouts must be > 0".to_string());
        }

        Ok(())
    }

    /// Full URL of the GraphQL endpoint
    pub fn graphql_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.graphql_path)
    }

    /// Full URL of the login endpoint
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
    }

    /// Whether the certificate chain should be fetched and pinned
    pub fn pins_certificate(&self) -> bool {
        self.tls_pin_certificate && self.base_url.starts_with("https://")
    }

    /// Host name and port of the base URL
    pub fn host_and_port(&self) -> Result<(String, u16)> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| VulnexError::Configuration(format!("Invalid api.base_url: {e}")))?;
        let host = url.host_str().ok_or_else(|| {
            VulnexError::Configuration(format!("api.base_url has no host: {}", self.base_url))
        })?;
        let port = url.port_or_known_default().unwrap_or(443);
        Ok((host.to_string(), port))
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Filter expression passed to both the count and the list query
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Records requested per page (the `limit` argument)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl QueryConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=10_000).contains(&self.page_size) {
            return Err(format!(
                "query.page_size must be between 1 and 10000, got {}",
                self.page_size
            ));
        }

        if self.filter.contains(['"', '\\']) {
            return Err("query.filter cannot contain double quotes or backslashes".to_string());
        }

        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            page_size: default_page_size(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Number of concurrent page workers (0 = half the available cores)
    #[serde(default)]
    pub workers: usize,

    /// Attempts per page before it is dropped
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl ExportConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.workers > 64 {
            return Err(format!(
                "export.workers must be between 0 and 64, got {}",
                self.workers
            ));
        }

        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "export.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }

        Ok(())
    }

    /// Worker count for this run
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        (cores / 2).max(1)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV and archive are written to; a leading `~` is the home directory
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// File name prefix; the current date is appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Compress the CSV into a zip archive and delete the CSV
    #[serde(default = "default_true")]
    pub archive: bool,

    /// Extract today's CSV from today's archive before resuming
    #[serde(default = "default_true")]
    pub resume_from_archive: bool,
}

impl OutputConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.directory.is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }

        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err("output.file_prefix must be a non-empty plain file name".to_string());
        }

        Ok(())
    }

    /// Output directory with `~` expanded
    pub fn resolved_directory(&self) -> PathBuf {
        expand_home(&self.directory)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_prefix: default_file_prefix(),
            archive: true,
            resume_from_archive: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Expand a leading `~` using `HOME` (or `USERPROFILE` on Windows)
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };

    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match home {
        Some(home) => PathBuf::from(home).join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_graphql_path() -> String {
    "/graphql/caasm".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_trust_anchor_file() -> String {
    "vulnex-anchor.pem".to_string()
}

fn default_login_timeout_seconds() -> u64 {
    30
}

fn default_count_timeout_seconds() -> u64 {
    30
}

fn default_data_timeout_seconds() -> u64 {
    120
}

fn default_filter() -> String {
    "(affectsRunningKernel = True OR affectsRunningKernel NOT_EXISTS) AND lastFound IN_LAST 5d \
     AND status = Active AND targets.osType = Client"
        .to_string()
}

fn default_page_size() -> u64 {
    5000
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_output_directory() -> String {
    "~/Documents".to_string()
}

fn default_file_prefix() -> String {
    "host_vulnerabilities".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn api_config() -> ApiConfig {
        ApiConfig {
            base_url: "https://tenant.example.net".to_string(),
            graphql_path: default_graphql_path(),
            login_path: default_login_path(),
            username: "reportGenerator".to_string(),
            password: secret_string("pass".to_string()),
            tls_pin_certificate: true,
            trust_anchor_file: default_trust_anchor_file(),
            login_timeout_seconds: 30,
            count_timeout_seconds: 30,
            data_timeout_seconds: 120,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_config_validation() {
        let mut config = api_config();
        assert!(config.validate().is_ok());

        config.base_url = "ftp://tenant.example.net".to_string();
        assert!(config.validate().is_err());

        config = api_config();
        config.username = String::new();
        assert!(config.validate().is_err());

        config = api_config();
        config.password = secret_string(String::new());
        assert!(config.validate().is_err());

        config = api_config();
        config.trust_anchor_file = "../escape.pem".to_string();
        assert!(config.validate().is_err());

        config = api_config();
        config.data_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_urls() {
        let mut config = api_config();
        config.base_url = "https://tenant.example.net/".to_string();
        assert_eq!(
            config.graphql_url(),
            "https://tenant.example.net/graphql/caasm"
        );
        assert_eq!(config.login_url(), "https://tenant.example.net/api/auth/login");
        assert_eq!(
            config.host_and_port().unwrap(),
            ("tenant.example.net".to_string(), 443)
        );
    }

    #[test]
    fn test_pinning_skipped_for_plain_http() {
        let mut config = api_config();
        assert!(config.pins_certificate());

        config.base_url = "http://127.0.0.1:8080".to_string();
        assert!(!config.pins_certificate());
        assert_eq!(
            config.host_and_port().unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
    }

    #[test]
    fn test_query_config_validation() {
        let mut config = QueryConfig::default();
        assert!(config.validate().is_ok());

        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 5000;
        config.filter = "name = \"x\"".to_string();
        assert!(config.validate().is_err());

        config.filter = "name = x\\".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("backslashes"));
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = ExportConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.effective_workers() >= 1);

        config.workers = 4;
        assert_eq!(config.effective_workers(), 4);

        config.max_retries = 0;
        assert!(config.validate().is_err());

        config.max_retries = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_config_validation() {
        let mut config = OutputConfig::default();
        assert!(config.validate().is_ok());

        config.file_prefix = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/data"), PathBuf::from("/var/data"));
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home("~/Documents"),
                PathBuf::from(home).join("Documents")
            );
        }
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_page_size(), 5000);
        assert_eq!(default_max_retries(), 3);
        assert_eq!(default_retry_delay_ms(), 5000);
        assert_eq!(default_count_timeout_seconds(), 30);
        assert_eq!(default_data_timeout_seconds(), 120);
    }
}
