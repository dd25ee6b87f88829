//! Configuration management for Vulnex.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Vulnex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VULNEX_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`ApiConfig`] - Endpoint, credentials, certificate pinning, timeouts
//! - [`QueryConfig`] - Filter expression and page size
//! - [`ExportConfig`] - Worker count and retry policy
//! - [`OutputConfig`] - Output directory, file prefix, archiving
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://tenant.example.net"
//! username = "reportGenerator"
//! password = "${VULNEX_API_PASSWORD}"
//!
//! [query]
//! page_size = 5000
//!
//! [export]
//! max_retries = 3
//! retry_delay_ms = 5000
//!
//! [output]
//! directory = "~/Documents"
//! file_prefix = "WorkStations_AVR"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, LoggingConfig, OutputConfig, QueryConfig,
    VulnexConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
