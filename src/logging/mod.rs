//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - human-readable console output
//! - optional JSON file logging with rotation
//! - configurable log levels (`RUST_LOG` wins when set)
//!
//! # Example
//!
//! ```no_run
//! use vulnex::logging::init_logging;
//! use vulnex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(offset = 5000u64, "Fetching page");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a fetched page
///
/// # Example
///
/// ```no_run
/// use vulnex::log_page_fetched;
///
/// log_page_fetched!(10000u64, 4980usize, 5000usize);
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($offset:expr, $records:expr, $rows:expr) => {
        tracing::info!(
            offset = $offset,
            records = $records,
            rows = $rows,
            "Page fetched"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use vulnex::log_error_with_context;
/// use vulnex::domain::VulnexError;
///
/// let error = VulnexError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use vulnex::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}
