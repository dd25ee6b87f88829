//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod status;
pub mod validate;

use chrono::NaiveDate;

/// Parse a `--date` argument (`YYYY-MM-DD`)
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{value}' (expected YYYY-MM-DD): {e}"))
}
