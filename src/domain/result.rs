//! Result type alias for Vulnex
//!
//! This module provides a convenient Result type alias that uses VulnexError
//! as the error type.

use super::errors::VulnexError;

/// Result type alias for Vulnex operations
///
/// # Examples
///
/// ```
/// use vulnex::domain::result::Result;
/// use vulnex::domain::errors::VulnexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(VulnexError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VulnexError>;
