//! Error context extension trait
//!
//! `.context()` / `.with_context()` for `Result<T, E>` where `E` converts into
//! [`VulnexError`], so library code can annotate failures without leaving the
//! domain error type.
//!
//! # Examples
//!
//! ```rust
//! use vulnex::domain::Result;
//! use vulnex::domain::context::ResultExt;
//!
//! fn read_csv(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::VulnexError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<VulnexError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Keep the variant for the error kinds callers branch on
fn wrap(error: VulnexError, context: impl std::fmt::Display) -> VulnexError {
    match error {
        VulnexError::Csv(message) => VulnexError::Csv(format!("{context}: {message}")),
        VulnexError::Archive(message) => VulnexError::Archive(format!("{context}: {message}")),
        VulnexError::Io(message) => VulnexError::Io(format!("{context}: {message}")),
        other => VulnexError::Other(format!("{context}: {other}")),
    }
}
