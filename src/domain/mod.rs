//! Domain models and types for Vulnex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Row model** ([`ColumnSet`], [`FlatRow`], [`Page`])
//! - **Error types** ([`VulnexError`], [`GraphQlError`], [`AuthError`])
//! - **Result type alias** ([`Result`])
//! - **Error context** ([`context::ResultExt`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VulnexError>`]:
//!
//! ```rust,no_run
//! use vulnex::domain::{VulnexError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = vulnex::config::load_config("vulnex.toml")?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod result;
pub mod row;

// Re-export commonly used types for convenience
pub use errors::{AuthError, GraphQlError, VulnexError};
pub use result::Result;
pub use row::{ColumnSet, FlatRow, Page, HOST_VULNERABILITY_COLUMNS};
