// Vulnex - Host Vulnerability Export Tool
// Copyright (c) 2025 Vulnex Contributors
// Licensed under the MIT License

//! # Vulnex - Host Vulnerability Export
//!
//! Vulnex pulls the host vulnerability inventory out of a vendor GraphQL API
//! and lands it as a dated CSV, compressed into a zip archive.
//!
//! ## Overview
//!
//! A run:
//! - **Authenticates** by pinning the server's certificate chain and logging in
//! - **Counts** the records matching the configured filter
//! - **Fetches** the pages concurrently, retrying each page a fixed number of times
//! - **Flattens** every record into one row per target with 25 fixed columns
//! - **Persists** the rows to `<prefix>_<YYYY-MM-DD>.csv` and archives it
//! - **Resumes** from the rows already exported today
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export, transform, persist, state)
//! - [`adapters`] - External integrations (authentication, GraphQL, HTTP)
//! - [`domain`] - Row model and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vulnex::config::load_config;
//! use vulnex::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("vulnex.toml")?;
//!     let coordinator = ExportCoordinator::new(config);
//!
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Wrote {} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Flattening
//!
//! ```rust
//! use vulnex::core::transform::RowFlattener;
//! use serde_json::json;
//!
//! let flattener = RowFlattener::host_vulnerability();
//! let record = json!({
//!     "primaryConsolidationKey": "k1",
//!     "definition": { "qid": 1, "cves": [{ "uid": "CVE-1" }, { "uid": "CVE-2" }] },
//!     "targets": [{ "name": "a" }, { "name": "b" }]
//! });
//!
//! let rows = flattener.flatten_record(&record).unwrap();
//! assert_eq!(rows.len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`] with [`domain::VulnexError`]; the
//! binary maps failures to exit codes.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
