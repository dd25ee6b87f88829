//! Core business logic for Vulnex.
//!
//! # Modules
//!
//! - [`export`] - Counting, paged fetching, worker pool and coordination
//! - [`transform`] - Record flattening into fixed-width rows
//! - [`persist`] - CSV writing and zip archiving
//! - [`state`] - Resume planning from today's output files
//!
//! # Export Workflow
//!
//! 1. **Authenticate**: Pin the server certificate chain and log in
//! 2. **Count**: Ask the API how many records match the filter
//! 3. **Plan**: Compare with rows already in today's CSV or archive
//! 4. **Fetch**: Pull the missing pages concurrently, retrying each page
//! 5. **Flatten**: Explode targets and reduce CVEs into CSV rows
//! 6. **Persist**: Write or append the CSV, then archive it
//! 7. **Report**: Log the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use vulnex::config::load_config;
//! use vulnex::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vulnex.toml")?;
//! let coordinator = ExportCoordinator::new(config);
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Rows written: {}", summary.rows_written);
//! println!("Dropped pages: {:?}", summary.dropped_offsets());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod persist;
pub mod state;
pub mod transform;
