//! Export orchestration
//!
//! This module provides the core export logic for Vulnex, including:
//! - Record counting and page fetching with retries
//! - The bounded worker pool
//! - Export coordination and the run summary

pub mod coordinator;
pub mod fetcher;
pub mod pool;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use fetcher::{count_records, PageFetcher, PageOutcome, RetryPolicy};
pub use pool::{PoolOutput, WorkerPool};
pub use summary::{DroppedPage, ExportError, ExportErrorType, ExportSummary};
