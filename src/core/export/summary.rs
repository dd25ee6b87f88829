//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use std::path::PathBuf;
use std::time::Duration;

/// A page that was given up on after exhausting its retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedPage {
    /// Offset the page was requested at
    pub offset: u64,

    /// Attempts made
    pub attempts: usize,

    /// Last error seen
    pub error: String,
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Record count reported by the API (0 when the count failed)
    pub total_count: u64,

    /// Rows already present in today's output before this run
    pub prior_rows: Option<u64>,

    /// Offsets scheduled for fetching
    pub pages_planned: usize,

    /// Pages fetched successfully
    pub pages_fetched: usize,

    /// Pages dropped after exhausting retries
    pub dropped_pages: Vec<DroppedPage>,

    /// Rows written to the CSV by this run
    pub rows_written: usize,

    /// Output already covered the full count; nothing was fetched
    pub up_to_date: bool,

    /// Rows were fetched and flattened but not written
    pub dry_run: bool,

    /// CSV written by this run (deleted again when archived)
    pub csv_path: Option<PathBuf>,

    /// Archive produced by this run
    pub archive_path: Option<PathBuf>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            total_count: 0,
            prior_rows: None,
            pages_planned: 0,
            pages_fetched: 0,
            dropped_pages: Vec::new(),
            rows_written: 0,
            up_to_date: false,
            dry_run: false,
            csv_path: None,
            archive_path: None,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record a dropped page
    pub fn add_dropped_page(&mut self, page: DroppedPage) {
        self.dropped_pages.push(page);
    }

    /// Offsets of dropped pages, ascending
    pub fn dropped_offsets(&self) -> Vec<u64> {
        let mut offsets: Vec<u64> = self.dropped_pages.iter().map(|p| p.offset).collect();
        offsets.sort_unstable();
        offsets
    }

    /// No dropped pages and no recorded errors
    pub fn is_successful(&self) -> bool {
        self.dropped_pages.is_empty() && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_count = self.total_count,
            prior_rows = ?self.prior_rows,
            pages_planned = self.pages_planned,
            pages_fetched = self.pages_fetched,
            pages_dropped = self.dropped_pages.len(),
            rows_written = self.rows_written,
            up_to_date = self.up_to_date,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        if let Some(path) = &self.archive_path {
            tracing::info!(archive = %path.display(), "Output archived");
        } else if let Some(path) = &self.csv_path {
            tracing::info!(csv = %path.display(), "Output written");
        }

        if !self.dropped_pages.is_empty() {
            tracing::error!(
                offsets = ?self.dropped_offsets(),
                "Pages dropped; output is incomplete"
            );
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = ?error.context,
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Count query failed
    Count,
    /// Trust anchor cleanup failed
    Cleanup,
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g. offset, file path)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}
