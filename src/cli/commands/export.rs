//! Export command implementation
//!
//! This module implements the `export` command: fetch host vulnerabilities
//! from the GraphQL API into today's CSV and archive it.

use super::parse_date;
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::domain::VulnexError;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dry run mode - fetch and flatten, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Override the number of page workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Keep the CSV instead of compressing it
    #[arg(long)]
    pub no_archive: bool,

    /// Write to (or resume) the output of another day, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(workers) = self.workers {
            tracing::info!(workers = workers, "Overriding worker count from CLI");
            config.export.workers = workers;
        }

        if self.no_archive {
            tracing::info!("Disabling archiving from CLI");
            config.output.archive = false;
        }

        let date = match self.date.as_deref().map(parse_date).transpose() {
            Ok(date) => date,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written");
            println!();
        }

        let mut coordinator = ExportCoordinator::new(config);
        if let Some(date) = date {
            coordinator = coordinator.with_date(date);
        }

        tracing::info!("Executing export");
        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        summary.log_summary();
        print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1 // Partial success
        };

        Ok(exit_code)
    }
}

/// 2 configuration, 4 authentication or connection, 5 anything else
pub(crate) fn exit_code_for_error(error: &VulnexError) -> i32 {
    match error {
        VulnexError::Configuration(_) => 2,
        VulnexError::Auth(_) | VulnexError::GraphQl(_) => 4,
        _ => 5,
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Records reported: {}", summary.total_count);
    match summary.prior_rows {
        Some(rows) => println!("  Rows already exported today: {rows}"),
        None => println!("  Rows already exported today: none"),
    }
    println!("  Pages planned: {}", summary.pages_planned);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Pages dropped: {}", summary.dropped_pages.len());
    println!("  Rows written: {}", summary.rows_written);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if summary.up_to_date {
        println!("  Output already up to date");
    }
    if let Some(path) = &summary.archive_path {
        println!("  Archive: {}", path.display());
    } else if let Some(path) = &summary.csv_path {
        println!("  CSV: {}", path.display());
    }
    println!();

    if !summary.dropped_pages.is_empty() {
        println!("⚠️  Dropped pages (offsets): {:?}", summary.dropped_offsets());
        for dropped in &summary.dropped_pages {
            println!(
                "  - offset {} after {} attempts: {}",
                dropped.offset, dropped.attempts, dropped.error
            );
        }
        println!();
    }

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}
