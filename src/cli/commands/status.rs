//! Status command implementation
//!
//! This module implements the `status` command for displaying the output
//! files of a day and how many rows they already hold.

use super::parse_date;
use crate::config::load_config;
use crate::core::state::{ProgressSource, StateManager};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Day to inspect, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let date = match &self.date {
            Some(value) => match parse_date(value) {
                Ok(date) => date,
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(2);
                }
            },
            None => chrono::Local::now().date_naive(),
        };

        let state = StateManager::new(&config.output, date);
        let paths = state.paths();

        println!("Date: {}", date.format("%Y-%m-%d"));
        println!(
            "  CSV:     {} ({})",
            paths.csv.display(),
            presence(paths.csv.exists())
        );
        println!(
            "  Archive: {} ({})",
            paths.archive.display(),
            presence(paths.archive.exists())
        );
        println!();

        let progress = match state.load_progress() {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Failed to read existing output");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        match progress {
            Some(progress) => {
                let source = match progress.source {
                    ProgressSource::Csv => "CSV",
                    ProgressSource::Archive => "archive",
                };
                println!("Rows exported: {} (from {source})", progress.rows);
                println!("The next export appends from row {}.", progress.rows);
            }
            None => {
                println!("No export found for this day.");
                println!("Run 'vulnex export' to start exporting data.");
            }
        }

        println!();
        Ok(0)
    }
}

fn presence(exists: bool) -> &'static str {
    if exists {
        "✅ present"
    } else {
        "missing"
    }
}
