//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Vulnex configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  GraphQL Endpoint: {}", config.api.graphql_url());
        println!("  Login Endpoint: {}", config.api.login_url());
        println!("  Username: {}", config.api.username);
        println!("  Certificate Pinning: {}", config.api.pins_certificate());
        println!("  Filter: {}", config.query.filter);
        println!("  Page Size: {}", config.query.page_size);
        println!("  Workers: {}", config.export.effective_workers());
        println!(
            "  Retries: {} attempts, {}ms apart",
            config.export.max_retries, config.export.retry_delay_ms
        );
        println!(
            "  Output Directory: {}",
            config.output.resolved_directory().display()
        );
        println!("  File Prefix: {}", config.output.file_prefix);
        println!("  Archive: {}", config.output.archive);
        println!();
        Ok(0)
    }
}
