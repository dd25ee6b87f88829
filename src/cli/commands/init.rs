//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vulnex.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Vulnex configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tenant URL and user", self.output);
                println!("  2. Put VULNEX_API_PASSWORD in a .env file or the environment");
                println!("  3. Validate configuration: vulnex validate-config");
                println!("  4. Run export: vulnex export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Vulnex Configuration File
# Host vulnerability export to CSV

[application]
log_level = "info"
dry_run = false

[api]
base_url = "https://tenant.example.net"
username = "reportGenerator"
password = "${VULNEX_API_PASSWORD}"

[query]
page_size = 5000

[export]
workers = 0
max_retries = 3
retry_delay_ms = 5000

[output]
directory = "~/Documents"
file_prefix = "WorkStations_AVR"
archive = true

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Vulnex Configuration File
# Host vulnerability export to CSV
#
# Every value below may also be set through the environment as
# VULNEX_<SECTION>_<KEY>, e.g. VULNEX_EXPORT_WORKERS=4.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (fetch and flatten, but write nothing)
dry_run = false

# ============================================================================
# GraphQL API
# ============================================================================
[api]
# Base URL of the tenant
base_url = "https://tenant.example.net"

# Endpoint paths
graphql_path = "/graphql/caasm"
login_path = "/api/auth/login"

# Credentials (keep the password out of this file)
username = "reportGenerator"
password = "${VULNEX_API_PASSWORD}"

# Fetch the server's certificate chain before login and trust only that chain
tls_pin_certificate = true

# File name of the pinned chain in the system temp directory
trust_anchor_file = "vulnex-anchor.pem"

# Timeouts in seconds
login_timeout_seconds = 30
count_timeout_seconds = 30
data_timeout_seconds = 120

# ============================================================================
# Query
# ============================================================================
[query]
# Filter passed to both the count and the list query
filter = "(affectsRunningKernel = True OR affectsRunningKernel NOT_EXISTS) AND lastFound IN_LAST 5d AND status = Active AND targets.osType = Client"

# Records per page (1-10000)
page_size = 5000

# ============================================================================
# Export
# ============================================================================
[export]
# Concurrent page workers (0 = half the available cores)
workers = 0

# Attempts per page before it is dropped (1-10)
max_retries = 3

# Fixed delay between attempts in milliseconds
retry_delay_ms = 5000

# ============================================================================
# Output
# ============================================================================
[output]
# Directory for <file_prefix>_<YYYY-MM-DD>.csv and .zip
directory = "~/Documents"
file_prefix = "WorkStations_AVR"

# Compress the CSV into a zip archive and delete the CSV
archive = true

# Count rows in today's archive and resume from there
resume_from_archive = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files next to the console output
local_enabled = false
local_path = "logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
