//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Vulnex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Vulnex - host vulnerability export tool
#[derive(Parser, Debug)]
#[command(name = "vulnex")]
#[command(version, about, long_about = None)]
#[command(author = "Vulnex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vulnex.toml", env = "VULNEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VULNEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export host vulnerabilities to today's CSV and archive
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show today's output files and row count
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
