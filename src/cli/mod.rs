//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Glucotel using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Glucotel - Gestational diabetes tele-monitoring core
#[derive(Parser, Debug)]
#[command(name = "glucotel")]
#[command(version, about, long_about = None)]
#[command(author = "Glucotel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "glucotel.toml", env = "GLUCOTEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GLUCOTEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute monitoring overviews (compliance + risk) from the store
    Report(commands::report::ReportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
