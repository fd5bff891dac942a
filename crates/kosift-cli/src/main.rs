//! KOSIFT CLI - Main entry point

use clap::Parser;
use kosift_cli::{Cli, Commands, ThresholdsCommand};
use kosift_core::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging based on verbose flag; environment variables win
    let base = if cli.verbose {
        LogConfig::with_level(LogLevel::Debug)
    } else {
        LogConfig::with_level(LogLevel::Warn)
    };
    let log_config = base.clone().apply_env().unwrap_or(base);

    // Initialize logging (ignore errors as the CLI should work without logging)
    let _ = init_logging(&log_config);

    // Execute command
    if let Err(e) = execute_command(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Classify {
            report,
            tables,
            default_spec,
            by_hmm_name,
            passing_only,
            format,
            output,
        } => kosift_cli::commands::classify::run(
            report,
            tables,
            *default_spec,
            *by_hmm_name,
            *passing_only,
            *format,
            output.as_deref(),
        ),

        Commands::Thresholds { command } => match command {
            ThresholdsCommand::Show { ko, tables } => {
                kosift_cli::commands::thresholds::show(ko, tables)
            },
            ThresholdsCommand::Dump { tables } => kosift_cli::commands::thresholds::dump(tables),
        },
    }
}
