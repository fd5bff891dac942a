//! KOSIFT CLI Library
//!
//! Command-line interface for classifying hmmsearch hit reports.
//!
//! # Overview
//!
//! - **Classification**: judge every hit of a `--tblout` report against its
//!   family threshold (`kosift classify`)
//! - **Table Inspection**: look up or dump the merged threshold table
//!   (`kosift thresholds show/dump`)

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kosift_core::config::TableConfig;
use kosift_core::ThresholdSpec;

/// KOSIFT - hmmsearch hit significance classifier
#[derive(Parser, Debug)]
#[command(name = "kosift")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the hits of a tabular report against family thresholds
    Classify {
        /// hmmsearch --tblout report file
        report: PathBuf,

        #[command(flatten)]
        tables: TableArgs,

        /// Threshold spec applied to families absent from the tables
        #[arg(long, default_value = "50|full")]
        default_spec: ThresholdSpec,

        /// Translate target names through the hmm-to-family map before lookup
        #[arg(long)]
        by_hmm_name: bool,

        /// Only emit hits that clear their threshold
        #[arg(long)]
        passing_only: bool,

        /// Output format
        #[arg(long, default_value = "tsv")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect the merged threshold table
    Thresholds {
        #[command(subcommand)]
        command: ThresholdsCommand,
    },
}

/// Threshold table subcommands
#[derive(Subcommand, Debug)]
pub enum ThresholdsCommand {
    /// Show the spec governing one gene family
    Show {
        /// Gene family identifier (KO code)
        ko: String,

        #[command(flatten)]
        tables: TableArgs,
    },

    /// Dump the merged table as TSV, sorted by family
    Dump {
        #[command(flatten)]
        tables: TableArgs,
    },
}

/// Reference table locations, shared by all subcommands
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Installation root holding the reference tables
    #[arg(long, env = "KOSIFT_HOME", default_value = ".")]
    pub root: PathBuf,

    /// hmm table template path (overrides the root-relative default)
    #[arg(long, env = "KOSIFT_HMM_TABLE")]
    pub hmm_table: Option<PathBuf>,

    /// ko list path (overrides the root-relative default)
    #[arg(long, env = "KOSIFT_KO_LIST")]
    pub ko_list: Option<PathBuf>,
}

impl TableArgs {
    /// Resolve the arguments into a table configuration
    pub fn to_config(&self) -> TableConfig {
        let mut config = TableConfig::new().with_root(&self.root);
        if let Some(path) = &self.hmm_table {
            config = config.with_hmm_table(path);
        }
        if let Some(path) = &self.ko_list {
            config = config.with_ko_list(path);
        }
        config
    }
}

/// Classification output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated values with a header line
    Tsv,
    /// Pretty-printed JSON array
    Json,
}
