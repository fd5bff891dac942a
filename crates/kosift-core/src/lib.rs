//! KOSIFT Core Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Parsing and classification of hmmsearch tabular hit reports against
//! per-gene-family detection thresholds.
//!
//! # Overview
//!
//! This crate provides the building blocks shared by the KOSIFT tools:
//!
//! - **Report Parsing**: lazy, fail-fast parsing of `--tblout` hit reports
//! - **Threshold Tables**: loaders for the curated hmm table template and the
//!   KOfam ko list, normalized into one keyed table
//! - **Classification**: per-hit pass/fail judgment with explicit table
//!   precedence and a default fallback spec
//! - **Error Handling**: custom error and result types
//! - **Logging**: tracing subscriber setup for the binaries
//!
//! # Example
//!
//! ```no_run
//! use kosift_core::classify::{classify, Resolver};
//! use kosift_core::config::TableConfig;
//! use kosift_core::threshold::{load_merged, LoadOptions};
//! use kosift_core::Result;
//!
//! fn significant_hits(report: &str) -> Result<usize> {
//!     let config = TableConfig::from_env();
//!     let merged = load_merged(&config, &LoadOptions::default())?;
//!     let resolver = Resolver::new(merged.table);
//!
//!     let mut passing = 0;
//!     for result in classify(report, &resolver) {
//!         if result?.passed {
//!             passing += 1;
//!         }
//!     }
//!     Ok(passing)
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod tblout;
pub mod threshold;

// Re-export commonly used types
pub use classify::{classify, Classification, Resolver};
pub use error::{KosiftError, Result};
pub use tblout::{parse_tblout, HitRecord};
pub use threshold::{load_merged, LoadOptions, ScoreKind, ThresholdSpec, ThresholdTable};
