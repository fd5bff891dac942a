//! `kosift classify` - judge report hits against family thresholds

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use kosift_core::classify::{classify, Classification, Resolver};
use kosift_core::threshold::{load_merged, LoadOptions};
use kosift_core::ThresholdSpec;

use crate::{OutputFormat, TableArgs};

/// Run the classify command
pub fn run(
    report: &Path,
    tables: &TableArgs,
    default_spec: ThresholdSpec,
    by_hmm_name: bool,
    passing_only: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = tables.to_config();
    let options = LoadOptions {
        default_spec,
        ..LoadOptions::default()
    };

    let merged = load_merged(&config, &options)?;
    info!(entries = merged.table.len(), "loaded threshold tables");

    let mut resolver = Resolver::new(merged.table).with_default_spec(default_spec);
    if by_hmm_name {
        resolver = resolver.with_families(merged.families);
    }

    let content = fs::read_to_string(report)
        .with_context(|| format!("Failed to read report '{}'", report.display()))?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file '{}'", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut total = 0usize;
    let mut passed = 0usize;

    match format {
        OutputFormat::Tsv => {
            writeln!(writer, "{}", Classification::tsv_header())?;
            for result in classify(&content, &resolver) {
                let classification = result?;
                total += 1;
                if classification.passed {
                    passed += 1;
                } else if passing_only {
                    continue;
                }
                writeln!(writer, "{}", classification.to_tsv())?;
            }
        },
        OutputFormat::Json => {
            let mut selected = Vec::new();
            for result in classify(&content, &resolver) {
                let classification = result?;
                total += 1;
                if classification.passed {
                    passed += 1;
                } else if passing_only {
                    continue;
                }
                selected.push(classification);
            }
            serde_json::to_writer_pretty(&mut writer, &selected)?;
            writeln!(writer)?;
        },
    }

    writer.flush()?;
    info!(total, passed, "classification complete");
    Ok(())
}
