//! `kosift thresholds` - inspect the merged threshold table

use anyhow::Result;

use kosift_core::threshold::{load_merged, LoadOptions, ThresholdSpec};

use crate::TableArgs;

/// Show the spec governing one gene family
pub fn show(ko: &str, tables: &TableArgs) -> Result<()> {
    let merged = load_merged(&tables.to_config(), &LoadOptions::default())?;

    match merged.table.get(ko) {
        Some(spec) => {
            println!("{}\t{}\t{}", ko, spec, spec.hmmsearch_args());
        },
        None => {
            let default = ThresholdSpec::default();
            println!("{}\t{} (default, not listed)\t{}", ko, default, default.hmmsearch_args());
        },
    }
    Ok(())
}

/// Dump the merged table as TSV, sorted by family identifier
pub fn dump(tables: &TableArgs) -> Result<()> {
    let merged = load_merged(&tables.to_config(), &LoadOptions::default())?;

    let mut entries: Vec<(&str, &ThresholdSpec)> = merged.table.iter().collect();
    entries.sort_by_key(|(ko, _)| *ko);

    println!("KO\tthreshold\tscore_type");
    for (ko, spec) in entries {
        println!("{}\t{}\t{}", ko, spec.threshold, spec.kind);
    }
    Ok(())
}
