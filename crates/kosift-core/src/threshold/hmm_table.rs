//! Curated hmm table template loader
//!
//! Parses the tab-separated template that groups, per curated function, the
//! hmm profile files, their corresponding KO codes, and their detection
//! thresholds:
//!
//! ```text
//! Gene abbreviation	Hmm file	Corresponding KO	Hmm detecting threshold	#Entry
//! amoA	amoA.hmm	K10944	160.9|full	M00528
//! hao	hao.hmm, hzo.hmm	K10535, K10535	423.5|full, 423.5|full	M00528
//! ```
//!
//! Multi-value cells are `", "`-joined parallel lists: the i-th hmm, i-th KO,
//! and i-th threshold string across the three lists form one expanded row.
//! The missing-value marker is the literal `N/A`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KosiftError, Result};

use super::{HmmToFamilyMap, LoadOptions, ThresholdSpec, ThresholdTable};

/// Required column: hmm profile file names
const COL_HMM_FILE: &str = "Hmm file";
/// Required column: KO codes, parallel to the hmm files
const COL_KO: &str = "Corresponding KO";
/// Required column: `value|kind` threshold strings, parallel to the hmm files
const COL_THRESHOLD: &str = "Hmm detecting threshold";
/// Required column: database entry the grouping belongs to
const COL_ENTRY: &str = "#Entry";

/// Missing-value marker used by the template
const NA_MARKER: &str = "N/A";

/// One expanded row of the template: a single hmm profile with its family
/// and threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmTableRow {
    /// hmm profile file name
    pub hmm: String,
    /// Owning gene family (KO code)
    pub ko: String,
    /// Detection threshold for this profile's family
    pub spec: ThresholdSpec,
    /// Database entry of the source grouping
    pub entry: String,
}

/// Loaded and expanded hmm table template
///
/// The derived threshold table and the hmm-to-family map are computed once
/// at construction and never recomputed.
#[derive(Debug, Clone)]
pub struct HmmTable {
    rows: Vec<HmmTableRow>,
    table: ThresholdTable,
    families: HmmToFamilyMap,
}

impl HmmTable {
    /// Load a template file
    ///
    /// The file is read fully into memory (the handle is closed once read),
    /// then parsed.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading hmm table template");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, options)
    }

    /// Parse template content
    pub fn parse(content: &str, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let required = [COL_HMM_FILE, COL_KO, COL_THRESHOLD, COL_ENTRY];
        let missing: Vec<&str> = required.iter().copied().filter(|c| column(c).is_none()).collect();
        if !missing.is_empty() {
            return Err(KosiftError::schema(format!(
                "hmm table template is missing columns: {}",
                missing.join(", ")
            )));
        }

        // Presence checked above
        let hmm_idx = column(COL_HMM_FILE).ok_or_else(|| KosiftError::schema(COL_HMM_FILE))?;
        let ko_idx = column(COL_KO).ok_or_else(|| KosiftError::schema(COL_KO))?;
        let threshold_idx = column(COL_THRESHOLD).ok_or_else(|| KosiftError::schema(COL_THRESHOLD))?;
        let entry_idx = column(COL_ENTRY).ok_or_else(|| KosiftError::schema(COL_ENTRY))?;

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // Header occupies line 1
            let line_no = idx + 2;

            let cell = |i: usize| record.get(i).unwrap_or("").trim();
            let hmm_cell = cell(hmm_idx);
            let ko_cell = cell(ko_idx);
            let threshold_cell = cell(threshold_idx);
            let entry_cell = cell(entry_idx);

            // Rows with a missing value in any required column carry no
            // usable threshold and are dropped.
            if [hmm_cell, ko_cell, threshold_cell, entry_cell]
                .iter()
                .any(|c| c.is_empty() || *c == NA_MARKER)
            {
                continue;
            }

            rows.extend(Self::expand_row(
                hmm_cell,
                ko_cell,
                threshold_cell,
                entry_cell,
                line_no,
                options,
            )?);
        }

        let table = ThresholdTable::from_rows(rows.iter().map(|r| (r.ko.clone(), r.spec)));
        let families: HmmToFamilyMap = rows
            .iter()
            .map(|r| (r.hmm.clone(), r.ko.clone()))
            .collect();

        debug!(
            expanded_rows = rows.len(),
            families = families.len(),
            entries = table.len(),
            "parsed hmm table template"
        );

        Ok(Self {
            rows,
            table,
            families,
        })
    }

    /// Expand one template row's parallel lists into per-profile rows
    fn expand_row(
        hmm_cell: &str,
        ko_cell: &str,
        threshold_cell: &str,
        entry_cell: &str,
        line_no: usize,
        options: &LoadOptions,
    ) -> Result<Vec<HmmTableRow>> {
        let hmms: Vec<&str> = hmm_cell.split(", ").collect();
        let kos: Vec<&str> = ko_cell.split(", ").collect();
        let thresholds: Vec<&str> = threshold_cell.split(", ").collect();

        if hmms.len() != kos.len() || hmms.len() != thresholds.len() {
            return Err(KosiftError::schema(format!(
                "line {}: parallel lists disagree ({} hmm files, {} KOs, {} thresholds)",
                line_no,
                hmms.len(),
                kos.len(),
                thresholds.len()
            )));
        }

        hmms.into_iter()
            .zip(kos)
            .zip(thresholds)
            .map(|((hmm, ko), threshold)| {
                let spec = Self::parse_threshold_cell(threshold, options)?;
                Ok(HmmTableRow {
                    hmm: hmm.trim().to_string(),
                    ko: ko.trim().to_string(),
                    spec,
                    entry: entry_cell.to_string(),
                })
            })
            .collect()
    }

    /// Parse one `value|kind` threshold string, honoring the placeholder
    fn parse_threshold_cell(cell: &str, options: &LoadOptions) -> Result<ThresholdSpec> {
        let cell = cell.trim();
        if cell == options.placeholder {
            return Ok(options.default_spec);
        }
        let (value, kind) = cell
            .split_once('|')
            .ok_or_else(|| KosiftError::format(cell, "expected 'value|kind'"))?;
        options.spec_from_cells(value, kind)
    }

    /// Expanded per-profile rows in template order
    pub fn rows(&self) -> &[HmmTableRow] {
        &self.rows
    }

    /// Family thresholds derived from the expanded rows
    pub fn threshold_table(&self) -> &ThresholdTable {
        &self.table
    }

    /// Profile name to family translation
    pub fn hmm_to_family(&self) -> &HmmToFamilyMap {
        &self.families
    }
}
