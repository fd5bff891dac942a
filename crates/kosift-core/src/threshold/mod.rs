//! Gene-family detection thresholds
//!
//! A family (KO) maps to a [`ThresholdSpec`]: a score cutoff plus the scoring
//! basis it applies to (full sequence or best single domain). Specs are loaded
//! from reference tables in two layouts, normalized into one
//! [`ThresholdTable`], and merged with explicit precedence.

pub mod hmm_table;
pub mod ko_list;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TableConfig;
use crate::error::{KosiftError, Result};
use crate::tblout::HitRecord;

pub use hmm_table::HmmTable;
pub use ko_list::KoList;

/// Scoring basis a threshold applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Compare against the full sequence score
    #[default]
    Full,
    /// Compare against the best single domain score
    Domain,
}

impl FromStr for ScoreKind {
    type Err = KosiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(ScoreKind::Full),
            "domain" => Ok(ScoreKind::Domain),
            other => Err(KosiftError::format(other, "score kind must be 'full' or 'domain'")),
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKind::Full => write!(f, "full"),
            ScoreKind::Domain => write!(f, "domain"),
        }
    }
}

/// A detection threshold: cutoff value plus the score it is applied to
///
/// The textual form is `"{threshold}|{kind}"` (e.g. `50|full`,
/// `362.77|domain`); parsing and display round-trip exactly for canonical
/// forms. This is also the only serialized form: serde goes through the
/// same string representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSpec {
    /// Score cutoff. Finite and non-negative in practice.
    pub threshold: f64,
    /// Which score the cutoff applies to
    pub kind: ScoreKind,
}

impl Serialize for ThresholdSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ThresholdSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            kind: ScoreKind::Full,
        }
    }
}

impl ThresholdSpec {
    /// Create a new ThresholdSpec
    pub fn new(threshold: f64, kind: ScoreKind) -> Self {
        Self { threshold, kind }
    }

    /// Whether a hit clears this threshold
    ///
    /// Strict greater-than: a score equal to the cutoff fails.
    pub fn check(&self, hit: &HitRecord) -> bool {
        match self.kind {
            ScoreKind::Full => hit.full_sequence.score > self.threshold,
            ScoreKind::Domain => hit.best_domain.score > self.threshold,
        }
    }

    /// Render this spec as hmmsearch cutoff arguments
    ///
    /// Full sequence thresholds map to `-T`, domain thresholds to `--domT`.
    pub fn hmmsearch_args(&self) -> String {
        match self.kind {
            ScoreKind::Full => format!("-T {}", self.threshold),
            ScoreKind::Domain => format!("--domT {}", self.threshold),
        }
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.threshold, self.kind)
    }
}

impl FromStr for ThresholdSpec {
    type Err = KosiftError;

    fn from_str(s: &str) -> Result<Self> {
        let (value, kind) = s
            .split_once('|')
            .ok_or_else(|| KosiftError::format(s, "expected 'value|kind'"))?;
        let threshold: f64 = value
            .parse()
            .map_err(|_| KosiftError::format(s, format!("invalid threshold value '{value}'")))?;
        let kind = kind.parse()?;
        Ok(Self { threshold, kind })
    }
}

/// Replace a placeholder cell with its default text
///
/// Reference tables mark "use the default" with a placeholder (usually `-`);
/// any other cell value is passed through untouched.
pub fn normalize_cell<'a>(cell: &'a str, placeholder: &str, default_text: &'a str) -> &'a str {
    if cell == placeholder {
        default_text
    } else {
        cell
    }
}

/// Placeholder replacement policy applied while loading reference tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Cell text meaning "use the default" (threshold and score-kind columns)
    pub placeholder: String,
    /// Spec substituted for placeholder cells
    pub default_spec: ThresholdSpec,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            placeholder: "-".to_string(),
            default_spec: ThresholdSpec::default(),
        }
    }
}

impl LoadOptions {
    /// Build a spec from raw threshold and score-kind cells, applying the
    /// placeholder replacement to each cell independently
    pub fn spec_from_cells(&self, threshold_cell: &str, kind_cell: &str) -> Result<ThresholdSpec> {
        let default_threshold = self.default_spec.threshold.to_string();
        let default_kind = self.default_spec.kind.to_string();

        let threshold_text = normalize_cell(threshold_cell.trim(), &self.placeholder, &default_threshold);
        let kind_text = normalize_cell(kind_cell.trim(), &self.placeholder, &default_kind);

        let threshold: f64 = threshold_text.parse().map_err(|_| {
            KosiftError::format(threshold_cell, "invalid threshold value")
        })?;
        let kind = kind_text.parse()?;
        Ok(ThresholdSpec { threshold, kind })
    }
}

/// Mapping from gene-family identifier (KO) to its detection threshold
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdTable {
    entries: HashMap<String, ThresholdSpec>,
}

impl ThresholdTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from normalized `(key, spec)` rows
    ///
    /// Rows identical on `(key, threshold, kind)` collapse to one entry.
    /// A key that still maps to conflicting specs resolves to the last row
    /// in table order; the conflict is logged, not raised.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, ThresholdSpec)>) -> Self {
        let mut table = Self::new();
        for (key, spec) in rows {
            table.insert(key, spec);
        }
        table
    }

    /// Insert one normalized row, last-write-wins on conflict
    pub fn insert(&mut self, key: String, spec: ThresholdSpec) {
        if let Some(existing) = self.entries.get(&key) {
            if *existing != spec {
                warn!(
                    key = %key,
                    previous = %existing,
                    replacement = %spec,
                    "conflicting threshold rows for key; keeping the last one"
                );
            }
        }
        self.entries.insert(key, spec);
    }

    /// Look up the spec for a family identifier
    pub fn get(&self, key: &str) -> Option<&ThresholdSpec> {
        self.entries.get(key)
    }

    /// Whether the table contains a family identifier
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, spec)` entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay another table onto this one
    ///
    /// On key collision the other table's entry wins. This is the precedence
    /// step between whole sources; conflicts inside a single source are
    /// already resolved by [`ThresholdTable::from_rows`].
    pub fn merge(&mut self, other: ThresholdTable) {
        self.entries.extend(other.entries);
    }
}

/// Mapping from a profile (hmm) name to its owning gene family
///
/// Used to translate a raw target name into the family key when threshold
/// tables are keyed by family rather than by profile name.
pub type HmmToFamilyMap = HashMap<String, String>;

/// The merged reference sources used by the classification pipeline
#[derive(Debug, Clone)]
pub struct MergedThresholds {
    /// Family thresholds, curated template overlaid with the ko list
    pub table: ThresholdTable,
    /// Profile name to family translation from the curated template
    pub families: HmmToFamilyMap,
}

/// Load both reference tables from the configured paths and merge them
///
/// The curated hmm table template loads first; the ko list overlays it, so
/// ko list entries win on key collision.
pub fn load_merged(config: &TableConfig, options: &LoadOptions) -> Result<MergedThresholds> {
    let hmm_table = HmmTable::from_path(config.hmm_table_path(), options)?;
    let ko_list = KoList::from_path(config.ko_list_path(), options)?;

    let mut table = hmm_table.threshold_table().clone();
    table.merge(ko_list.threshold_table().clone());
    debug!(
        template_entries = hmm_table.threshold_table().len(),
        ko_list_entries = ko_list.threshold_table().len(),
        merged_entries = table.len(),
        "merged reference tables"
    );

    Ok(MergedThresholds {
        table,
        families: hmm_table.hmm_to_family().clone(),
    })
}
