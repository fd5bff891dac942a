//! Hit classification pipeline
//!
//! Combines the report parser with a resolved threshold table: each parsed
//! hit is looked up (or defaulted) and judged against its family's threshold,
//! yielding one classification per input line in input order.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tblout::{parse_tblout, HitRecord, HitRecords};
use crate::threshold::{HmmToFamilyMap, ThresholdSpec, ThresholdTable};

/// Resolves the threshold spec governing a hit
///
/// Lookup failure is not an error: a target name absent from the table
/// silently resolves to the default spec.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: ThresholdTable,
    default_spec: ThresholdSpec,
    families: Option<HmmToFamilyMap>,
}

impl Resolver {
    /// Create a resolver over a merged threshold table
    pub fn new(table: ThresholdTable) -> Self {
        Self {
            table,
            default_spec: ThresholdSpec::default(),
            families: None,
        }
    }

    /// Set the spec used for names absent from the table
    pub fn with_default_spec(mut self, spec: ThresholdSpec) -> Self {
        self.default_spec = spec;
        self
    }

    /// Translate target names through a profile-to-family map before lookup
    ///
    /// Needed when the table is keyed by family but the report's target
    /// names are profile names.
    pub fn with_families(mut self, families: HmmToFamilyMap) -> Self {
        self.families = Some(families);
        self
    }

    /// The merged table this resolver reads
    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    /// The fallback spec for unlisted names
    pub fn default_spec(&self) -> &ThresholdSpec {
        &self.default_spec
    }

    /// The spec governing a target name
    pub fn spec_for(&self, target_name: &str) -> &ThresholdSpec {
        let key = self
            .families
            .as_ref()
            .and_then(|map| map.get(target_name))
            .map(String::as_str)
            .unwrap_or(target_name);
        self.table.get(key).unwrap_or(&self.default_spec)
    }

    /// Classify a single hit
    pub fn classify(&self, record: HitRecord) -> Classification {
        let spec = *self.spec_for(&record.target.name);
        let passed = spec.check(&record);
        Classification {
            record,
            spec,
            passed,
        }
    }
}

/// One classified hit: the record, the spec it was judged against, and the
/// verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub record: HitRecord,
    pub spec: ThresholdSpec,
    pub passed: bool,
}

impl Classification {
    /// Convert to TSV format (without header)
    pub fn to_tsv(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.record.target.name,
            self.record.query.name,
            self.record.full_sequence.score,
            self.record.best_domain.score,
            self.spec,
            if self.passed { "pass" } else { "fail" }
        )
    }

    /// Get TSV header
    pub fn tsv_header() -> String {
        "target\tquery\tfull_score\tdomain_score\tthreshold\tstatus".to_string()
    }

    /// Convert to JSON format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Lazy classification pipeline over a report
///
/// Wraps [`HitRecords`] and judges each record as it is pulled; input order
/// is preserved and the first malformed line ends the sequence.
#[derive(Debug)]
pub struct Classifications<'a> {
    records: HitRecords<'a>,
    resolver: &'a Resolver,
}

impl<'a> Iterator for Classifications<'a> {
    type Item = Result<Classification>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|result| result.map(|record| self.resolver.classify(record)))
    }
}

/// Classify every hit of a report against a resolver
pub fn classify<'a>(content: &'a str, resolver: &'a Resolver) -> Classifications<'a> {
    Classifications {
        records: parse_tblout(content),
        resolver,
    }
}
