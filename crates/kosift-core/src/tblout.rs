//! hmmsearch `--tblout` report parser
//!
//! Parses the per-target tabular output written by `hmmsearch --tblout`:
//! comment lines start with `#`; each data line carries 19 whitespace
//! separated fields. The first 18 are fixed (identifiers and scores), the
//! 19th is free text running to the end of the line.
//!
//! # File Format
//! ```text
//! #                                       --- full sequence ---- --- best 1 domain ----
//! # target name  accession query accession  E-value score bias    E-value score bias   exp reg clu ov env dom rep inc description
//! K00001x        -         K00001 -          1e-10   200.0 5.0    1e-10   199.0 5.0    1.0 1   0   0  1   1   1   1   sample description
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{KosiftError, Result};

/// Number of fixed fields before the free-text description
const FIXED_FIELDS: usize = 18;

/// A sequence identifier as reported by the search tool
///
/// The accession column carries the literal `-` when no accession is known;
/// it is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqId {
    /// Sequence or profile name
    pub name: String,
    /// Accession, or `-` when absent
    pub accession: String,
}

impl SeqId {
    /// Create a new SeqId
    pub fn new(name: impl Into<String>, accession: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accession: accession.into(),
        }
    }

    /// Whether the accession column carried the absent marker
    pub fn has_accession(&self) -> bool {
        self.accession != "-"
    }
}

/// E-value, bit score, and bias for one scoring basis
///
/// The report carries one triple for the full sequence and one for the best
/// single domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub e_value: f64,
    pub score: f64,
    pub bias: f64,
}

/// Domain multiplicity estimation fields (`exp` through `inc`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainEstimate {
    pub exp: f64,
    pub reg: i64,
    pub clu: i64,
    pub ov: i64,
    pub env: i64,
    pub dom: i64,
    pub rep: i64,
    pub inc: i64,
}

/// One reported match between a query profile and a target sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Target sequence identifier
    pub target: SeqId,
    /// Query profile identifier
    pub query: SeqId,
    /// Full sequence scoring
    pub full_sequence: ScoreTriple,
    /// Best single domain scoring
    pub best_domain: ScoreTriple,
    /// Domain number estimation
    pub domain_estimate: DomainEstimate,
    /// Free-text description of the target. May itself contain `#`-delimited
    /// key=value metadata; it is passed through verbatim, never parsed.
    pub description: String,
}

impl HitRecord {
    /// Parse a single data line into a HitRecord
    ///
    /// The line must already be trimmed and known to be neither empty nor a
    /// comment. `line_no` is the 1-based line number used in error messages.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let (fields, description) = split_fields(line);

        if fields.len() < FIXED_FIELDS || description.is_empty() {
            return Err(KosiftError::parse(
                line_no,
                format!(
                    "expected 19 fields, got {}",
                    fields.len() + usize::from(!description.is_empty())
                ),
            ));
        }

        let float = |idx: usize| -> Result<f64> {
            fields[idx].parse().map_err(|_| {
                KosiftError::parse(line_no, format!("field {}: invalid float '{}'", idx + 1, fields[idx]))
            })
        };
        let int = |idx: usize| -> Result<i64> {
            fields[idx].parse().map_err(|_| {
                KosiftError::parse(line_no, format!("field {}: invalid integer '{}'", idx + 1, fields[idx]))
            })
        };

        Ok(Self {
            target: SeqId::new(fields[0], fields[1]),
            query: SeqId::new(fields[2], fields[3]),
            full_sequence: ScoreTriple {
                e_value: float(4)?,
                score: float(5)?,
                bias: float(6)?,
            },
            best_domain: ScoreTriple {
                e_value: float(7)?,
                score: float(8)?,
                bias: float(9)?,
            },
            domain_estimate: DomainEstimate {
                exp: float(10)?,
                reg: int(11)?,
                clu: int(12)?,
                ov: int(13)?,
                env: int(14)?,
                dom: int(15)?,
                rep: int(16)?,
                inc: int(17)?,
            },
            description: description.to_string(),
        })
    }
}

/// Split a data line into its 18 fixed fields plus the free-text remainder
///
/// Runs of whitespace separate the fixed fields; whitespace inside the
/// remainder is preserved.
fn split_fields(line: &str) -> (Vec<&str>, &str) {
    let mut fields = Vec::with_capacity(FIXED_FIELDS);
    let mut rest = line;

    while fields.len() < FIXED_FIELDS {
        rest = rest.trim_start();
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = &rest[end..];
            },
            None => {
                if !rest.is_empty() {
                    fields.push(rest);
                }
                rest = "";
                break;
            },
        }
    }

    (fields, rest.trim_start())
}

/// Lazy iterator over the hit records of a report
///
/// Yields one `Result<HitRecord>` per non-comment, non-empty line, in input
/// order. The first malformed line ends the sequence: the error is yielded
/// once and the iterator is exhausted afterwards.
#[derive(Debug)]
pub struct HitRecords<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    done: bool,
}

impl<'a> Iterator for HitRecords<'a> {
    type Item = Result<HitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for (idx, raw) in self.lines.by_ref() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record = HitRecord::from_line(line, idx + 1);
            if record.is_err() {
                self.done = true;
            }
            return Some(record);
        }
        self.done = true;
        None
    }
}

/// Parse a report into a lazy sequence of hit records
///
/// Comment (`#`) and blank lines are skipped. Records are produced on demand
/// as the caller advances the iterator; nothing is buffered beyond the
/// current line.
pub fn parse_tblout(content: &str) -> HitRecords<'_> {
    HitRecords {
        lines: content.lines().enumerate(),
        done: false,
    }
}
