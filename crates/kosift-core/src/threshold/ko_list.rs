//! KOfam ko list loader
//!
//! Parses the tab-separated `ko_list` file shipped with the KOfam profile
//! database. Only the key and threshold columns are consumed; the remaining
//! profile statistics are ignored:
//!
//! ```text
//! knum	threshold	score_type	profile_type	F-measure	...	definition
//! K00001	362.77	domain	all	0.244676	...	alcohol dehydrogenase
//! K26930	-	-	all	0.111111	...	uncharacterized protein
//! ```
//!
//! The placeholder `-` in the threshold or score_type column means "use the
//! default spec".

use std::path::Path;

use tracing::debug;

use crate::error::{KosiftError, Result};

use super::{LoadOptions, ThresholdTable};

/// Required column: KO code keying each row
const COL_KNUM: &str = "knum";
/// Required column: score cutoff, or the placeholder
const COL_THRESHOLD: &str = "threshold";
/// Required column: scoring basis (`full`/`domain`), or the placeholder
const COL_SCORE_TYPE: &str = "score_type";

/// Loaded ko list
///
/// The derived threshold table is computed once at construction and never
/// recomputed.
#[derive(Debug, Clone)]
pub struct KoList {
    table: ThresholdTable,
}

impl KoList {
    /// Load a ko list file
    ///
    /// The file is read fully into memory (the handle is closed once read),
    /// then parsed.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading ko list");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, options)
    }

    /// Parse ko list content
    pub fn parse(content: &str, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        // The key column is `knum` in the shipped file; `KO` is accepted for
        // tables that were already renamed downstream.
        let ko_idx = headers
            .iter()
            .position(|h| h.trim() == COL_KNUM || h.trim() == "KO");
        let threshold_idx = headers.iter().position(|h| h.trim() == COL_THRESHOLD);
        let kind_idx = headers.iter().position(|h| h.trim() == COL_SCORE_TYPE);

        let (Some(ko_idx), Some(threshold_idx), Some(kind_idx)) = (ko_idx, threshold_idx, kind_idx)
        else {
            let mut missing = Vec::new();
            if ko_idx.is_none() {
                missing.push(COL_KNUM);
            }
            if threshold_idx.is_none() {
                missing.push(COL_THRESHOLD);
            }
            if kind_idx.is_none() {
                missing.push(COL_SCORE_TYPE);
            }
            return Err(KosiftError::schema(format!(
                "ko list is missing columns: {}",
                missing.join(", ")
            )));
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let ko = record.get(ko_idx).unwrap_or("").trim();
            if ko.is_empty() {
                continue;
            }
            let spec = options.spec_from_cells(
                record.get(threshold_idx).unwrap_or(""),
                record.get(kind_idx).unwrap_or(""),
            )?;
            rows.push((ko.to_string(), spec));
        }

        let table = ThresholdTable::from_rows(rows);
        debug!(entries = table.len(), "parsed ko list");

        Ok(Self { table })
    }

    /// Family thresholds keyed by KO code
    pub fn threshold_table(&self) -> &ThresholdTable {
        &self.table
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::threshold::{ScoreKind, ThresholdSpec};

    const HEADER: &str =
        "knum\tthreshold\tscore_type\tprofile_type\tF-measure\tnseq\tnseq_used\talen\tmlen\teff_nseq\tre/pos\tdefinition\n";

    #[test]
    fn test_parse_regular_rows() {
        let content = format!(
            "{HEADER}K00001\t362.77\tdomain\tall\t0.24\t1000\t900\t400\t350\t20.5\t0.55\talcohol dehydrogenase\n\
             K00002\t443.20\tfull\tall\t0.31\t800\t700\t380\t330\t18.2\t0.52\taldehyde reductase\n"
        );
        let list = KoList::parse(&content, &LoadOptions::default()).unwrap();

        assert_eq!(list.threshold_table().len(), 2);
        assert_eq!(
            list.threshold_table().get("K00001"),
            Some(&ThresholdSpec::new(362.77, ScoreKind::Domain))
        );
        assert_eq!(
            list.threshold_table().get("K00002"),
            Some(&ThresholdSpec::new(443.2, ScoreKind::Full))
        );
    }

    #[test]
    fn test_placeholder_cells_use_default_spec() {
        let content = format!("{HEADER}K26930\t-\t-\tall\t0.11\t9\t9\t200\t180\t1.1\t0.4\tuncharacterized protein\n");
        let list = KoList::parse(&content, &LoadOptions::default()).unwrap();

        assert_eq!(list.threshold_table().get("K26930"), Some(&ThresholdSpec::default()));
    }

    #[test]
    fn test_custom_default_spec() {
        let options = LoadOptions {
            placeholder: "-".to_string(),
            default_spec: ThresholdSpec::new(75.0, ScoreKind::Domain),
        };
        let content = format!("{HEADER}K26930\t-\t-\tall\t0.11\t9\t9\t200\t180\t1.1\t0.4\tuncharacterized\n");
        let list = KoList::parse(&content, &options).unwrap();

        assert_eq!(
            list.threshold_table().get("K26930"),
            Some(&ThresholdSpec::new(75.0, ScoreKind::Domain))
        );
    }

    #[test]
    fn test_renamed_ko_column_is_accepted() {
        let content = "KO\tthreshold\tscore_type\nK00001\t100\tfull\n";
        let list = KoList::parse(content, &LoadOptions::default()).unwrap();
        assert!(list.threshold_table().contains("K00001"));
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let content = "knum\tdefinition\nK00001\talcohol dehydrogenase\n";
        let err = KoList::parse(content, &LoadOptions::default()).unwrap_err();
        match err {
            KosiftError::Schema(msg) => {
                assert!(msg.contains("threshold"));
                assert!(msg.contains("score_type"));
            },
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_score_type_is_format_error() {
        let content = "knum\tthreshold\tscore_type\nK00001\t100\tsequence\n";
        let err = KoList::parse(content, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, KosiftError::Format { .. }));
    }

    #[test]
    fn test_duplicate_key_last_row_wins() {
        let content = "knum\tthreshold\tscore_type\nK00001\t100\tfull\nK00001\t200\tdomain\n";
        let list = KoList::parse(content, &LoadOptions::default()).unwrap();
        assert_eq!(
            list.threshold_table().get("K00001"),
            Some(&ThresholdSpec::new(200.0, ScoreKind::Domain))
        );
    }

    #[test]
    fn test_from_path_reads_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "knum\tthreshold\tscore_type\nK00001\t100\tfull\n").unwrap();

        let list = KoList::from_path(file.path(), &LoadOptions::default()).unwrap();
        assert!(list.threshold_table().contains("K00001"));
    }
}
