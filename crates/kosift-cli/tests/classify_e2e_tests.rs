//! End-to-end tests for the kosift CLI
//!
//! These tests validate the full classify workflow including:
//! - Threshold table loading and precedence
//! - Report parsing
//! - Output formats (tsv, json)
//! - Default path resolution under an installation root
//! - Error handling

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATE_HEADER: &str =
    "Gene abbreviation\tHmm file\tCorresponding KO\tHmm detecting threshold\t#Entry\n";
const KO_LIST_HEADER: &str = "knum\tthreshold\tscore_type\n";

/// Write the reference tables and a report into a temp directory
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let template = dir.join("hmm_table_template.txt");
    fs::write(
        &template,
        format!("{TEMPLATE_HEADER}amoA\tamoA.hmm\tK10944\t160.9|full\tM00528\n"),
    )
    .unwrap();

    let ko_list = dir.join("ko_list");
    fs::write(
        &ko_list,
        format!("{KO_LIST_HEADER}K00001\t150\tfull\nK00002\t300\tdomain\n"),
    )
    .unwrap();

    let report = dir.join("report.tblout");
    fs::write(
        &report,
        "# target name  accession  query name  accession  ...\n\
         K00001 - K00001 - 1e-10 200.0 5.0 1e-10 199.0 5.0 1.0 1 0 0 1 1 1 1 above threshold\n\
         K00002 - K00002 - 1e-10 500.0 5.0 1e-10 250.0 5.0 1.0 1 0 0 1 1 1 1 domain below threshold\n\
         K99999 - K99999 - 1e-10 60.0 5.0 1e-10 59.0 5.0 1.0 1 0 0 1 1 1 1 unlisted family\n\
         # [ok]\n",
    )
    .unwrap();

    (template, ko_list, report)
}

fn kosift() -> Command {
    let mut cmd = Command::cargo_bin("kosift").unwrap();
    cmd.env_remove("KOSIFT_HOME")
        .env_remove("KOSIFT_HMM_TABLE")
        .env_remove("KOSIFT_KO_LIST");
    cmd
}

// ============================================================================
// Classify Tests
// ============================================================================

#[test]
fn test_classify_tsv_output() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());

    kosift()
        .arg("classify")
        .arg(&report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "target\tquery\tfull_score\tdomain_score\tthreshold\tstatus",
        ))
        // 200.0 > 150 full
        .stdout(predicate::str::contains("K00001\tK00001\t200\t199\t150|full\tpass"))
        // 250.0 domain score, not > 300
        .stdout(predicate::str::contains("K00002\tK00002\t500\t250\t300|domain\tfail"))
        // unlisted family falls back to 50|full; 60.0 > 50
        .stdout(predicate::str::contains("K99999\tK99999\t60\t59\t50|full\tpass"));
}

#[test]
fn test_classify_passing_only_filters_failures() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());

    kosift()
        .arg("classify")
        .arg(&report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .arg("--passing-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("K00001"))
        .stdout(predicate::str::contains("K00002").not());
}

#[test]
fn test_classify_json_output() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());

    let output = kosift()
        .arg("classify")
        .arg(&report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let hits = parsed.as_array().unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0]["record"]["target"]["name"], "K00001");
    assert_eq!(hits[0]["passed"], true);
    assert_eq!(hits[1]["passed"], false);
}

#[test]
fn test_classify_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());
    let out_path = dir.path().join("results.tsv");

    kosift()
        .arg("classify")
        .arg(&report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .arg("--output")
        .arg(&out_path)
        .assert()
        .success();

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("K00001\tK00001\t200\t199\t150|full\tpass"));
}

#[test]
fn test_classify_resolves_default_paths_under_root() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("db");
    fs::create_dir_all(&db).unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());
    fs::rename(&template, db.join("hmm_table_template.txt")).unwrap();
    fs::rename(&ko_list, db.join("ko_list")).unwrap();

    kosift()
        .arg("classify")
        .arg(&report)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("K00001\tK00001\t200\t199\t150|full\tpass"));
}

#[test]
fn test_classify_custom_default_spec() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, report) = write_fixtures(dir.path());

    // With a 100|full default the unlisted K99999 hit (full score 60) fails.
    kosift()
        .arg("classify")
        .arg(&report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .arg("--default-spec")
        .arg("100|full")
        .assert()
        .success()
        .stdout(predicate::str::contains("K99999\tK99999\t60\t59\t100|full\tfail"));
}

#[test]
fn test_classify_malformed_report_fails() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, _) = write_fixtures(dir.path());
    let bad_report = dir.path().join("bad.tblout");
    fs::write(&bad_report, "only a few fields here\n").unwrap();

    kosift()
        .arg("classify")
        .arg(&bad_report)
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("report line 1"));
}

#[test]
fn test_classify_missing_report_fails() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, _) = write_fixtures(dir.path());

    kosift()
        .arg("classify")
        .arg(dir.path().join("does-not-exist.tblout"))
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read report"));
}

// ============================================================================
// Thresholds Tests
// ============================================================================

#[test]
fn test_thresholds_show_listed_family() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, _) = write_fixtures(dir.path());

    kosift()
        .arg("thresholds")
        .arg("show")
        .arg("K10944")
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .success()
        .stdout(predicate::str::contains("K10944\t160.9|full\t-T 160.9"));
}

#[test]
fn test_thresholds_show_unlisted_family_reports_default() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, _) = write_fixtures(dir.path());

    kosift()
        .arg("thresholds")
        .arg("show")
        .arg("K99999")
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));
}

#[test]
fn test_thresholds_dump_is_sorted() {
    let dir = TempDir::new().unwrap();
    let (template, ko_list, _) = write_fixtures(dir.path());

    let output = kosift()
        .arg("thresholds")
        .arg("dump")
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let keys: Vec<&str> = stdout
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(keys, vec!["K00001", "K00002", "K10944"]);
}

#[test]
fn test_ko_list_overrides_template_on_collision() {
    let dir = TempDir::new().unwrap();

    let template = dir.path().join("template.txt");
    fs::write(
        &template,
        format!("{TEMPLATE_HEADER}x\tx.hmm\tK00001\t10|full\tM1\n"),
    )
    .unwrap();

    let ko_list = dir.path().join("ko_list");
    fs::write(&ko_list, format!("{KO_LIST_HEADER}K00001\t20\tdomain\n")).unwrap();

    kosift()
        .arg("thresholds")
        .arg("show")
        .arg("K00001")
        .arg("--hmm-table")
        .arg(&template)
        .arg("--ko-list")
        .arg(&ko_list)
        .assert()
        .success()
        .stdout(predicate::str::contains("K00001\t20|domain"));
}
