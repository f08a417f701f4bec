//! Integration tests for the sbench CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an sbench command isolated from the user's own config
fn sbench(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sbench").unwrap();
    let home = tmp.path().join("home");
    cmd.current_dir(tmp.path())
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("SBENCH_USER", "tester")
        .env_remove("SBENCH_DUPLICATES_BLOCKING")
        .env_remove("SBENCH_DUPLICATE_REPORTING")
        .env_remove("SBENCH_EXTRACTION_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a workspace in a temp directory
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp).arg("init").assert().success();
    tmp
}

/// Helper to create a project and return its full ID
fn create_project(tmp: &TempDir, name: &str) -> String {
    let output = sbench(tmp)
        .args([
            "-f",
            "id",
            "project",
            "new",
            "--name",
            name,
            "--framework-version",
            "2021",
            "--published",
            "October 2021",
            "--organization",
            "GSSB",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "project new failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write_file(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const GOOD_CSV: &str = "ID,Indicator text,Category\n\
E1,Scope 1 greenhouse gas emissions,Environment\n\
E2,Scope 2 greenhouse gas emissions,Environment\n\
S1,Employee turnover rate,Social\n";

const DUPLICATE_CSV: &str = "ID,Indicator text\n\
E1,Scope 1 greenhouse gas emissions\n\
E1,Scope 2 greenhouse gas emissions\n";

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sustainability Benchmark"))
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sbench"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sbench"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_workspace() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized sbench workspace"));

    assert!(tmp.path().join(".sbench/config.yaml").is_file());
    assert!(tmp.path().join(".sbench/store.db").is_file());
    assert!(tmp.path().join(".sbench/objects").is_dir());
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_workspace();
    sbench(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_workspace_fail() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an sbench workspace"));
}

// ============================================================================
// Project Tests
// ============================================================================

#[test]
fn test_project_new_and_list() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI Standards");
    assert!(id.starts_with("PROJ-"), "unexpected id: {}", id);

    sbench(&tmp)
        .args(["-f", "csv", "project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GRI Standards"))
        .stdout(predicate::str::contains("draft"));

    sbench(&tmp)
        .args(["project", "list", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_project_new_requires_fields() {
    let tmp = setup_workspace();
    sbench(&tmp)
        .args([
            "project",
            "new",
            "--name",
            "   ",
            "--framework-version",
            "1",
            "--published",
            "2020",
            "--organization",
            "SASB",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a name"));
}

#[test]
fn test_project_show_by_prefix() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "SASB");
    let prefix = &id["PROJ-".len().."PROJ-".len() + 12];

    sbench(&tmp)
        .args(["-f", "json", "project", "show", prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("\"organization\": \"GSSB\""));
}

#[test]
fn test_project_show_unknown() {
    let tmp = setup_workspace();
    sbench(&tmp)
        .args(["project", "show", "ZZZZZZZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project found"));
}

// ============================================================================
// Ingest Tests
// ============================================================================

#[test]
fn test_ingest_csv_and_export() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp)
        .args(["ingest", "gri.csv", "--project", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 3 indicator(s)"));

    sbench(&tmp)
        .args(["report", "indicators", "--project", &id])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "ID,Indicator text,Category,Subcategory,Source,Notes\n",
        ))
        .stdout(predicate::str::contains("E1,Scope 1 greenhouse gas emissions,Environment,,,"))
        .stdout(predicate::str::contains("S1,Employee turnover rate,Social,,,"));

    sbench(&tmp)
        .args(["-f", "json", "project", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"progress_percentage\": 40"))
        .stdout(predicate::str::contains("in_progress"));
}

#[test]
fn test_ingest_stores_source_object() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp)
        .args(["ingest", "gri.csv", "-p", &id])
        .assert()
        .success();

    let project_dir = tmp.path().join(".sbench/objects/tester").join(&id);
    let stored: Vec<_> = fs::read_dir(&project_dir).unwrap().collect();
    assert_eq!(stored.len(), 1);
    let path = stored[0].as_ref().unwrap().path();
    assert_eq!(path.extension().unwrap(), "csv");
    assert_eq!(fs::read_to_string(path).unwrap(), GOOD_CSV);
}

#[test]
fn test_ingest_replaces_previous_set() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "first.csv", GOOD_CSV);
    write_file(&tmp, "second.csv", "ID,Indicator text\nG1,Board oversight of climate risk\n");

    sbench(&tmp).args(["ingest", "first.csv", "-p", &id]).assert().success();
    sbench(&tmp).args(["ingest", "second.csv", "-p", &id]).assert().success();

    // Only the current framework file is kept in object storage
    let project_dir = tmp.path().join(".sbench/objects/tester").join(&id);
    let stored: Vec<_> = fs::read_dir(&project_dir).unwrap().collect();
    assert_eq!(stored.len(), 1);
    let kept = stored[0].as_ref().unwrap().path();
    assert!(fs::read_to_string(kept).unwrap().contains("G1,"));

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("G1,"))
        .stdout(predicate::str::contains("E1,").not());
}

#[test]
fn test_ingest_blank_rows_above_header() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(
        &tmp,
        "padded.csv",
        ",\n,\nID,Indicator text\nE1,Scope 1 emissions\nE1,Scope 2 emissions\n",
    );

    sbench(&tmp)
        .args(["ingest", "padded.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Row 5: Duplicate Indicator ID 'E1' (first used in row 4)",
        ));

    sbench(&tmp)
        .args(["ingest", "padded.csv", "-p", &id, "--set", "5.id=E2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 indicator(s)"));
}

#[test]
fn test_ingest_missing_columns_without_input() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "odd.csv", "Code,Statement\nE1,Scope 1 emissions\n");

    sbench(&tmp)
        .args(["ingest", "odd.csv", "-p", &id, "--no-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'ID' and 'Indicator text'"))
        .stderr(predicate::str::contains("Headers found: Code, Statement"));
}

#[test]
fn test_ingest_manual_mapping() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "odd.csv", "Code,Statement\nE1,Scope 1 emissions\n");

    sbench(&tmp)
        .args([
            "ingest",
            "odd.csv",
            "-p",
            &id,
            "--id-column",
            "Code",
            "--text-column",
            "Statement",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 indicator(s)"));
}

#[test]
fn test_ingest_mapping_same_column_rejected() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "odd.csv", "Code,Statement\nE1,Scope 1 emissions\n");

    sbench(&tmp)
        .args([
            "ingest",
            "odd.csv",
            "-p",
            &id,
            "--id-column",
            "Code",
            "--text-column",
            "Code",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used for both"));
}

#[test]
fn test_ingest_header_row_override() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(
        &tmp,
        "titled.csv",
        "GRI Universal Standards 2021,\nID,Indicator text\nGRI 2-1,Organizational details\n",
    );

    sbench(&tmp)
        .args([
            "ingest",
            "titled.csv",
            "-p",
            &id,
            "--header-row",
            "2",
            "--id-column",
            "ID",
            "--text-column",
            "Indicator text",
        ])
        .assert()
        .success();

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("GRI 2-1,Organizational details"));
}

#[test]
fn test_ingest_duplicates_block() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "dups.csv", DUPLICATE_CSV);

    sbench(&tmp)
        .args(["ingest", "dups.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 3: Duplicate Indicator ID 'E1'"))
        .stderr(predicate::str::contains("blocking validation issue"));

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no confirmed indicators"));
}

#[test]
fn test_ingest_allow_duplicates() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "dups.csv", DUPLICATE_CSV);

    sbench(&tmp)
        .args(["ingest", "dups.csv", "-p", &id, "--allow-duplicates"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Duplicate Indicator ID 'E1'"));
}

#[test]
fn test_ingest_duplicates_non_blocking_from_config() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "dups.csv", DUPLICATE_CSV);

    sbench(&tmp)
        .args(["config", "set", "duplicates_are_blocking", "false"])
        .assert()
        .success();

    sbench(&tmp)
        .args(["ingest", "dups.csv", "-p", &id])
        .assert()
        .success();
}

#[test]
fn test_ingest_aggregate_duplicates() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(
        &tmp,
        "dups.csv",
        "ID,Indicator text\nE1,Scope 1 emissions\nE1,Scope 2 emissions\nE1,Scope 3 emissions\n",
    );

    sbench(&tmp)
        .args(["ingest", "dups.csv", "-p", &id, "--aggregate-duplicates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate Indicator IDs found: E1"))
        .stderr(predicate::str::contains("Row 3").not());
}

#[test]
fn test_ingest_set_fixes_duplicate() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "dups.csv", DUPLICATE_CSV);

    sbench(&tmp)
        .args(["ingest", "dups.csv", "-p", &id, "--set", "3.id=E2"])
        .assert()
        .success();

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("E2,Scope 2 greenhouse gas emissions"));
}

#[test]
fn test_ingest_set_unknown_row() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp)
        .args(["ingest", "gri.csv", "-p", &id, "--set", "40.text=Something"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 40 is not an indicator row"));
}

#[test]
fn test_ingest_short_text_blocks() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "short.csv", "ID,Indicator text\nE1,ab\n");

    sbench(&tmp)
        .args(["ingest", "short.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 2: Indicator text too short"));
}

#[test]
fn test_ingest_dry_run_stores_nothing() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp)
        .args(["ingest", "gri.csv", "-p", &id, "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: 3 indicator(s)"));

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .failure();
}

#[test]
fn test_ingest_json_snapshot() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp)
        .args(["-f", "json", "ingest", "gri.csv", "-p", &id, "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"indicators\""))
        .stdout(predicate::str::contains("\"issues\": []"));
}

#[test]
fn test_ingest_empty_file() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "empty.csv", "");

    sbench(&tmp)
        .args(["ingest", "empty.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("appears to be empty"));
}

#[test]
fn test_ingest_headers_only() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "headers.csv", "ID,Indicator text\n,\n");

    sbench(&tmp)
        .args(["ingest", "headers.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data rows"));
}

#[test]
fn test_ingest_unsupported_type() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.json", "{}");

    sbench(&tmp)
        .args(["ingest", "gri.json", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn test_ingest_missing_file() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");

    sbench(&tmp)
        .args(["ingest", "nope.csv", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_extract_saves_indicators() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "CSRD");
    write_file(&tmp, "framework.pdf", "%PDF-1.7 sample");

    sbench(&tmp)
        .args(["extract", "framework.pdf", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 3 indicator(s)"));

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("E1.1,"))
        .stdout(predicate::str::contains("AI Extracted"));
}

#[test]
fn test_extract_timeout() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "CSRD");
    write_file(&tmp, "framework.pdf", "%PDF-1.7 sample");

    sbench(&tmp)
        .args(["extract", "framework.pdf", "-p", &id, "--timeout", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not finish within 1s"));

    sbench(&tmp)
        .args(["report", "indicators", "-p", &id])
        .assert()
        .failure();
}

// ============================================================================
// Documents, Frameworks, Analysis, Reports
// ============================================================================

#[test]
fn test_doc_attach_and_list() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "policy.txt", "Our climate policy");

    sbench(&tmp)
        .args([
            "doc",
            "attach",
            "policy.txt",
            "-p",
            &id,
            "--description",
            "Climate policy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attached policy.txt"));

    sbench(&tmp)
        .args(["-f", "csv", "doc", "list", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("supporting,policy.txt"))
        .stdout(predicate::str::contains("Climate policy"));
}

#[test]
fn test_doc_attach_rejects_type() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "script.sh", "echo hi");

    sbench(&tmp)
        .args(["doc", "attach", "script.sh", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn test_framework_list_and_show() {
    let tmp = setup_workspace();

    sbench(&tmp)
        .args(["-f", "id", "framework", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eu-csrd"));

    sbench(&tmp)
        .args(["framework", "show", "eu-csrd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("European Union"));

    sbench(&tmp)
        .args(["framework", "show", "mars-accord"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No legal framework"));
}

#[test]
fn test_analyze_requires_indicators() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");

    sbench(&tmp)
        .args(["analyze", "-p", &id, "--framework", "eu-csrd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no confirmed indicators"));
}

#[test]
fn test_analyze_and_summary_report() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI Standards");
    write_file(&tmp, "gri.csv", GOOD_CSV);
    write_file(&tmp, "policy.txt", "Our climate policy");

    sbench(&tmp).args(["ingest", "gri.csv", "-p", &id]).assert().success();
    sbench(&tmp)
        .args(["doc", "attach", "policy.txt", "-p", &id])
        .assert()
        .success();

    sbench(&tmp)
        .args(["analyze", "-p", &id, "--framework", "eu-csrd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("78.5% - Moderate Compliance"))
        .stdout(predicate::str::contains("Total indicators:      3"));

    sbench(&tmp)
        .args(["report", "summary", "-p", &id])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SUSTAINABILITY COMPLIANCE ANALYSIS REPORT"))
        .stdout(predicate::str::contains("Project: GRI Standards (2021)"))
        .stdout(predicate::str::contains("Document: gri.csv"))
        .stdout(predicate::str::contains("Supporting Documents: 1"));

    sbench(&tmp)
        .args(["-f", "json", "project", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"completed\""))
        .stdout(predicate::str::contains("\"progress_percentage\": 100"))
        .stdout(predicate::str::contains("\"legal_framework_id\": \"eu-csrd\""));
}

#[test]
fn test_report_summary_to_file() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");
    write_file(&tmp, "gri.csv", GOOD_CSV);

    sbench(&tmp).args(["ingest", "gri.csv", "-p", &id]).assert().success();
    sbench(&tmp)
        .args(["analyze", "-p", &id, "--framework", "issb-ifrs-s2"])
        .assert()
        .success();

    sbench(&tmp)
        .args(["report", "summary", "-p", &id, "-o", "report.txt"])
        .assert()
        .success();

    let report = fs::read_to_string(tmp.path().join("report.txt")).unwrap();
    assert!(report.contains("COMPLIANCE SCORE: 78.5%"));
}

#[test]
fn test_report_summary_requires_analysis() {
    let tmp = setup_workspace();
    let id = create_project(&tmp, "GRI");

    sbench(&tmp)
        .args(["report", "summary", "-p", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no completed analysis"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_set_show_unset() {
    let tmp = setup_workspace();

    sbench(&tmp)
        .args(["config", "set", "extraction_timeout_secs", "30"])
        .assert()
        .success();

    sbench(&tmp)
        .args(["config", "show", "extraction_timeout_secs"])
        .assert()
        .success()
        .stdout("30\n");

    sbench(&tmp)
        .args(["config", "unset", "extraction_timeout_secs"])
        .assert()
        .success();

    sbench(&tmp)
        .args(["config", "show", "extraction_timeout_secs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not set"));
}

#[test]
fn test_config_env_overrides_file() {
    let tmp = setup_workspace();

    sbench(&tmp)
        .args(["config", "set", "duplicate_reporting", "aggregate"])
        .assert()
        .success();

    sbench(&tmp)
        .env("SBENCH_DUPLICATE_REPORTING", "per_row")
        .args(["config", "show", "duplicate_reporting"])
        .assert()
        .success()
        .stdout("per_row\n");
}

#[test]
fn test_config_rejects_unknown_key() {
    let tmp = setup_workspace();
    sbench(&tmp)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_keys_lists_all() {
    let tmp = TempDir::new().unwrap();
    sbench(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicates_are_blocking"))
        .stdout(predicate::str::contains("extraction_timeout_secs"));
}
