//! Integration tests for the tablediff CLI tool.
//!
//! These tests verify the complete end-to-end behavior of the CLI,
//! including argument parsing, file loading, exit codes and output.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a Command for the tablediff-rs binary
fn tablediff() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tablediff-rs"))
}

#[test]
fn test_identical_tables_exit_0() {
    tablediff()
        .args(["-k", "ID"])
        .arg("tests/fixtures/identical_old.csv")
        .arg("tests/fixtures/identical_new.csv")
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_reordered_rows_and_columns_plain() {
    tablediff()
        .args(["-k", "ID", "--format", "plain", "--no-comment"])
        .arg("tests/fixtures/identical_old.csv")
        .arg("tests/fixtures/identical_new.csv")
        .assert()
        .code(0)
        .stdout("=\tID\tSize\tColor\n=\t2\tM\tBlue\n=\t1\tS\tRed\n");
}

#[test]
fn test_different_tables_exit_1() {
    tablediff()
        .args(["--key", "ID"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Navy"))
        .stdout(predicate::str::contains("3 differences"));
}

#[test]
fn test_plain_output() {
    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout(
            "=\tID\tColor\tSize\n\
             =\t1\tRed\tS\n\
             c-\t2\tBlue\tM\n\
             c+\t2\tNavy\tM\n\
             -\t3\tGreen\tL\n\
             +\t4\tGold\tXL\n",
        );
}

#[test]
fn test_compact_output() {
    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment", "--compact"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("=\t1\tRed").not())
        .stdout(predicate::str::contains("+\t4\tGold\tXL"));
}

#[test]
fn test_comment_row_echoes_command_line() {
    tablediff()
        .args(["-k", "ID", "-f", "plain"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("#\ttablediff-rs -k ID -f plain"));
}

#[test]
fn test_json_output() {
    let output = tablediff()
        .args(["-k", "ID", "--format", "json", "--no-comment"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["changes"], 3);
    assert_eq!(value["headers"], serde_json::json!(["ID", "Color", "Size"]));
}

#[test]
fn test_changed_keys() {
    tablediff()
        .args(["-k", "ID", "--changed"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout("ID\n2\n3\n4\n");
}

#[test]
fn test_union_keys() {
    tablediff()
        .args(["-k", "ID", "--union-keys"])
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout("ID\n1\n2\n3\n4\n");
}

#[test]
fn test_deleted_column() {
    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment"])
        .arg("tests/fixtures/columns_old.csv")
        .arg("tests/fixtures/columns_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "c-\tID\tColor\tSize\nc+\tID\tColor\t\n=\t1\tRed\tS\n",
        ));
}

#[test]
fn test_ignored_column_exit_0() {
    tablediff()
        .args(["-k", "ID", "--ignore", "Updated"])
        .arg("tests/fixtures/priced_old.csv")
        .arg("tests/fixtures/priced_new.csv")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_without_ignore_reports_changes() {
    tablediff()
        .args(["-k", "ID"])
        .arg("tests/fixtures/priced_old.csv")
        .arg("tests/fixtures/priced_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 differences"));
}

#[test]
fn test_unknown_ignore_column_exit_2() {
    tablediff()
        .args(["-k", "ID", "--ignore", "Weight"])
        .arg("tests/fixtures/priced_old.csv")
        .arg("tests/fixtures/priced_new.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Bad --ignore column name(s): Weight"));
}

#[test]
fn test_preamble_changes() {
    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment"])
        .arg("tests/fixtures/report_old.csv")
        .arg("tests/fixtures/report_new.csv")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "=\tQuarterly report\t\t\n-\tQ1\t\t\n+\tQ2\t\t\n=\tID\tColor\tSize\n",
        ))
        .stdout(predicate::str::ends_with("=\tSigned\t\t\n"));
}

#[test]
fn test_tsv_input() {
    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment"])
        .arg("tests/fixtures/tabbed_old.tsv")
        .arg("tests/fixtures/tabbed_new.tsv")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("+\t2\tBlue"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("diff.tsv");

    tablediff()
        .args(["-k", "ID", "-f", "plain", "--no-comment", "--out"])
        .arg(&out)
        .arg("tests/fixtures/inventory_old.csv")
        .arg("tests/fixtures/inventory_new.csv")
        .assert()
        .code(1)
        .stdout("");

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("c+\t2\tNavy\tM"));
}

#[test]
fn test_duplicate_key_exit_2() {
    tablediff()
        .args(["-k", "ID"])
        .arg("tests/fixtures/duplicate_key.csv")
        .arg("tests/fixtures/identical_old.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate key on row 3: '1'"));
}

#[test]
fn test_key_not_found_exit_2() {
    tablediff()
        .args(["-k", "SKU"])
        .arg("tests/fixtures/identical_old.csv")
        .arg("tests/fixtures/identical_new.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("'SKU'"));
}

#[test]
fn test_file_not_found_exit_2() {
    tablediff()
        .args(["-k", "ID"])
        .arg("tests/fixtures/nonexistent.csv")
        .arg("tests/fixtures/identical_old.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_quiet_suppresses_error_message() {
    tablediff()
        .args(["-k", "ID", "-q"])
        .arg("tests/fixtures/nonexistent.csv")
        .arg("tests/fixtures/identical_old.csv")
        .assert()
        .code(2)
        .stderr("");
}

#[test]
fn test_max_columns_ignores_stray_note() {
    tablediff()
        .args(["-k", "ID", "--max-columns", "2"])
        .arg("tests/fixtures/noted.csv")
        .arg("tests/fixtures/noted.csv")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_stray_note_without_limit_exit_2() {
    tablediff()
        .args(["-k", "ID", "--max-columns", "0"])
        .arg("tests/fixtures/noted.csv")
        .arg("tests/fixtures/noted.csv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty header in column 3"));
}

#[test]
fn test_missing_key_argument() {
    tablediff()
        .arg("tests/fixtures/identical_old.csv")
        .arg("tests/fixtures/identical_new.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--key"));
}

#[test]
fn test_help_flag() {
    tablediff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Key-based diff tool"));
}

#[test]
fn test_version_flag() {
    tablediff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tablediff-rs"));
}
