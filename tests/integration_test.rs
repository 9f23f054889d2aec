//! Integration tests for the expense splitter CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given arguments and return stdout
fn run_splitter(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("expense-splitter").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn temp_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Trim lines and drop trailing whitespace for comparison
fn normalize(output: &str) -> Vec<String> {
    output.trim().lines().map(|l| l.trim().to_string()).collect()
}

#[test]
fn test_sample_group_csv_output() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses.csv"),
    ]);
    let expected = fs::read_to_string(test_data_path("expected_sample.csv")).unwrap();

    assert_eq!(normalize(&output), normalize(&expected));
}

#[test]
fn test_output_has_both_sections() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses.csv"),
    ]);

    assert!(output.starts_with("member_id,name,balance"));
    assert!(output.contains("\n\nfrom,to,amount\n"));
}

#[test]
fn test_report_output() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses.csv"),
        "--report",
    ]);

    assert!(output.contains("BALANCES:"));
    assert!(output.contains("Bob: $8.33 (owes)"));
    assert!(output.contains("1. Dave pays Alice: $38.33"));
    assert!(output.contains("2. Bob pays Alice: $6.67"));
    assert!(output.contains("Total Expenses: $200.00"));
    assert!(output.contains("Number of Settlements: 3"));
}

#[test]
fn test_report_uses_requested_currency() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses.csv"),
        "--currency",
        "inr",
        "--report",
    ]);

    assert!(output.contains("Currency: Indian Rupee (INR)"));
    assert!(output.contains("Total Expenses: ₹200.00"));
}

#[test]
fn test_invalid_rows_are_skipped() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses_invalid_rows.csv"),
    ]);

    assert_eq!(
        normalize(&output),
        vec![
            "member_id,name,balance",
            "1,Alice,20.00",
            "2,Bob,-10.00",
            "3,Carol,-10.00",
            "4,Dave,0.00",
            "",
            "from,to,amount",
            "Bob,Alice,10.00",
            "Carol,Alice,10.00",
        ]
    );
}

#[test]
fn test_invalid_rows_are_logged() {
    let mut cmd = Command::cargo_bin("expense-splitter").unwrap();
    cmd.env("RUST_LOG", "warn")
        .arg(test_data_path("members.csv"))
        .arg(test_data_path("expenses_invalid_rows.csv"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Row 4"))
        .stderr(predicate::str::contains("empty split"));
}

#[test]
fn test_unknown_members_are_left_out() {
    let members = temp_csv("id,name\na,Alice\nb,Bob\n");
    let expenses = temp_csv(
        "id,description,amount,paid_by,split_between,date\n\
         x1,Dinner,90,a,a;b;ghost,\n",
    );

    let output = run_splitter(&[
        members.path().to_str().unwrap(),
        expenses.path().to_str().unwrap(),
    ]);

    assert!(output.contains("a,Alice,60.00"));
    assert!(output.contains("b,Bob,-30.00"));
    assert!(!output.contains("ghost"));
}

#[test]
fn test_settled_group_has_no_settlements() {
    let members = temp_csv("id,name\na,Alice\nb,Bob\n");
    let expenses = temp_csv(
        "id,description,amount,paid_by,split_between,date\n\
         x1,Lunch,20,a,a;b,\n\
         x2,Coffee,20,b,a;b,\n",
    );

    let output = run_splitter(&[
        members.path().to_str().unwrap(),
        expenses.path().to_str().unwrap(),
    ]);

    assert!(output.trim_end().ends_with("from,to,amount"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("expense-splitter").unwrap();
    cmd.arg("nonexistent.csv")
        .arg(test_data_path("expenses.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("expense-splitter").unwrap();
    cmd.arg(test_data_path("members.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_unknown_currency_error() {
    let mut cmd = Command::cargo_bin("expense-splitter").unwrap();
    cmd.arg(test_data_path("members.csv"))
        .arg(test_data_path("expenses.csv"))
        .args(["--currency", "JPY"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown currency code 'JPY'"));
}

#[test]
fn test_amounts_have_two_decimal_places() {
    let output = run_splitter(&[
        &test_data_path("members.csv"),
        &test_data_path("expenses.csv"),
    ]);

    for line in output.lines() {
        let last = line.rsplit(',').next().unwrap_or("");
        if let Some(dot_pos) = last.find('.') {
            let decimal_places = last.len() - dot_pos - 1;
            assert_eq!(decimal_places, 2, "Expected 2 decimal places in: {}", line);
        }
    }
}
