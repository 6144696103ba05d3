//! Integration tests for the `classify` subcommand.

mod common;

use assert_cmd::Command;
use common::{ACME_TEMPLATES, acme_pages, write_pdf, write_templates};
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("pdfsift").unwrap()
}

#[test]
fn text_output_lists_matched_pages() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "a.pdf", &acme_pages());
    let templates = write_templates(dir.path(), ACME_TEMPLATES);

    cmd()
        .arg("classify")
        .arg("--templates")
        .arg(&templates)
        .arg(&pdf)
        .assert()
        .success()
        .stdout("1\tAcmeInvoice\tACME\tTotal=Total 99.00\n");
}

#[test]
fn json_output_is_one_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "a.pdf", &acme_pages());
    let templates = write_templates(dir.path(), ACME_TEMPLATES);

    let output = cmd()
        .arg("classify")
        .arg("--templates")
        .arg(&templates)
        .arg(&pdf)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["Document"], "AcmeInvoice");
    assert_eq!(value["Page"], 1);
    assert_eq!(value["PDF_File"], "a.pdf");
    assert_eq!(value["NumPages"], 2);
    assert_eq!(value["Total"], "Total 99.00");
}

#[test]
fn no_match_prints_notice() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "a.pdf", &acme_pages());
    let templates = write_templates(
        dir.path(),
        r#"[{"document_name": "Nope", "criteria_sets": [
            {"criteria": "ZZZ", "criteria_box": {"x": 0, "y": 0, "width": 600, "height": 800}}
        ]}]"#,
    );

    cmd()
        .arg("classify")
        .arg("--templates")
        .arg(&templates)
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No pages matched"));
}

#[test]
fn missing_pdf_fails() {
    let dir = tempfile::tempdir().unwrap();
    let templates = write_templates(dir.path(), ACME_TEMPLATES);

    cmd()
        .arg("classify")
        .arg("--templates")
        .arg(&templates)
        .arg(dir.path().join("absent.pdf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn corrupt_pdf_reports_one_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let templates = write_templates(dir.path(), ACME_TEMPLATES);
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"not a pdf at all").unwrap();

    cmd()
        .env_remove("RUST_LOG")
        .arg("classify")
        .arg("--templates")
        .arg(&templates)
        .arg(&bad)
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error: failed to process PDF:").count(1));
}
