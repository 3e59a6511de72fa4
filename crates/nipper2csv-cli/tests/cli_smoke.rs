//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `nipper2csv` binary to verify that
//! argument parsing, the conversion itself, and error handling work end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("nipper2csv").unwrap()
}

const REPORT: &str = r#"<document>
  <section index="1" title="Outer">
    <section index="1.1" title="Inner">
      <table><tablebody>
        <tablerow><tablecell>fw01</tablecell><tablecell>Fail</tablecell></tablerow>
      </tablebody></table>
    </section>
  </section>
</document>"#;

// ---------------------------------------------------------------------------
// Argument handling
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("input"))
        .stdout(predicate::str::contains("output"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nipper2csv"));
}

#[test]
fn single_argument_prints_usage_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    std::fs::write(&input, REPORT).unwrap();

    cmd()
        .arg(&input)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the input file should exist");
}

#[test]
fn three_positionals_are_rejected() {
    cmd()
        .args(["a.xml", "b.csv", "c.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[test]
fn converts_report_and_announces_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    let output = dir.path().join("report.csv");
    std::fs::write(&input, REPORT).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("CSV export completed:"))
        .stdout(predicate::str::contains("report.csv"));

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Section Index,Section Title,Reference"));
    assert!(lines[1].starts_with("1,Outer,"));
    assert!(lines[2].starts_with("1.1,Inner,"));
    assert!(lines[2].contains("fw01,Fail"));
}

#[test]
fn delimiter_flag_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    let output = dir.path().join("report.csv");
    std::fs::write(&input, REPORT).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .args(["--delimiter", "tab"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("Section Index\tSection Title"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unparsable_input_reports_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    let output = dir.path().join("report.csv");
    std::fs::write(&input, "").unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("XML Parse Error"));

    assert!(!output.exists());
}

#[test]
fn nonexistent_input_errors() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.csv");

    cmd()
        .arg("/nonexistent/report.xml")
        .arg(&output)
        .assert()
        .failure();

    assert!(!output.exists());
}

#[test]
fn nonexistent_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    let output = dir.path().join("report.csv");
    std::fs::write(&input, REPORT).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .args(["--config", "/nonexistent/config.json"])
        .assert()
        .failure();

    assert!(!output.exists());
}
