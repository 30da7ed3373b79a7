use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const ADVICE: &str = "Outgoing Wire Advice
Environment: PROD
ABA: 021000021
Status: PENDING
IMAD: 20240115QMGFT001000123
OMAD: 20240115B1Q8021C000456
Sender ABA {3100}: 021000021 FIRST NATIONAL
Originator {5000}
Name: JOHN DOE
Beneficiary {4200}
Name: JANE ROE
Amount {2000}: 250.50
Status: COMPLETE
";

fn wirex() -> Command {
    Command::cargo_bin("wirex").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn process_text_advice_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "advice.txt", ADVICE);

    let output = wirex().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["environment"], "PROD");
    assert_eq!(record["status"], "COMPLETE");
    assert_eq!(record["sender_name"], "FIRST NATIONAL");
    assert_eq!(record["originator_name"], "JOHN DOE");
    assert_eq!(record["beneficiary_name"], "JANE ROE");
    assert_eq!(record["amount"], 250.5);
    assert!(record["mode"].is_null());
    assert!(record.get("originator_address").is_none());
}

#[test]
fn process_rejects_unrecognised_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "statement.txt", "Environment: PROD\nStatus: OPEN\n");

    wirex()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported document type"));

    wirex()
        .arg("process")
        .arg(&input)
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"OPEN\""));
}

#[test]
fn process_fails_on_malformed_amount() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "bad.txt",
        "IMAD: X1\nOMAD: X2\nAmount {2000}: ABC\n",
    );

    wirex()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse amount"));
}

#[test]
fn process_writes_csv_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "advice.txt", ADVICE);
    let out = dir.path().join("advice.csv");

    wirex()
        .arg("process")
        .arg(&input)
        .args(["--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("environment,aba,mode"));
    assert!(lines.next().unwrap().starts_with("PROD,021000021,,"));
}

#[test]
fn process_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "advice.png", "not an image");

    wirex()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", ADVICE);
    write(dir.path(), "b.txt", &ADVICE.replace("JANE ROE", "RICHARD ROE"));
    write(dir.path(), "c.txt", "IMAD: X1\nOMAD: X2\nAmount {2000}: 1..2\n");
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*.txt", dir.path().display());

    wirex()
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("b.json")).unwrap()).unwrap();
    assert_eq!(b["beneficiary_name"], "RICHARD ROE");
    assert!(!out_dir.join("c.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[1].starts_with("a.txt,success,20240115QMGFT001000123"));
    assert!(rows[3].starts_with("c.txt,error"));
}

#[test]
fn batch_stops_on_error_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.txt", "IMAD: X1\nOMAD: X2\nAmount {2000}: ABC\n");
    let pattern = format!("{}/*.txt", dir.path().display());

    wirex()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    wirex()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    wirex()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.require_classification", "false"])
        .assert()
        .success();

    wirex()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.require_classification"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    wirex()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure();

    // classification disabled through the config file
    let input = write(dir.path(), "statement.txt", "Environment: UAT\n");
    wirex()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("UAT"));
}
