//! Integration tests for the xgotop-validate binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cmd() -> Command {
    Command::cargo_bin("xgotop-validate").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

const RATES: &str = "makeslice:0.1,makemap:0.2,newobject:0.5,newgoroutine:0.1";

#[test]
fn test_validate_prints_report() {
    cmd()
        .args(["validate", &fixture("baseline.json"), &fixture("sampled.json"), RATES])
        .assert()
        .success()
        .stdout(predicate::str::contains("SAMPLING VALIDATION REPORT"))
        .stdout(predicate::str::contains("newgoroutine"))
        .stdout(predicate::str::contains("Pass Rate: 100.0%"))
        .stdout(predicate::str::contains("PASS: all sampling rates are within tolerance"));
}

#[test]
fn test_validate_tight_tolerance_reports_failure() {
    cmd()
        .args([
            "validate",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
            RATES,
            "--tolerance",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAIL: sampling rates outside tolerance for newgoroutine"));
}

#[test]
fn test_strict_exit_code_on_failure() {
    cmd()
        .args([
            "validate",
            "--strict",
            "--tolerance",
            "2",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
            RATES,
        ])
        .assert()
        .code(2);
}

#[test]
fn test_strict_exit_code_without_breakdown() {
    cmd()
        .args([
            "validate",
            "--strict",
            &fixture("baseline.json"),
            &fixture("legacy_total_only.json"),
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("NO EVALUABLE DATA"))
        .stderr(predicate::str::contains("per-type breakdown unavailable"));
}

#[test]
fn test_strict_exit_code_for_capture_without_counts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"rps\": [1.0, 2.0]}}").unwrap();

    cmd()
        .args([
            "validate",
            "--strict",
            &fixture("baseline.json"),
            file.path().to_str().unwrap(),
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("NO EVALUABLE DATA"))
        .stdout(predicate::str::contains("sampled (no event counts at all)"))
        .stdout(predicate::str::contains("FAIL").not());
}

#[test]
fn test_exact_tolerance_boundary_passes() {
    let mut baseline = tempfile::NamedTempFile::new().unwrap();
    write!(baseline, "{{\"event_counts\": {{\"2\": 1000}}}}").unwrap();
    let mut sampled = tempfile::NamedTempFile::new().unwrap();
    write!(sampled, "{{\"event_counts\": {{\"2\": 950}}}}").unwrap();

    cmd()
        .args([
            "validate",
            "--strict",
            baseline.path().to_str().unwrap(),
            sampled.path().to_str().unwrap(),
            "--tolerance",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("5.00       PASS"));
}

#[test]
fn test_inspect_shows_unknown_ids() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"event_counts\": {{\"4\": 10, \"7\": 3}}}}").unwrap();

    cmd()
        .args(["inspect", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown(7)     :          3"))
        .stdout(predicate::str::contains("TOTAL          :         13"));
}

#[test]
fn test_missing_rates_warns_about_default() {
    cmd()
        .args(["validate", &fixture("baseline.json"), &fixture("baseline.json")])
        .assert()
        .success()
        .stderr(predicate::str::contains("expected at rate 1.0"))
        .stdout(predicate::str::contains("Pass Rate: 100.0%"));
}

#[test]
fn test_json_output_parses() {
    let output = cmd()
        .args([
            "validate",
            "--format",
            "json",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
            RATES,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "xgotop-sampling-v1");
    assert_eq!(parsed["verdict"]["status"], "pass");
    assert_eq!(parsed["results"].as_array().unwrap().len(), 6);
    assert_eq!(parsed["summary"]["pass_rate"], 100.0);
}

#[test]
fn test_config_file_supplies_rates() {
    cmd()
        .args([
            "validate",
            "--config",
            &fixture("sampling.toml"),
            &fixture("baseline.json"),
            &fixture("sampled.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pass Rate: 100.0%"));
}

#[test]
fn test_cli_tolerance_overrides_config() {
    cmd()
        .args([
            "validate",
            "--config",
            &fixture("sampling.toml"),
            "--tolerance",
            "2",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tolerance: 2.00%"))
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_missing_file_fails() {
    cmd()
        .args(["validate", "/nonexistent/base.json", &fixture("sampled.json")])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error reading metrics file"));
}

#[test]
fn test_malformed_json_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"event_counts\": ").unwrap();

    cmd()
        .args(["validate", file.path().to_str().unwrap(), &fixture("sampled.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn test_out_of_range_rate_fails() {
    cmd()
        .args([
            "validate",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
            "makemap:1.5",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("between 0 and 1"));
}

#[test]
fn test_negative_tolerance_fails() {
    cmd()
        .args([
            "validate",
            "--tolerance",
            "-5",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_unknown_rate_name_warns() {
    cmd()
        .args([
            "validate",
            &fixture("baseline.json"),
            &fixture("baseline.json"),
            "newproc1:0.5",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("newproc1"));
}

#[test]
fn test_inspect_reports_each_file() {
    cmd()
        .args([
            "inspect",
            &fixture("baseline.json"),
            &fixture("legacy_total_only.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("event_counts field found"))
        .stdout(predicate::str::contains("casgstatus     :     50,000"))
        .stdout(predicate::str::contains("event_counts field NOT found"))
        .stdout(predicate::str::contains("total_events: 98,000"))
        .stdout(predicate::str::contains("rps: max=11230, samples=3"));
}

#[test]
fn test_inspect_continues_after_bad_file() {
    cmd()
        .args(["inspect", "/nonexistent/m.json", &fixture("baseline.json")])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR:"))
        .stdout(predicate::str::contains("event_counts field found"));
}

#[test]
fn test_debug_flag_accepted() {
    cmd()
        .args([
            "validate",
            "--debug",
            &fixture("baseline.json"),
            &fixture("sampled.json"),
            RATES,
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}
