//! Runs the `smmlv` binary and checks that `--json` writes nothing but JSON
//! to stdout while log records go to stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_smmlv"))
        .args(["--log-level", "info"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run smmlv");
    assert!(
        output.status.success(),
        "smmlv failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}):\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn compute_json_is_parseable_and_logs_go_to_stderr() {
    let wages = fixture("wages.csv");

    let output = run(&[
        "compute",
        "--wages",
        wages.to_str().expect("utf-8 path"),
        "--initial",
        "5000000",
        "--addition",
        "2500000",
        "--participation",
        "50",
        "--termination-date",
        "2022-12-31",
        "--json",
    ]);

    let value = stdout_json(&output);
    assert_eq!(
        value["derived"],
        json!({
            "termination_year": 2022,
            "final_affected_value": "7500000",
            "wage_unit_value": "7.5",
            "participation_wage_unit_value": "3.75",
            "current_value": "5338125",
        })
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("minimum wage table loaded"));
}

#[test]
fn batch_json_is_parseable() {
    let wages = fixture("wages.csv");
    let records = fixture("experiences.csv");

    let output = run(&[
        "batch",
        "--wages",
        wages.to_str().expect("utf-8 path"),
        "--records",
        records.to_str().expect("utf-8 path"),
        "--json",
    ]);

    let value = stdout_json(&output);
    assert_eq!(value["saved"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["rejected"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["saved"][0]["derived"]["current_value"], json!("5338125"));
}

#[test]
fn expirations_json_is_parseable() {
    let documents = fixture("documents.csv");

    let output = run(&[
        "expirations",
        "--documents",
        documents.to_str().expect("utf-8 path"),
        "--today",
        "2026-10-18",
        "--window",
        "30",
        "--json",
    ]);

    let value = stdout_json(&output);
    let ids: Vec<i64> = value["notices"]
        .as_array()
        .expect("notices array")
        .iter()
        .filter_map(|notice| notice["document_id"].as_i64())
        .collect();
    assert_eq!(ids, vec![2, 5, 1]);
    assert_eq!(value["window_days"], json!(30));
}
