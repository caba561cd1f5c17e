//! Integration tests for the segparse binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SPEC: &str = "tests/fixtures/spec.toml";
const SENTENCES: &str = "tests/fixtures/sentences.txt";

fn segparse() -> Command {
    Command::cargo_bin("segparse").unwrap()
}

#[test]
fn test_help() {
    segparse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_parse_file_text() {
    segparse()
        .args(["parse", "-c", SPEC, "-i", SENTENCES])
        .assert()
        .success()
        .stdout(predicate::str::contains("(TIME (NUMBER '5') (AMPM 'pm'))"))
        .stdout(predicate::str::contains("(PLACE (CITY 'New York City'))"))
        .stdout(predicate::str::contains("(TIME (NUMBER '10') (AMPM 'am'))"))
        .stdout(predicate::str::contains("# no parse: meet at"));
}

#[test]
fn test_parse_stdin() {
    segparse()
        .args(["parse", "-c", SPEC])
        .write_stdin("7 pm\n")
        .assert()
        .success()
        .stdout("(TIME (NUMBER '7') (AMPM 'pm'))\n");
}

#[test]
fn test_parse_json() {
    let output = segparse()
        .args(["parse", "-c", SPEC, "-i", SENTENCES, "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outputs = value.as_array().unwrap();
    assert_eq!(outputs.len(), 4);
    assert_eq!(outputs[0]["sentence"], "5pm");
    assert_eq!(outputs[0]["parses"][0]["key"], "(TIME NUMBER AMPM)");
    assert_eq!(outputs[3]["parses"][0]["unparsed_prior_input"], "um");
}

#[test]
fn test_parse_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.md");

    segparse()
        .args(["parse", "-c", SPEC, "-i", SENTENCES, "-f", "markdown", "-o"])
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(out).unwrap();
    assert!(written.starts_with("1. 5pm\n"));
    assert!(written.contains("*Parsed sentences: 3 of 4*"));
}

#[test]
fn test_parse_missing_input() {
    segparse()
        .args(["parse", "-c", SPEC, "-i", "no/such/*.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_parse_bad_config() {
    segparse()
        .args(["parse", "-c", "tests/fixtures/absent.toml"])
        .write_stdin("5pm\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_validate() {
    segparse()
        .args(["validate", "-c", SPEC])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules: 2"))
        .stdout(predicate::str::contains("Lexicons: 3"));
}

#[test]
fn test_validate_invalid() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "categories = [\"A\"]\ngrammar = \"A <- B\"\n").unwrap();

    segparse()
        .args(["validate", "-c"])
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn test_list() {
    segparse()
        .args(["list", "strategies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("longest-to-shortest-to-longer"));

    segparse()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown"));
}
