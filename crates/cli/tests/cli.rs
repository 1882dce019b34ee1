// ABOUTME: End-to-end tests for the mediaprobe binary.
// ABOUTME: Covers argument handling, error envelopes, exit codes, and file output without network access.

use assert_cmd::Command;
use predicates::prelude::*;

fn mediaprobe() -> Command {
    Command::cargo_bin("mediaprobe").unwrap()
}

#[test]
fn requires_a_url() {
    mediaprobe()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URLS>..."));
}

#[test]
fn help_lists_options() {
    mediaprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--flat"))
        .stdout(predicate::str::contains("--allow-private-networks"));
}

#[test]
fn unsupported_url_fails_with_envelope() {
    mediaprobe()
        .args(["--compact", "https://example.com/watch/1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""ok":false"#))
        .stdout(predicate::str::contains("unsupported URL"));
}

#[test]
fn invalid_url_fails() {
    mediaprobe()
        .arg("not a url")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid URL"));
}

#[test]
fn output_file_receives_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");

    mediaprobe()
        .args(["-o", path.to_str().unwrap(), "https://example.com/a", "https://example.com/b"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["url"], "https://example.com/a");
    assert_eq!(items[1]["ok"], false);
}
