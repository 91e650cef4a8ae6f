use std::fs;

use assert_cmd::Command;
use httpmock::prelude::*;
use tempfile::TempDir;

const BIN: &str = "flightmap";

const BODY: &str = r##"{"time": 1700000000, "states": [
    ["abc123", "EL123   ", "Israel", 1700000000, 1700000001, 34.8, 32.0, 10000.0, false, 230.5, 90.0, -1.0, null, 10100.0, "1234", false, 0],
    ["def456", "AF456   ", "France", 1700000000, 1700000001, null, 32.1, 9000.0, false, 220.0, 10.0, 0.0, null, 9100.0, "4321", false, 0],
    ["ghi789", "LY789   ", "Israel", 1700000000, 1700000001, 35.0, 31.9, 0.0, true, 0.0, 180.0, 0.0, null, 0.0, "7000", false, 0]
]}"##;

/// Empty home so that no user configuration gets in the way.
///
fn flightmap(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env("HOME", home.path());
    cmd
}

/// Configuration pointing to the mock server.
///
fn config(home: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let fname = home.path().join("test.hcl");
    let content = format!(
        "version = 1\n\nfeed {{\n  url = \"{}\"\n  timeout = 2\n}}\n",
        server.url("/api/states/all")
    );
    fs::write(&fname, content).unwrap();
    fname
}

#[test]
fn test_empty_args() {
    let home = TempDir::new().unwrap();
    flightmap(&home).assert().failure();
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    flightmap(&home).arg("-h").assert().success();
}

#[test]
fn test_version_opt() {
    let home = TempDir::new().unwrap();
    flightmap(&home).arg("-V").assert().failure();
}

#[test]
fn test_version_keyword() {
    let home = TempDir::new().unwrap();
    flightmap(&home).arg("version").assert().success();
}

#[test]
fn test_bad_keyword() {
    let home = TempDir::new().unwrap();
    flightmap(&home).arg("bouh").assert().failure();
}

#[test]
fn test_completion() {
    let home = TempDir::new().unwrap();
    flightmap(&home).args(["completion", "bash"]).assert().success();
}

#[test]
fn test_missing_config() {
    let home = TempDir::new().unwrap();
    flightmap(&home)
        .args(["-c", "/nonexistent/flightmap.hcl", "version"])
        .assert()
        .failure();
}

#[test]
fn test_fetch() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET).path("/api/states/all");
        then.status(200).body(BODY);
    });
    let cfg = config(&home, &server);

    let out = flightmap(&home)
        .arg("-c")
        .arg(&cfg)
        .arg("fetch")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    m.assert();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Active flights tracked: 1"));
    assert!(out.contains("abc123"));
    assert!(!out.contains("def456"));
    assert!(!out.contains("ghi789"));
}

#[test]
fn test_fetch_failure() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/api/states/all");
        then.status(500);
    });
    let cfg = config(&home, &server);

    let out = flightmap(&home)
        .arg("-c")
        .arg(&cfg)
        .args(["fetch", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!("failed", v["origin"]);
    assert_eq!(0, v["count"]);
    assert!(v["error"].as_str().unwrap().starts_with("API Error:"));
}

#[test]
fn test_render() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/api/states/all");
        then.status(200).body(BODY);
    });
    let cfg = config(&home, &server);
    let page = home.path().join("map.html");

    flightmap(&home)
        .arg("-c")
        .arg(&cfg)
        .arg("render")
        .arg("-o")
        .arg(&page)
        .assert()
        .success();

    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains("<title>Global Flight Tracker - Live</title>"));
    assert!(html.contains("Active flights tracked: 1"));
}
