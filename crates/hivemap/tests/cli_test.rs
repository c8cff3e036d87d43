//! Integration tests for the `hivemap` CLI binary.
//!
//! Every test points `--source` at a temporary fixture (or at a wiremock
//! server) and isolates config directories, so nothing depends on the
//! user's environment.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const FIXTURE: &str = r#"[
  {"id":"power-1","name":"Brokdorf","type":"power","status":"critical","country":"DE",
   "position":[53.85,9.34],"description":"Pressurized water reactor on the Elbe",
   "history":[{"timestamp":"2024-03-01T08:00:00Z","status":"active"},
              {"timestamp":"2024-03-02T09:30:00Z","status":"critical"}],
   "infoUrl":"https://example.org/brokdorf"},
  {"id":"base-1","name":"Ramstein","type":"base","status":"active","country":"DE","position":[49.44,7.6]},
  {"id":"server-1","name":"Frankfurt DC","type":"server","status":"active","country":"DE","position":[50.11,8.68]},
  {"id":"airport-1","name":"Schiphol","type":"airport","status":"offline","country":"NL","position":[52.31,4.76]},
  {"id":"bad-1","name":"Nowhere","type":"castle","status":"active","country":"DE","position":[50.0,8.0]}
]"#;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `hivemap` binary with env isolation.
fn hivemap_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hivemap");
    cmd.env("HOME", "/tmp/hivemap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/hivemap-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("HIVEMAP_PROFILE")
        .env_remove("HIVEMAP_SOURCE")
        .env_remove("HIVEMAP_LANG")
        .env_remove("HIVEMAP_OUTPUT")
        .env_remove("HIVEMAP_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    file
}

/// A command already pointed at `file`.
fn with_fixture(file: &tempfile::NamedTempFile) -> assert_cmd::Command {
    let mut cmd = hivemap_cmd();
    cmd.arg("--source").arg(file.path());
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hivemap_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    hivemap_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("facilities")
            .and(predicate::str::contains("export"))
            .and(predicate::str::contains("terminal")),
    );
}

#[test]
fn test_completions_bash() {
    hivemap_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_types_in_german() {
    hivemap_cmd()
        .args(["--lang", "de", "-o", "plain", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cityhall"));

    hivemap_cmd()
        .args(["--lang", "de", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kraftwerke"));
}

// ── Facilities ──────────────────────────────────────────────────────

#[test]
fn test_list_skips_malformed_records() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["-o", "plain", "facilities", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let ids: Vec<&str> = stdout.lines().collect();
    assert_eq!(ids, ["power-1", "base-1", "server-1", "airport-1"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("skipped 1"));
}

#[test]
fn test_list_filters_combine() {
    let file = fixture();
    with_fixture(&file)
        .args([
            "-o", "plain", "facilities", "list", "--type", "power", "--type", "server",
            "--country", "de", "--status", "active",
        ])
        .assert()
        .success()
        .stdout(predicate::eq("server-1\n"));
}

#[test]
fn test_list_search_and_counter() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["facilities", "list", "--search", "  ELBE "])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Brokdorf"));
    assert!(!stdout.contains("Ramstein"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Results: 1 of 4 shown"));
}

#[test]
fn test_list_rejects_unknown_type() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["facilities", "list", "--type", "castle"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown facility type"));
}

#[test]
fn test_get_shows_history_newest_first() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["facilities", "get", "power-1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let critical = stdout.find("2024-03-02 09:30").unwrap();
    let active = stdout.find("2024-03-01 08:00").unwrap();
    assert!(critical < active);
    assert!(stdout.contains("Germany (DE)"));
}

#[test]
fn test_get_json() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["-o", "json", "facilities", "get", "base-1"])
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "base");
    assert_eq!(value["position"], serde_json::json!([49.44, 7.6]));
}

#[test]
fn test_get_unknown_facility() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["facilities", "get", "power-99"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("facilities list"));
}

// ── Loading failures ────────────────────────────────────────────────

#[test]
fn test_missing_fixture_exit_code() {
    let output = hivemap_cmd()
        .args(["--source", "/definitely/not/here.json", "facilities", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_malformed_fixture_exit_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let output = with_fixture(&file)
        .args(["facilities", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_unknown_profile() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["--profile", "lab", "alerts"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Profile 'lab' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_fixture() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/facilities.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .mount(&server)
        .await;

    let url = format!("{}/facilities.json", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        hivemap_cmd()
            .args(["--source", &url, "-o", "plain", "alerts"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "power-1\n");
}

// ── Alerts & overlays ───────────────────────────────────────────────

#[test]
fn test_alerts_banner() {
    let file = fixture();
    with_fixture(&file)
        .arg("alerts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Critical alert").and(predicate::str::contains("Brokdorf")));
}

#[test]
fn test_default_connections_resolve() {
    let file = fixture();
    with_fixture(&file)
        .args(["-o", "plain", "overlays", "connections"])
        .assert()
        .success()
        .stdout(predicate::eq("power-1 base-1\nbase-1 server-1\npower-1 server-1\n"));
}

#[test]
fn test_clusters_follow_filters() {
    let file = fixture();
    let output = with_fixture(&file)
        .args([
            "-o", "json", "overlays", "clusters", "--cell", "5", "--country", "DE",
        ])
        .output()
        .unwrap();

    let clusters: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let total: usize = clusters
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["members"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 3);
}

#[test]
fn test_heatmap_weights() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["-o", "json", "overlays", "heatmap"])
        .output()
        .unwrap();
    let points: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(points[0]["intensity"], 1.0);
    assert_eq!(points[1]["intensity"], 0.3);
}

// ── Export ──────────────────────────────────────────────────────────

#[test]
fn test_export_stdout() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["export", "--stdout"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let csv = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "id,name,type,status,country,position,description,history,infoUrl"
    );
    assert_eq!(
        lines[2],
        r#""base-1","Ramstein","base","active","DE",[49.44,7.6],,,"#
    );
    assert!(!csv.ends_with('\n'));
}

#[test]
fn test_export_file_requires_yes_to_overwrite() {
    let file = fixture();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.csv");
    std::fs::write(&target, "old").unwrap();

    with_fixture(&file)
        .args(["export", "--file"])
        .arg(&target)
        .write_stdin("")
        .assert()
        .code(2);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");

    with_fixture(&file)
        .args(["--yes", "export", "--file"])
        .arg(&target)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&target).unwrap().starts_with("id,name"));
}

// ── Terminal ────────────────────────────────────────────────────────

#[test]
fn test_terminal_snapshot_is_deterministic_with_seed() {
    let file = fixture();
    let run = || {
        with_fixture(&file)
            .args([
                "-o", "json", "terminal", "power-1", "--ticks", "5", "--seed", "7",
            ])
            .output()
            .unwrap()
    };
    let a: serde_json::Value = serde_json::from_slice(&run().stdout).unwrap();
    let b: serde_json::Value = serde_json::from_slice(&run().stdout).unwrap();

    assert_eq!(a["readings"], b["readings"]);
    assert_eq!(a["title"], "Power plant control Brokdorf");
    assert_eq!(a["emergency"], false);
}

#[test]
fn test_terminal_emergency() {
    let file = fixture();
    let output = with_fixture(&file)
        .args(["-o", "json", "terminal", "power-1", "--emergency", "--ticks", "3"])
        .output()
        .unwrap();
    let snap: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(snap["emergency"], true);
    assert_eq!(snap["readings"]["output"], 0.0);
    assert_eq!(snap["audit"][0]["message"], "EMERGENCY SHUTDOWN initiated");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    hivemap_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
