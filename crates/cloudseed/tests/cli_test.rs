//! Integration tests for the `cloudseed` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and the offline synthesis path — all without a live metadata service.
#![allow(clippy::unwrap_used)]

use std::io::Write as _;

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `cloudseed` binary with env isolation.
///
/// Clears all `CLOUDSEED_*` env vars and points config directories at a
/// nonexistent path so tests never touch the host's real configuration.
fn cloudseed_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("cloudseed").expect("binary should build");
    cmd.env("HOME", "/tmp/cloudseed-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/cloudseed-cli-test-nonexistent")
        .env_remove("CLOUDSEED_CONFIG_FILE")
        .env_remove("CLOUDSEED_OUTPUT")
        .env_remove("CLOUDSEED_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn netconf_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "dns": {{"nameservers": ["8.8.8.8"]}},
            "interfaces": {{
                "public": [{{"mac": "01:23:45:67:89:AB",
                            "ipv4": {{"ip_address": "1.2.3.4", "netmask": "255.255.0.0", "gateway": "5.6.7.8"}}}}],
                "private": [{{"mac": "bb:00:00:00:00:01",
                             "ipv4": {{"ip_address": "10.0.0.2", "netmask": "255.255.255.0", "gateway": "10.0.0.1"}}}}]
            }}
        }}"#
    )
    .unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cloudseed_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    cloudseed_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("provisioning agent")
            .and(predicate::str::contains("probe"))
            .and(predicate::str::contains("netconf"))
            .and(predicate::str::contains("apply")),
    );
}

#[test]
fn test_completions_bash() {
    cloudseed_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudseed"));
}

// ── Offline synthesis (netconf --file) ──────────────────────────────

#[test]
fn test_netconf_from_file_table() {
    let fixture = netconf_fixture();
    cloudseed_cmd()
        .args(["netconf", "--file"])
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("01:23:45:67:89:ab")
                .and(predicate::str::contains("1.2.3.4/16"))
                .and(predicate::str::contains("bb:00:00:00:00:01")),
        );
}

#[test]
fn test_netconf_from_file_json() {
    let fixture = netconf_fixture();
    let output = cloudseed_cmd()
        .args(["netconf", "-o", "json", "--file"])
        .arg(fixture.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let interfaces = parsed.as_array().unwrap();
    assert_eq!(interfaces.len(), 2);
    // Public interface carries the synthesized default route; private does not.
    assert_eq!(
        interfaces[0]["routes"],
        serde_json::json!(["0.0.0.0/0 via 5.6.7.8"])
    );
    assert_eq!(interfaces[1]["routes"], serde_json::json!([]));
}

#[test]
fn test_netconf_render_emits_unit_text() {
    let fixture = netconf_fixture();
    cloudseed_cmd()
        .args(["netconf", "--render", "--file"])
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[Match]")
                .and(predicate::str::contains("MACAddress=01:23:45:67:89:ab"))
                .and(predicate::str::contains("Destination=0.0.0.0/0"))
                .and(predicate::str::contains("Gateway=5.6.7.8")),
        );
}

#[test]
fn test_netconf_reports_bad_nameserver() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"dns":{{"nameservers":["bad"]}}}}"#).unwrap();

    let output = cloudseed_cmd()
        .args(["netconf", "--file"])
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("could not parse \"bad\" as nameserver IP address"),
        "Expected nameserver diagnostic in output:\n{text}"
    );
}

#[test]
fn test_netconf_missing_file_fails() {
    let output = cloudseed_cmd()
        .args(["netconf", "--file", "/nonexistent/netconf.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("/nonexistent/netconf.json"), "output:\n{text}");
}

// ── Datasource selection ────────────────────────────────────────────

#[test]
fn test_no_datasource_exit_code() {
    // A config whose only datasource probe cannot succeed.
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        "[datasources]\n\
         priority = [\"server-context\"]\n\
         \n\
         [datasources.cloudsigma]\n\
         product_name_path = \"/nonexistent/product_name\"\n"
    )
    .unwrap();

    let output = cloudseed_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("fetch")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "Expected exit code 4");
    let text = combined_output(&output);
    assert!(text.contains("No datasource available"), "output:\n{text}");
}
