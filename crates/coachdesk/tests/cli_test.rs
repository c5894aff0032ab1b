//! Integration tests for the `coachdesk` CLI binary.
//!
//! Argument parsing, help output, completions and configuration errors run
//! without a backend; the end-to-end cases talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `coachdesk` binary with env isolation.
///
/// Clears all `COACHDESK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn coachdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("coachdesk");
    cmd.env("HOME", "/tmp/coachdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/coachdesk-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("COACHDESK_CUSTOMER_URL")
        .env_remove("COACHDESK_TRAINING_URL")
        .env_remove("COACHDESK_CONFIG")
        .env_remove("COACHDESK_OUTPUT")
        .env_remove("COACHDESK_INSECURE")
        .env_remove("COACHDESK_TIMEOUT")
        .env_remove("COACHDESK_API__CUSTOMER_URL")
        .env_remove("COACHDESK_API__TRAINING_URL");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn customer(server: &MockServer, n: u32, first: &str, last: &str) -> Value {
    let href = format!("{}/api/customers/{n}", server.uri());
    json!({
        "firstname": first,
        "lastname": last,
        "streetaddress": "1 Main St",
        "postcode": "12345",
        "city": "Springfield",
        "email": format!("{}@example.com", first.to_lowercase()),
        "phone": "555-0100",
        "_links": { "self": { "href": href }, "customer": { "href": href } }
    })
}

/// Run a prepared command off the async runtime and collect its output.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn against(server: &MockServer) -> assert_cmd::Command {
    let base = format!("{}/api", server.uri());
    let mut cmd = coachdesk_cmd();
    cmd.args(["--customer-url", &base, "--training-url", &base]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = coachdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    coachdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("personal-training")
            .and(predicate::str::contains("customers"))
            .and(predicate::str::contains("trainings"))
            .and(predicate::str::contains("calendar")),
    );
}

#[test]
fn test_version_flag() {
    coachdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coachdesk"));
}

#[test]
fn test_invalid_subcommand() {
    coachdesk_cmd()
        .arg("invoices")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_trainings_add_requires_customer() {
    coachdesk_cmd()
        .args([
            "trainings",
            "add",
            "--date",
            "2025-10-15",
            "--duration",
            "60",
            "--activity",
            "Yoga",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--customer"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    coachdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coachdesk"));
}

#[test]
fn test_completions_zsh() {
    coachdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_base_url_is_config_error() {
    let output = coachdesk_cmd().args(["customers", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(9));
    let text = combined_output(&output);
    assert!(
        text.contains("api.customer_url"),
        "Expected missing-URL diagnostic:\n{text}"
    );
}

#[test]
fn test_malformed_base_url_is_config_error() {
    coachdesk_cmd()
        .args([
            "--customer-url",
            "not a url",
            "--training-url",
            "http://localhost/api",
            "stats",
        ])
        .assert()
        .code(9);
}

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("coachdesk.toml");
    coachdesk_cmd()
        .args(["config", "path", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("coachdesk.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");

    coachdesk_cmd()
        .arg("--config")
        .arg(&file)
        .args([
            "config",
            "init",
            "--customer-url",
            "http://localhost:8080/api/",
            "--training-url",
            "http://localhost:8080/api/",
            "--customer-reference",
            "id",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&file).unwrap();
    assert!(written.contains("customer_url = \"http://localhost:8080/api/\""));
    assert!(written.contains("customer_reference = \"id\""));

    coachdesk_cmd()
        .arg("--config")
        .arg(&file)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"missing_self_link\": \"drop\"")
                .and(predicate::str::contains("\"timeout\": 30")),
        );
}

#[test]
fn test_config_init_rejects_unknown_policy() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    coachdesk_cmd()
        .arg("--config")
        .arg(&file)
        .args([
            "config",
            "init",
            "--customer-url",
            "http://localhost/api",
            "--training-url",
            "http://localhost/api",
            "--missing-self-link",
            "guess",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("guess"));
    assert!(!file.exists());
}

#[test]
fn test_config_init_without_terminal_needs_urls() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    coachdesk_cmd()
        .arg("--config")
        .arg(&file)
        .args(["config", "init"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interactively"));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_customers_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": { "customers": [
                customer(&server, 1, "Ada", "Lovelace"),
                customer(&server, 2, "Alan", "Turing"),
            ]}
        })))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["customers", "list", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["firstname"], "Ada");
    assert_eq!(
        rows[1]["rowId"],
        format!("{}/api/customers/2", server.uri())
    );
}

#[tokio::test]
async fn test_trainings_list_plain_prints_links() {
    let server = MockServer::start().await;
    let t1 = format!("{}/api/trainings/1", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/trainings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": { "trainings": [{
                "date": "2025-10-15T10:00:00.000+00:00",
                "duration": 60,
                "activity": "Yoga",
                "_links": {
                    "self": { "href": t1 },
                    "customer": { "href": format!("{t1}/customer") }
                }
            }]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/trainings/1/customer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(customer(&server, 1, "Ada", "Lovelace")),
        )
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["trainings", "list", "-o", "plain"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), t1);
}

#[tokio::test]
async fn test_stats_sums_minutes_per_activity() {
    let server = MockServer::start().await;
    let items: Vec<Value> = [(1, "Yoga", 60), (2, "Boxing", 45), (3, "Yoga", 30)]
        .into_iter()
        .map(|(n, activity, duration)| {
            json!({
                "date": "2025-10-15",
                "duration": duration,
                "activity": activity,
                "_links": { "self": { "href": format!("{}/api/trainings/{n}", server.uri()) } }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/trainings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "_embedded": { "trainings": items } })),
        )
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["stats", "-o", "plain"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Boxing\t45\nYoga\t90"
    );
}

#[tokio::test]
async fn test_get_unknown_customer_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let href = format!("{}/api/customers/99", server.uri());
    let mut cmd = against(&server);
    cmd.args(["customers", "get", &href]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("customer"));
}

#[tokio::test]
async fn test_delete_without_terminal_requires_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let href = format!("{}/api/customers/1", server.uri());
    let mut cmd = against(&server);
    cmd.args(["customers", "delete", &href]).write_stdin("");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("confirmation"));
}

#[tokio::test]
async fn test_unreachable_backend_exits_connection() {
    let mut cmd = coachdesk_cmd();
    cmd.args([
        "--customer-url",
        "http://127.0.0.1:9/api",
        "--training-url",
        "http://127.0.0.1:9/api",
        "--timeout",
        "5",
        "customers",
        "list",
    ]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
