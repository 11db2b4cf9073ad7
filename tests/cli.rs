//! Binary-level tests: exit codes, stdin handling and the delivery report.

mod support;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pushrelay::event::decode_form;

use support::TestRepo;

const ZERO: &str = "0000000000000000000000000000000000000000";

/// The hook binary with no ambient configuration.
fn pushrelay(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pushrelay").unwrap();
    cmd.env_remove("GIT_DIR")
        .env_remove("PUSHRELAY_CONFIG")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn missing_endpoints_is_usage_error() {
    let home = TempDir::new().unwrap();
    pushrelay(home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unsupported_scheme_is_usage_error() {
    let home = TempDir::new().unwrap();
    pushrelay(home.path())
        .arg("ftp://files.test/")
        .assert()
        .code(2);
}

#[test]
fn git_dir_that_is_not_a_repository_fails() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    pushrelay(home.path())
        .env("GIT_DIR", empty.path().join("nothing.git"))
        .arg("http://127.0.0.1:9/hook")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_repository_config_fails() {
    let home = TempDir::new().unwrap();
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "a\n", "one");
    std::fs::write(repo.git_dir().join("pushrelay.toml"), "timeout_secs = 0\n").unwrap();

    pushrelay(home.path())
        .env("GIT_DIR", repo.git_dir())
        .arg("http://127.0.0.1:9/hook")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn malformed_input_still_exits_zero() {
    let home = TempDir::new().unwrap();
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "a\n", "one");

    pushrelay(home.path())
        .current_dir(repo.path())
        .arg("http://127.0.0.1:9/hook")
        .write_stdin("this is not a ref update\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delivers_push_and_reports_failures_without_failing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let repo = TestRepo::new();
    let head = repo.commit_file("README", "hello\n", "initial import");
    std::fs::write(
        repo.git_dir().join("pushrelay.toml"),
        "[repository]\nname = \"custom\"\nowner = \"team\"\n",
    )
    .unwrap();

    let good = format!("{}/hook", server.uri());
    let git_dir = repo.git_dir();
    let home_path = home.path().to_path_buf();
    let input = format!("{} {} refs/heads/main\n", ZERO, head);

    let outcome = tokio::task::spawn_blocking(move || {
        pushrelay(&home_path)
            .env("GIT_DIR", git_dir)
            .args(["--timeout", "2", good.as_str(), "http://127.0.0.1:9/hook"])
            .write_stdin(input)
            .assert()
    })
    .await
    .unwrap();

    outcome
        .success()
        .stdout(predicate::str::contains("delivered (HTTP 200)"))
        .stderr(predicate::str::contains("failed"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let payload = decode_form(std::str::from_utf8(&requests[0].body).unwrap()).unwrap();
    assert_eq!(payload.after, head.as_str());
    assert_eq!(payload.repository.name, "custom");
    assert_eq!(payload.repository.owner.name, "team");
    assert_eq!(payload.commits.len(), 1);
    assert_eq!(payload.commits[0].added, vec!["README"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quiet_mode_prints_nothing_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let repo = TestRepo::new();
    let head = repo.commit_file("a.txt", "a\n", "one");

    let endpoint = format!("{}/hook", server.uri());
    let work_tree = repo.path().to_path_buf();
    let home_path = home.path().to_path_buf();
    let input = format!("{} {} refs/heads/main\n", ZERO, head);

    let outcome = tokio::task::spawn_blocking(move || {
        pushrelay(&home_path)
            .current_dir(work_tree)
            .args(["--quiet", endpoint.as_str()])
            .write_stdin(input)
            .assert()
    })
    .await
    .unwrap();

    outcome.success().stdout(predicate::str::is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn debug_mode_prints_ref_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let repo = TestRepo::new();
    let head = repo.commit_file("a.txt", "a\n", "one");

    let endpoint = format!("{}/hook", server.uri());
    let work_tree = repo.path().to_path_buf();
    let home_path = home.path().to_path_buf();
    let input = format!("{} {} refs/heads/main\n", ZERO, head);

    let outcome = tokio::task::spawn_blocking(move || {
        pushrelay(&home_path)
            .current_dir(work_tree)
            .args(["--debug", endpoint.as_str()])
            .write_stdin(input)
            .assert()
    })
    .await
    .unwrap();

    outcome.success().stdout(predicate::str::contains(
        "refs/heads/main: 1 commit(s), delivered to 1/1 target(s)",
    ));
}
