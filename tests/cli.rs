mod util;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use util::{DOC_A_RESPONSE, FakeSearchServer};

/// Command isolated from the developer's config, env and colors.
fn cmd(data: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("alphaquery");
    cmd.env("ALPHAQUERY_CONFIG", data.path().join("absent.toml"))
        .env_remove("ALPHAQUERY_ENDPOINT")
        .env_remove("ALPHAQUERY_TIMEOUT_MS")
        .env_remove("ALPHAQUERY_CATEGORY_MATCH")
        .env("ALPHAQUERY_DATA_DIR", data.path())
        .env("NO_COLOR", "1");
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn seed_session(data: &TempDir, server: &FakeSearchServer) {
    cmd(data)
        .args(["--endpoint", server.endpoint(), "search", "machine learning"])
        .assert()
        .success();
}

#[test]
fn search_prints_first_page_as_json() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);

    let output = cmd(&data)
        .args([
            "--endpoint",
            server.endpoint(),
            "search",
            "machine learning",
            "--method",
            "tfidf",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let page = json_stdout(&output);
    assert_eq!(page["query"], "machine learning");
    assert_eq!(page["method"], "tfidf");
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_count"], 1);
    assert_eq!(page["results"][0]["title"], "Doc A");
    assert_eq!(page["results"][0]["index"], 1);
    assert_eq!(page["categories"], serde_json::json!(["ai", "ml"]));
    assert_eq!(page["metrics"]["f1"], 0.77);

    assert!(data.path().join("session.json").exists());
    let sent: serde_json::Value = serde_json::from_str(&server.requests()[0]).unwrap();
    assert_eq!(sent, serde_json::json!({"query": "machine learning", "method": "tfidf"}));
}

#[test]
fn empty_query_is_rejected_without_a_request() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok("[]");

    cmd(&data)
        .args(["--endpoint", server.endpoint(), "search", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Por favor, ingresa una consulta."));
    assert!(server.requests().is_empty());
}

#[test]
fn service_failure_reports_generic_message() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::start(500, "{}");

    cmd(&data)
        .args(["--endpoint", server.endpoint(), "search", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No se pudo realizar la búsqueda. Intenta nuevamente.",
        ));
}

#[test]
fn cached_results_filter_and_show() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);
    seed_session(&data, &server);

    let output = cmd(&data)
        .args(["results", "--category", "zzz", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let page = json_stdout(&output);
    assert_eq!(page["selected_category"], "zzz");
    assert_eq!(page["total"], 0);

    // Clearing the filter brings Doc A back.
    let output = cmd(&data)
        .args(["results", "--category", "", "--json"])
        .output()
        .unwrap();
    assert_eq!(json_stdout(&output)["total"], 1);

    let output = cmd(&data).args(["show", "1", "--json"]).output().unwrap();
    assert!(output.status.success());
    let detail = json_stdout(&output);
    assert_eq!(detail["title"], "Doc A");
    assert_eq!(detail["category"], "ai,ml");
    assert_eq!(detail["method"], "tfidf");

    cmd(&data)
        .args(["show", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no result #2"));
}

#[test]
fn rejected_and_failed_searches_keep_the_cached_session() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);
    seed_session(&data, &server);
    let before = std::fs::read_to_string(data.path().join("session.json")).unwrap();

    cmd(&data)
        .args(["--endpoint", server.endpoint(), "search", "   ", "-m", "bow"])
        .assert()
        .failure();

    let broken = FakeSearchServer::start(500, "{}");
    cmd(&data)
        .args(["--endpoint", broken.endpoint(), "search", "grain", "-m", "word2vec"])
        .assert()
        .failure();

    let after = std::fs::read_to_string(data.path().join("session.json")).unwrap();
    assert_eq!(after, before);

    let output = cmd(&data).args(["show", "1", "--json"]).output().unwrap();
    let detail = json_stdout(&output);
    assert_eq!(detail["method"], "tfidf");
}

#[test]
fn results_without_cache_fail() {
    let data = TempDir::new().unwrap();
    cmd(&data)
        .arg("results")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached session"));
}

#[test]
fn out_of_range_page_fails() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);
    seed_session(&data, &server);

    cmd(&data)
        .args(["results", "--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page 3 out of range"));
}

#[test]
fn session_show_and_clear() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);
    seed_session(&data, &server);

    let output = cmd(&data)
        .args(["session", "show", "--json"])
        .output()
        .unwrap();
    let session = json_stdout(&output);
    assert_eq!(session["query"], "machine learning");
    assert_eq!(session["results"].as_array().map(Vec::len), Some(1));

    cmd(&data)
        .args(["session", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("session cleared"));
    assert!(!data.path().join("session.json").exists());

    // Clearing twice is fine.
    cmd(&data).args(["session", "clear"]).assert().success();
}

#[test]
fn headless_tui_renders_cached_results() {
    let data = TempDir::new().unwrap();
    let server = FakeSearchServer::ok(DOC_A_RESPONSE);
    seed_session(&data, &server);

    cmd(&data)
        .args(["tui", "--once"])
        .env("TUI_HEADLESS", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Doc A"))
        .stdout(predicate::str::contains("AlphaQuery"));
}

#[test]
fn completions_mention_subcommands() {
    let data = TempDir::new().unwrap();
    cmd(&data)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alphaquery"))
        .stdout(predicate::str::contains("search"));
}
