//! CLI integration tests against a mock backend.
//!
//! Each test starts a wiremock server, points the CLI at it through
//! `STUDIO_API_URL` and keeps the session file in a temporary directory.

mod common;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    read_session, run_cli_with_env, run_cli_with_env_failure, run_cli_with_env_success,
};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "owner@studio.example",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tokens": {"accessToken": "A1", "refreshToken": "R1"},
            "user": {"id": "u1", "name": "Studio Owner", "email": "owner@studio.example", "role": "admin"}
        })))
        .mount(server)
        .await;
}

fn login(dir: &TempDir, api: &str) {
    run_cli_with_env_success(
        &[
            "login",
            "--email",
            "owner@studio.example",
            "--password",
            "secret123",
        ],
        dir.path(),
        api,
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_and_whoami() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli_with_env(
        &[
            "login",
            "--email",
            "owner@studio.example",
            "--password",
            "secret123",
        ],
        dir.path(),
        &server.uri(),
    );
    assert!(
        output.status.success(),
        "Login failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Logged in successfully"));
    assert!(stdout.contains("Studio Owner"));

    let session = read_session(dir.path()).unwrap();
    assert_eq!(session["accessToken"], "A1");
    assert_eq!(session["refreshToken"], "R1");

    let stdout = run_cli_with_env_success(&["whoami"], dir.path(), &server.uri());
    assert!(stdout.contains("Studio Owner"));
    assert!(stdout.contains("admin"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_without_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let stderr = run_cli_with_env_failure(&["whoami"], dir.path(), &server.uri());
    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_refreshed_transparently() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/photos"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "p1", "title": "Dunes", "category": "landscape"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/photos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"code": "TOKEN_EXPIRED"})))
        .with_priority(10)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A2",
            "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    login(&dir, &server.uri());

    let stdout = run_cli_with_env_success(&["photos", "list"], dir.path(), &server.uri());
    assert!(stdout.contains("Dunes [landscape]"));

    let session = read_session(dir.path()).unwrap();
    assert_eq!(session["accessToken"], "A2");
    assert_eq!(session["refreshToken"], "R2");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(session["user"].as_str().unwrap()).unwrap()["id"],
        "u1"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/photos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"code": "INVALID_TOKEN"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    login(&dir, &server.uri());

    let stderr = run_cli_with_env_failure(&["photos", "list"], dir.path(), &server.uri());
    assert!(stderr.contains("studio login"));
    assert!(read_session(dir.path()).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forbidden_passes_through_and_keeps_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/photos/p1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "admin role required"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    login(&dir, &server.uri());

    let stderr = run_cli_with_env_failure(&["photos", "delete", "p1"], dir.path(), &server.uri());
    assert!(stderr.contains("403"));
    assert_eq!(read_session(dir.path()).unwrap()["accessToken"], "A1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_removes_session_file() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();
    login(&dir, &server.uri());

    let stdout = run_cli_with_env_success(&["logout"], dir.path(), &server.uri());
    assert!(stdout.contains("Logged out"));
    assert!(read_session(dir.path()).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_request_prints_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/testimonials/approved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "t1", "name": "Ana", "message": "Lovely session"}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stdout = run_cli_with_env_success(
        &["request", "get", "/api/testimonials/approved"],
        dir.path(),
        &server.uri(),
    );
    assert!(stdout.contains("200"));
    assert!(stdout.contains("Lovely session"));
}
