mod common;

use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "s3cret!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["id"].is_i64());
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_token_validates() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "s3cret!").await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().unwrap();

    let claims = app
        .jwt_handler
        .decode(token, Utc::now())
        .expect("Registration token should validate");
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

    // Same token is rejected once past its expiry
    let after_expiry = Utc::now() + Duration::hours(25);
    assert!(app.jwt_handler.decode(token, after_expiry).is_err());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    let first = app.register("alice", "s3cret!").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body: serde_json::Value = first.json().await.unwrap();

    let response = app.register("alice", "anything").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    // First identity is untouched: original password still works
    assert_eq!(app.repository.len().await, 1);
    let login = app.login("alice", "s3cret!").await;
    assert_eq!(login.status(), StatusCode::OK);
    let rejected = app.login("alice", "anything").await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    assert!(first_body["user"]["id"].is_i64());
}

#[tokio::test]
async fn test_register_usernames_are_case_sensitive() {
    let app = TestApp::spawn().await;

    assert_eq!(app.register("alice", "s3cret!").await.status(), StatusCode::OK);
    assert_eq!(app.register("Alice", "s3cret!").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_empty_username() {
    let app = TestApp::spawn().await;

    let response = app.register("", "s3cret!").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid username"));
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_register_empty_password() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid password"));
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/register")
        .header("content-type", "application/json")
        .body("{\"username\": \"alice\"")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/register")
        .json(&json!({ "username": "alice" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret!").await;

    let response = app.login("alice", "s3cret!").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    let claims = app
        .jwt_handler
        .decode(token, Utc::now())
        .expect("Login token should validate");
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret!").await;

    let wrong_password = app.login("alice", "wrong").await;
    let unknown_user = app.login("bob", "s3cret!").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password_body: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_user_body: serde_json::Value = unknown_user.json().await.unwrap();

    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_malformed_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/login")
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_session_with_valid_token() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "s3cret!").await;
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let response = app
        .get_authenticated("/session", token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "alice");
    assert!(body["exp"].is_i64());
}

#[tokio::test]
async fn test_session_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/session")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_session_with_foreign_token() {
    let app = TestApp::spawn().await;

    let foreign = auth::JwtHandler::new(
        &auth::SigningSecret::new("another-secret-key-of-at-least-32-bytes").unwrap(),
    );
    let claims = auth::Claims::for_subject("alice", Utc::now(), Duration::hours(1));
    let token = foreign.encode(&claims).unwrap();

    let response = app
        .get_authenticated("/session", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_with_expired_token() {
    let app = TestApp::spawn().await;

    let issued_at = Utc::now() - Duration::hours(48);
    let claims = auth::Claims::for_subject("alice", issued_at, Duration::hours(24));
    let token = app.jwt_handler.encode(&claims).unwrap();

    let response = app
        .get_authenticated("/session", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/nope")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wrong_method() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/login")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
