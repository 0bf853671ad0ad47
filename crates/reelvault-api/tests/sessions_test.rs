//! User, login, refresh and revoke integration tests.

mod helpers;

use helpers::auth::register_test_user;
use helpers::{setup_test_app, setup_test_app_with, TestOptions};
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_user_hides_password() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/api/users")
        .json(&json!({ "email": "a@example.com", "password": "pw" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["email"], "a@example.com");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = setup_test_app().await;
    let client = app.client();

    let missing = client
        .post("/api/users")
        .json(&json!({ "email": "a@example.com" }))
        .await;
    assert_eq!(missing.status_code(), 400);

    register_test_user(client, Some("dup@example.com")).await;
    let duplicate = client
        .post("/api/users")
        .json(&json!({ "email": "dup@example.com", "password": "pw" }))
        .await;
    assert_eq!(duplicate.status_code(), 400);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client, None).await;

    let wrong_password = client
        .post("/api/login")
        .json(&json!({ "email": user.email, "password": "nope" }))
        .await;
    assert_eq!(wrong_password.status_code(), 401);

    let unknown = client
        .post("/api/login")
        .json(&json!({ "email": "ghost@example.com", "password": "nope" }))
        .await;
    assert_eq!(unknown.status_code(), 401);

    let body: Value = unknown.json();
    assert_eq!(body["error"], "Incorrect email or password");
}

#[tokio::test]
async fn test_refresh_then_revoke() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client, None).await;

    let refreshed = client
        .post("/api/refresh")
        .add_header("Authorization", format!("Bearer {}", user.refresh_token))
        .await;
    assert_eq!(refreshed.status_code(), 200);
    let token = refreshed.json::<Value>()["token"].as_str().unwrap().to_string();

    // The refreshed access token authenticates
    let videos = client
        .get("/api/videos")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;
    assert_eq!(videos.status_code(), 200);

    let revoked = client
        .post("/api/revoke")
        .add_header("Authorization", format!("Bearer {}", user.refresh_token))
        .await;
    assert_eq!(revoked.status_code(), 204);

    let after_revoke = client
        .post("/api/refresh")
        .add_header("Authorization", format!("Bearer {}", user.refresh_token))
        .await;
    assert_eq!(after_revoke.status_code(), 401);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client, None).await;

    let response = client
        .post("/api/refresh")
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_reset_only_in_dev() {
    let prod = setup_test_app_with(TestOptions {
        platform: "prod",
        ..Default::default()
    })
    .await;
    let forbidden = prod.client().post("/admin/reset").await;
    assert_eq!(forbidden.status_code(), 403);

    let dev = setup_test_app().await;
    let user = register_test_user(dev.client(), None).await;
    let reset = dev.client().post("/admin/reset").await;
    assert_eq!(reset.status_code(), 200);

    let login = dev
        .client()
        .post("/api/login")
        .json(&json!({ "email": user.email, "password": user.password }))
        .await;
    assert_eq!(login.status_code(), 401);
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "ok");
}
