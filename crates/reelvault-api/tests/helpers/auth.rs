use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

/// Logged-in test user
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub user_id: Uuid,
    pub token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Create a user through the API and log in as them.
pub async fn register_test_user(client: &TestServer, email: Option<&str>) -> TestUser {
    let email = email.unwrap_or("test@example.com").to_string();
    let password = "TestPassword123!".to_string();

    let created = client
        .post("/api/users")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(created.status_code(), 201, "{}", created.text());

    let login = client
        .post("/api/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(login.status_code(), 200, "{}", login.text());

    let body: Value = login.json();
    TestUser {
        user_id: Uuid::parse_str(body["id"].as_str().expect("Expected 'id' in login response"))
            .expect("Invalid UUID in login response"),
        token: body["token"].as_str().expect("Expected 'token'").to_string(),
        refresh_token: body["refresh_token"]
            .as_str()
            .expect("Expected 'refresh_token'")
            .to_string(),
        email,
        password,
    }
}

/// Create a video owned by `user`; returns its id.
pub async fn create_test_video(client: &TestServer, user: &TestUser, title: &str) -> Uuid {
    let response = client
        .post("/api/videos")
        .add_header("Authorization", user.bearer())
        .json(&json!({ "title": title, "description": "integration test" }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());

    let body: Value = response.json();
    Uuid::parse_str(body["id"].as_str().expect("Expected 'id'")).expect("Invalid video id")
}
