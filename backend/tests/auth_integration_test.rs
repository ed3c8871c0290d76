//! Integration tests for authentication endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_success() {
    let app = common::TestApp::new().await;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let body = json!({
        "email": format!("register_{suffix}@example.com"),
        "password": "SecurePassword123!",
        "nickname": format!("n{}", &suffix[..8]),
    });

    let (status, response) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(!response["access_token"].as_str().unwrap().is_empty());
    assert!(!response["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(response["token_type"], "Bearer");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_email() {
    let app = common::TestApp::new().await;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("duplicate_{suffix}@example.com");

    let body = json!({
        "email": email,
        "password": "SecurePassword123!",
        "nickname": format!("a{}", &suffix[..8]),
    });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    // Same email, different nickname: still a conflict
    let body = json!({
        "email": email,
        "password": "SecurePassword123!",
        "nickname": format!("b{}", &suffix[..8]),
    });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_nickname() {
    let app = common::TestApp::new().await;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let nickname = format!("n{}", &suffix[..8]);

    let body = json!({
        "email": format!("first_{suffix}@example.com"),
        "password": "SecurePassword123!",
        "nickname": nickname,
    });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({
        "email": format!("second_{suffix}@example.com"),
        "password": "SecurePassword123!",
        "nickname": nickname,
    });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_invalid_email() {
    let app = common::TestApp::new().await;

    let body = json!({
        "email": "not-an-email",
        "password": "SecurePassword123!",
        "nickname": "someone",
    });

    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_weak_password() {
    let app = common::TestApp::new().await;

    let body = json!({
        "email": "weak_password@example.com",
        "password": "123",
        "nickname": "weakling",
    });

    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_success() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "email": user.email,
        "password": "SecurePassword123!",
    });

    let (status, response) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(!response["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_wrong_password() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "email": user.email,
        "password": "WrongPassword!",
    });

    let (status, _) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_me_returns_profile() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/auth/me", &user.access_token).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["email"], user.email);
    assert_eq!(response["nickname"], user.nickname);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_me_requires_auth() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/v1/auth/me").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
