//! Integration tests for weight tracking endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_log_weight_requires_auth() {
    let app = common::TestApp::new().await;

    let body = json!({ "weight": 75.5 });

    let (status, _) = app.post("/api/v1/weight", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_log_weight_success() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "date": "2024-03-01", "weight": 75.5 });

    let (status, response) = app
        .post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["weight_kg"], 75.5);
    assert_eq!(response["date"], "2024-03-01");
    assert!(response["change"].is_null());
    assert!(!response["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_log_weight_rejects_out_of_range() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "weight": 12.0 });

    let (status, _) = app
        .post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_date_overwrites_entry() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for (date, weight) in [("2024-03-01", 70.0), ("2024-03-02", 69.0), ("2024-03-02", 68.5)] {
        let body = json!({ "date": date, "weight": weight });
        let (status, _) = app
            .post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, response) = app.get_auth("/api/v1/weight", &user.access_token).await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let entries = response["entries"].as_array().unwrap();

    // Exactly one entry for the repeated date, holding the later value
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["date"], "2024-03-02");
    assert_eq!(entries[1]["weight_kg"], 68.5);
    assert_eq!(response["days_recorded"], 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_history_aggregates_and_changes() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for (date, weight) in [("2024-03-01", 70.0), ("2024-03-03", 69.0), ("2024-03-05", 68.5)] {
        let body = json!({ "date": date, "weight": weight });
        app.post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
            .await;
    }

    let (status, response) = app.get_auth("/api/v1/weight", &user.access_token).await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["current_weight"], 68.5);
    assert_eq!(response["total_change"], -1.5);
    assert_eq!(response["days_recorded"], 3);

    let entries = response["entries"].as_array().unwrap();
    assert!(entries[0]["change"].is_null());
    assert_eq!(entries[1]["change"], -1.0);
    assert_eq!(entries[2]["change"], -0.5);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_history_empty() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/weight", &user.access_token).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["entries"].as_array().unwrap().len(), 0);
    assert_eq!(response["days_recorded"], 0);
    assert!(response.get("current_weight").is_none() || response["current_weight"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_weekly_summary_buckets() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    // Two entries in one week, one in the next (2024-03-11 is a Monday)
    for (date, weight) in [("2024-03-11", 71.0), ("2024-03-13", 70.0), ("2024-03-19", 69.5)] {
        let body = json!({ "date": date, "weight": weight });
        app.post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
            .await;
    }

    let (status, response) = app
        .get_auth("/api/v1/weight/weekly", &user.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let weeks = response["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0]["week_start"], "2024-03-11");
    assert_eq!(weeks[0]["average_weight"], 70.5);
    assert_eq!(weeks[0]["entries_count"], 2);
    assert_eq!(weeks[1]["change_from_previous_week"], -1.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_csv_export() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for (date, weight) in [("2024-03-01", 70.0), ("2024-03-02", 69.0)] {
        let body = json!({ "date": date, "weight": weight });
        app.post_auth("/api/v1/weight", &body.to_string(), &user.access_token)
            .await;
    }

    let (status, body) = app
        .get_auth("/api/v1/weight/export", &user.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "date,weight_kg,change");
    assert_eq!(lines.len(), 3);
}
