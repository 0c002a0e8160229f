mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tailkeep_api::auth::{generate_jwt, Claims};

#[tokio::test]
async fn create_reminder_defaults_status_and_uses_caller_org() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .json(&json!({
            "title": "Vaccine",
            "due_at": "2025-01-01T00:00:00Z",
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Vaccine");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["org_id"], "org-1");
    Ok(())
}

#[tokio::test]
async fn body_org_override_takes_precedence() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .json(&json!({
            "title": "Cross-org reminder",
            "due_at": "2025-06-01T09:00:00Z",
            "org_id": "org-99",
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["org_id"], "org-99");
    Ok(())
}

#[tokio::test]
async fn invalid_body_returns_stable_field_details() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let bad_body = json!({ "due_at": "not-a-timestamp", "priority": "urgent" });

    let mut detail_runs = Vec::new();
    for _ in 0..2 {
        let res = client
            .post(format!("{}/api/v1/reminders", server.base_url))
            .json(&bad_body)
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");

        let fields: Vec<String> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, ["title", "due_at", "priority"]);
        detail_runs.push(body["error"]["details"].clone());
    }

    // Validating the same malformed body twice yields identical details
    assert_eq!(detail_runs[0], detail_runs[1]);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_rejected() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .body("definitely not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    Ok(())
}

#[tokio::test]
async fn list_with_limit_zero_uses_default_page_size() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .json(&json!({ "title": "Checkup", "due_at": "2025-03-01T00:00:00Z" }))
        .send()
        .await?;

    let res = client
        .get(format!("{}/api/v1/reminders?limit=0", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["limit"], 20);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn list_pages_through_cursor() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    for day in 1..=3 {
        client
            .post(format!("{}/api/v1/reminders", server.base_url))
            .json(&json!({
                "title": format!("Reminder {day}"),
                "due_at": format!("2025-01-0{day}T00:00:00Z"),
            }))
            .send()
            .await?;
    }

    let res = client
        .get(format!("{}/api/v1/reminders?limit=2", server.base_url))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], 3);
    let cursor = body["data"]["next_cursor"].as_str().unwrap().to_string();

    let res = client
        .get(format!(
            "{}/api/v1/reminders?limit=2&cursor={}",
            server.base_url, cursor
        ))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Reminder 3");
    assert!(body["data"]["next_cursor"].is_null());
    Ok(())
}

#[tokio::test]
async fn malformed_cursor_is_treated_as_first_page() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .json(&json!({ "title": "First", "due_at": "2025-01-01T00:00:00Z" }))
        .send()
        .await?;

    let res = client
        .get(format!(
            "{}/api/v1/reminders?cursor=!!not-a-cursor!!",
            server.base_url
        ))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn query_org_override_lists_other_org() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .json(&json!({
            "title": "Other org reminder",
            "due_at": "2025-01-01T00:00:00Z",
            "org_id": "org-2",
        }))
        .send()
        .await?;

    // Caller's own org sees nothing
    let res = client
        .get(format!("{}/api/v1/reminders", server.base_url))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);

    // Explicit org_id query override does
    let res = client
        .get(format!("{}/api/v1/reminders?org_id=org-2", server.base_url))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/reminders?status=done", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(body["error"]["details"][0]["field"], "status");
    Ok(())
}

#[tokio::test]
async fn jwt_mode_requires_bearer_and_derives_org_from_claims() -> Result<()> {
    let secret = "test-secret";
    let (state, _backend) = common::jwt_state(common::offline_config(), secret);
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    // No credentials
    let res = client
        .get(format!("{}/api/v1/reminders", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    // Valid token: org comes from the claims
    let claims = Claims::new(uuid::Uuid::new_v4(), "org-7".to_string(), 1);
    let token = generate_jwt(&claims, secret)?;

    let res = client
        .post(format!("{}/api/v1/reminders", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Vaccine", "due_at": "2025-01-01T00:00:00Z" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["org_id"], "org-7");
    Ok(())
}
