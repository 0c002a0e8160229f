mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use tailkeep_api::rpc::Subscription;

#[tokio::test]
async fn missing_subscription_returns_resource_not_found() -> Result<()> {
    let (state, _backend) = common::offline_state(common::offline_config());
    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/billing/subscription", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    assert!(body.get("data").is_none());
    Ok(())
}

#[tokio::test]
async fn seeded_subscription_is_returned_for_caller_org() -> Result<()> {
    let (state, backend) = common::offline_state(common::offline_config());

    let now = Utc::now();
    backend
        .billing
        .insert(Subscription {
            org_id: "org-1".to_string(),
            plan: "pro".to_string(),
            status: "active".to_string(),
            current_period_start: now,
            current_period_end: now + Duration::days(30),
            trial_end: None,
            stripe_sub_id: Some("sub_123".to_string()),
            updated_at: now,
        })
        .await;

    let server = common::TestServer::spawn(state).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/billing/subscription", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["org_id"], "org-1");
    assert_eq!(body["data"]["plan"], "pro");
    assert_eq!(body["data"]["status"], "active");
    Ok(())
}
