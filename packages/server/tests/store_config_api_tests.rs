//! Integration tests for store configuration and the public display page.
//!
//! Covers:
//! - GET/PUT /api/store/config
//! - POST /api/store/scrape for configured social links
//! - GET /api/display/:user_id

mod common;

use crate::common::{TestHarness, OWNER};
use axum::http::{Method, StatusCode};
use brightdata_client::testing::Endpoint;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn config_requires_user(ctx: &TestHarness) {
    let (status, _) = ctx.get("/api/store/config", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn first_get_returns_defaults(ctx: &TestHarness) {
    let (status, body) = ctx.get("/api/store/config", Some(OWNER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(OWNER));
    assert_eq!(body["visibility"]["show_social_likes"], json!(true));
    assert_eq!(body["amenities"], json!([]));
    assert!(body["instagram_username"].is_null());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn put_merges_fields(ctx: &TestHarness) {
    ctx.put(
        "/api/store/config",
        Some(OWNER),
        json!({"business_name": "Green Grocer", "amenities": ["wifi", "parking"]}),
    )
    .await;
    let (status, body) = ctx
        .put(
            "/api/store/config",
            Some(OWNER),
            json!({"instagram_username": "@greengrocer"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["business_name"], json!("Green Grocer"));
    assert_eq!(body["amenities"], json!(["wifi", "parking"]));
    assert_eq!(body["instagram_username"], json!("greengrocer"));

    let (_, fetched) = ctx.get("/api/store/config", Some(OWNER)).await;
    assert_eq!(fetched, body);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn put_rejects_unknown_fields(ctx: &TestHarness) {
    let (status, _) = ctx
        .put("/api/store/config", Some(OWNER), json!({"favourite_colour": "green"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn scrape_starts_jobs_for_links(ctx: &TestHarness) {
    let (status, body) = ctx
        .request(Method::POST, "/api/store/scrape", Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    ctx.put(
        "/api/store/config",
        Some(OWNER),
        json!({"facebook_page_id": "greengrocer"}),
    )
    .await;
    let _ = ctx.transport.clone().with_snapshot_id("s_fb_1");
    let (status, body) = ctx
        .request(Method::POST, "/api/store/scrape", Some(OWNER), None)
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body[0]["status"], json!("job_created"));
    assert_eq!(body[0]["job_id"], json!("s_fb_1"));
    assert_eq!(ctx.transport.calls_to(Endpoint::Trigger), 1);

    let (_, jobs) = ctx.get("/api/scrape-jobs", Some(OWNER)).await;
    assert_eq!(jobs[0]["platform"], json!("facebook"));
    assert_eq!(jobs[0]["url"], json!("https://www.facebook.com/greengrocer"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn display_without_config_is_not_found(ctx: &TestHarness) {
    let (status, body) = ctx.get("/api/display/nobody", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!("not_found"));
    assert_eq!(body["error"], json!("Store nobody not found"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn display_shows_latest_completed_results(ctx: &TestHarness) {
    ctx.put(
        "/api/store/config",
        Some(OWNER),
        json!({"business_name": "Green Grocer", "google_place_id": "ChIJ123"}),
    )
    .await;

    let _ = ctx
        .transport
        .clone()
        .with_snapshot_id("s_gm_1")
        .with_snapshot(json!([{"rating": 4.6, "reviews_count": 210}]));
    ctx.request(Method::POST, "/api/store/scrape", Some(OWNER), None)
        .await;
    let (status, _) = ctx
        .get("/api/scrape-jobs/s_gm_1/results", Some(OWNER))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Public: no user header
    let (status, body) = ctx.get(&format!("/api/display/{}", OWNER), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["business_name"], json!("Green Grocer"));
    assert_eq!(body["social_data"]["googlemaps"]["job_id"], json!("s_gm_1"));
    assert_eq!(
        body["social_data"]["googlemaps"]["data"]["reviews_count"],
        json!(210)
    );
    assert!(body["social_data"].get("instagram").is_none());
}
