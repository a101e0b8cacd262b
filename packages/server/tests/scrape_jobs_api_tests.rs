//! Integration tests for the scrape job HTTP API.
//!
//! Covers:
//! - POST /api/scrape-jobs in fire-and-forget and wait modes
//! - GET /api/scrape-jobs listing per user
//! - GET /api/scrape-jobs/:job_id status refresh
//! - GET /api/scrape-jobs/:job_id/results collection

mod common;

use crate::common::{TestHarness, OWNER};
use axum::http::StatusCode;
use brightdata_client::testing::Endpoint;
use serde_json::json;
use test_context::test_context;

// =============================================================================
// Health and auth
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_healthy(ctx: &TestHarness) {
    let (status, body) = ctx.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert!(body["timestamp"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_user_header_is_unauthorized(ctx: &TestHarness) {
    let (status, body) = ctx.get("/api/scrape-jobs", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], json!("error"));
}

// =============================================================================
// Start jobs
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn unsupported_platform_is_bad_request(ctx: &TestHarness) {
    let (status, body) = ctx
        .post(
            "/api/scrape-jobs",
            Some(OWNER),
            json!({"platform": "myspace", "url": "https://myspace.com/x"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported platform: myspace"));
    assert_eq!(ctx.transport.call_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn fire_and_forget_returns_job_id_and_records_job(ctx: &TestHarness) {
    let _ = ctx.transport.clone().with_snapshot_id("s_ig_100");

    let (status, body) = ctx
        .post(
            "/api/scrape-jobs",
            Some(OWNER),
            json!({"platform": "instagram", "url": "https://instagram.com/greengrocer"}),
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], json!("job_created"));
    assert_eq!(body["job_id"], json!("s_ig_100"));
    assert_eq!(ctx.transport.calls_to(Endpoint::Progress), 0);

    let (status, jobs) = ctx.get("/api/scrape-jobs", Some(OWNER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    assert_eq!(jobs[0]["job_id"], json!("s_ig_100"));
    assert_eq!(jobs[0]["status"], json!("running"));
    assert_eq!(jobs[0]["platform"], json!("instagram"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn waiting_returns_normalized_data(ctx: &TestHarness) {
    let _ = ctx
        .transport
        .clone()
        .with_snapshot_id("s_ig_200")
        .with_progress_statuses(&["ready"])
        .with_snapshot(json!([{
            "followers_count": 1500,
            "posts_count": 87,
            "username": "greengrocer",
            "url": "https://instagram.com/greengrocer"
        }]));

    let (status, body) = ctx
        .post(
            "/api/scrape-jobs",
            Some(OWNER),
            json!({
                "platform": "instagram",
                "url": "https://instagram.com/greengrocer",
                "wait_for_results": true
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["platform"], json!("instagram"));
    assert_eq!(body["data"]["followers"], json!(1500));
    assert_eq!(body["data"]["posts"], json!(87));

    let (_, jobs) = ctx.get("/api/scrape-jobs", Some(OWNER)).await;
    assert_eq!(jobs[0]["status"], json!("completed"));
    assert_eq!(jobs[0]["progress"], json!(100));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn provider_outage_is_bad_gateway(ctx: &TestHarness) {
    let _ = ctx
        .transport
        .clone()
        .with_trigger_response(503, "maintenance");

    let (status, body) = ctx
        .post(
            "/api/scrape-jobs",
            Some(OWNER),
            json!({"platform": "facebook", "url": "https://facebook.com/greengrocer"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], json!("error"));
    assert!(body.get("job_id").is_none());
    assert!(ctx.job_store.is_empty());
}

// =============================================================================
// Status and results
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn status_refresh_reports_progress(ctx: &TestHarness) {
    let _ = ctx
        .transport
        .clone()
        .with_snapshot_id("s_maps_1")
        .with_progress("running", 60);
    ctx.post(
        "/api/scrape-jobs",
        Some(OWNER),
        json!({"platform": "googlemaps", "url": "https://maps.example/place/grocer"}),
    )
    .await;

    let (status, body) = ctx.get("/api/scrape-jobs/s_maps_1", Some(OWNER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], json!("running"));
    assert_eq!(body["job"]["progress"], json!(60));
    assert_eq!(body["progress"]["status"], json!("running"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn results_not_ready_is_not_found(ctx: &TestHarness) {
    let _ = ctx
        .transport
        .clone()
        .with_snapshot_id("s_fb_9")
        .with_snapshot_response(404, "snapshot not ready");
    ctx.post(
        "/api/scrape-jobs",
        Some(OWNER),
        json!({"platform": "facebook", "url": "https://facebook.com/greengrocer"}),
    )
    .await;

    let (status, body) = ctx.get("/api/scrape-jobs/s_fb_9/results", Some(OWNER)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!("not_found"));
    assert_eq!(body["job_id"], json!("s_fb_9"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn results_are_collected_once_ready(ctx: &TestHarness) {
    let _ = ctx
        .transport
        .clone()
        .with_snapshot_id("s_maps_2")
        .with_snapshot(json!([{
            "reviews_count": "1,204",
            "rating": 4.7,
            "name": "Green Grocer",
            "address": "12 Market St"
        }]));
    ctx.post(
        "/api/scrape-jobs",
        Some(OWNER),
        json!({"platform": "googlemaps", "url": "https://maps.example/place/grocer"}),
    )
    .await;

    let (status, body) = ctx.get("/api/scrape-jobs/s_maps_2/results", Some(OWNER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["data"]["reviews_count"], json!(1204));
    assert_eq!(body["data"]["place_name"], json!("Green Grocer"));

    // Second read is served from the store
    let (status, again) = ctx.get("/api/scrape-jobs/s_maps_2/results", Some(OWNER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, body);
    assert_eq!(ctx.transport.calls_to(Endpoint::Snapshot), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn jobs_are_private_to_their_owner(ctx: &TestHarness) {
    let _ = ctx.transport.clone().with_snapshot_id("s_private");
    ctx.post(
        "/api/scrape-jobs",
        Some(OWNER),
        json!({"platform": "instagram", "url": "https://instagram.com/greengrocer"}),
    )
    .await;

    let (status, body) = ctx.get("/api/scrape-jobs/s_private", Some("someone-else")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!("not_found"));

    let (status, _) = ctx
        .get("/api/scrape-jobs/s_private/results", Some("someone-else"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, jobs) = ctx.get("/api/scrape-jobs", Some("someone-else")).await;
    assert_eq!(jobs, json!([]));
}
