//! Integration tests for the Postgres-backed stores.
//!
//! Requires Docker: a shared Postgres 16 container is started on first use.
//!
//! Covers:
//! - insert + find_by_job_id row decoding
//! - update_progress completed_at stamping
//! - upsert_results on existing and missing rows
//! - list_for_user ordering
//! - latest_completed per platform
//! - the progress range constraint from the migration
//! - store config save and reload

mod common;

use crate::common::{unique_id, PostgresHarness};
use brightdata_client::{JobStatus, Platform};
use chrono::{Duration, Utc};
use serde_json::json;
use storefront_core::domains::scrape_jobs::ScrapeJob;
use storefront_core::domains::store_config::{
    Recognition, StoreConfig, StoreConfigUpdate, Visibility,
};
use storefront_core::kernel::{BaseScrapeJobStore, BaseStoreConfigStore};
use test_context::test_context;

fn running_job(user_id: &str, platform: Platform) -> ScrapeJob {
    ScrapeJob::running(user_id, &unique_id("s"), platform, "https://example.com/store")
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn inserted_job_decodes_platform_and_status(ctx: &PostgresHarness) {
    let job = running_job(&unique_id("user"), Platform::GoogleMaps);
    ctx.store.insert(&job).await.unwrap();

    let stored = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();

    assert_eq!(stored.id, job.id);
    assert_eq!(stored.user_id, job.user_id);
    assert_eq!(stored.platform, Platform::GoogleMaps);
    assert_eq!(stored.status, JobStatus::Running);
    assert_eq!(stored.progress, 0);
    assert!(stored.results.is_none());
    assert!(stored.completed_at.is_none());

    assert!(ctx.store.find_by_job_id("s_missing").await.unwrap().is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn duplicate_job_id_is_rejected(ctx: &PostgresHarness) {
    let job = running_job(&unique_id("user"), Platform::Instagram);
    ctx.store.insert(&job).await.unwrap();

    let again = ScrapeJob::running("other", &job.job_id, Platform::Instagram, &job.url);
    assert!(ctx.store.insert(&again).await.is_err());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn update_progress_stamps_completed_at_once(ctx: &PostgresHarness) {
    let job = running_job(&unique_id("user"), Platform::Facebook);
    ctx.store.insert(&job).await.unwrap();

    ctx.store
        .update_progress(&job.job_id, JobStatus::Ready, 100)
        .await
        .unwrap();
    let ready = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();
    assert_eq!(ready.status, JobStatus::Ready);
    assert_eq!(ready.progress, 100);
    assert!(ready.completed_at.is_none());

    ctx.store
        .update_progress(&job.job_id, JobStatus::Failed, 100)
        .await
        .unwrap();
    let failed = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    let stamped = failed.completed_at.expect("terminal status stamps completed_at");

    ctx.store
        .update_progress(&job.job_id, JobStatus::Failed, 100)
        .await
        .unwrap();
    let again = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();
    assert_eq!(again.completed_at, Some(stamped));
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn upsert_results_completes_existing_row(ctx: &PostgresHarness) {
    let job = running_job(&unique_id("user"), Platform::Instagram);
    ctx.store.insert(&job).await.unwrap();

    let mut done = job.clone();
    done.id = uuid::Uuid::now_v7();
    done.results = Some(json!({"followers": 1500, "posts": 87}));
    ctx.store.upsert_results(&done).await.unwrap();

    let stored = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();
    assert_eq!(stored.id, job.id, "existing row is updated, not replaced");
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.progress, 100);
    assert_eq!(stored.results, Some(json!({"followers": 1500, "posts": 87})));
    assert!(stored.completed_at.is_some());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn upsert_results_inserts_missing_row(ctx: &PostgresHarness) {
    let mut job = running_job(&unique_id("user"), Platform::GoogleMaps);
    job.results = Some(json!({"reviews_count": 12, "rating": 4.1}));
    ctx.store.upsert_results(&job).await.unwrap();

    let stored = ctx.store.find_by_job_id(&job.job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.progress, 100);
    assert!(stored.completed_at.is_some());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn list_for_user_is_newest_first(ctx: &PostgresHarness) {
    let user = unique_id("user");
    let mut older = running_job(&user, Platform::Instagram);
    older.created_at = Utc::now() - Duration::hours(1);
    let newer = running_job(&user, Platform::Facebook);
    let foreign = running_job(&unique_id("user"), Platform::Facebook);

    ctx.store.insert(&older).await.unwrap();
    ctx.store.insert(&newer).await.unwrap();
    ctx.store.insert(&foreign).await.unwrap();

    let jobs = ctx.store.list_for_user(&user).await.unwrap();
    let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(ids, vec![newer.job_id.as_str(), older.job_id.as_str()]);
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn progress_outside_range_is_rejected(ctx: &PostgresHarness) {
    let job = running_job(&unique_id("user"), Platform::Instagram);
    ctx.store.insert(&job).await.unwrap();

    let result = ctx
        .store
        .update_progress(&job.job_id, JobStatus::Running, 101)
        .await;
    assert!(result.is_err());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn latest_completed_picks_newest_for_platform(ctx: &PostgresHarness) {
    let user_id = unique_id("user");

    let mut older = running_job(&user_id, Platform::Instagram);
    older.results = Some(json!({"followers": 1, "posts": 1}));
    older.completed_at = Some(Utc::now() - Duration::hours(2));
    ctx.store.upsert_results(&older).await.unwrap();

    let mut newer = running_job(&user_id, Platform::Instagram);
    newer.results = Some(json!({"followers": 2, "posts": 1}));
    newer.completed_at = Some(Utc::now());
    ctx.store.upsert_results(&newer).await.unwrap();

    ctx.store
        .insert(&running_job(&user_id, Platform::Instagram))
        .await
        .unwrap();

    let latest = ctx
        .store
        .latest_completed(&user_id, Platform::Instagram)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.job_id, newer.job_id);
    assert_eq!(latest.results, Some(json!({"followers": 2, "posts": 1})));

    assert!(ctx
        .store
        .latest_completed(&user_id, Platform::Facebook)
        .await
        .unwrap()
        .is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
async fn store_config_round_trips_and_updates_in_place(ctx: &PostgresHarness) {
    let user_id = unique_id("user");
    let mut config = StoreConfig::new(&user_id);
    ctx.configs.save(&config).await.unwrap();

    config.apply(StoreConfigUpdate {
        business_name: Some("Green Grocer".into()),
        visibility: Some(Visibility {
            show_amenities: false,
            ..Visibility::default()
        }),
        amenities: Some(vec!["wifi".into(), "parking".into()]),
        recognitions: Some(vec![Recognition {
            name: "B Corp".into(),
            icon_url: None,
        }]),
        google_place_id: Some("ChIJ123".into()),
        ..Default::default()
    });
    ctx.configs.save(&config).await.unwrap();

    let stored = ctx.configs.find_for_user(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.id, config.id);
    assert_eq!(stored.business_name.as_deref(), Some("Green Grocer"));
    assert!(!stored.visibility.show_amenities);
    assert_eq!(stored.amenities, vec!["wifi".to_string(), "parking".to_string()]);
    assert_eq!(stored.recognitions.0[0].name, "B Corp");
    assert_eq!(stored.google_place_id.as_deref(), Some("ChIJ123"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store_configs WHERE user_id = $1")
        .bind(&user_id)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert!(ctx.configs.find_for_user("nobody").await.unwrap().is_none());
}
