//! Server dependencies for activities (using traits for testability)
//!
//! Everything a request handler needs is reached through `ServerDeps`. The
//! provider transport and both stores are trait objects so tests can
//! swap in `MockTransport` and the memory stores.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use brightdata_client::{BrightDataClient, HttpTransport, JobStatus, Platform, Transport};
use sqlx::PgPool;

use crate::config::Config;
use crate::domains::scrape_jobs::ScrapeJob;
use crate::domains::store_config::StoreConfig;
use crate::kernel::{BaseScrapeJobStore, BaseStoreConfigStore};

/// Provider client over a boxed transport, so the HTTP one and test doubles share a type.
pub type ScrapeClient = BrightDataClient<Arc<dyn Transport>>;

// =============================================================================
// PostgresScrapeJobStore (implements BaseScrapeJobStore)
// =============================================================================

/// Job store backed by the `scrape_jobs` table
pub struct PostgresScrapeJobStore {
    pool: PgPool,
}

impl PostgresScrapeJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseScrapeJobStore for PostgresScrapeJobStore {
    async fn insert(&self, job: &ScrapeJob) -> Result<()> {
        job.insert(&self.pool).await
    }

    async fn find_by_job_id(&self, job_id: &str) -> Result<Option<ScrapeJob>> {
        ScrapeJob::find_by_job_id(job_id, &self.pool).await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScrapeJob>> {
        ScrapeJob::find_by_user(user_id, &self.pool).await
    }

    async fn latest_completed(&self, user_id: &str, platform: Platform) -> Result<Option<ScrapeJob>> {
        ScrapeJob::find_latest_completed(user_id, platform, &self.pool).await
    }

    async fn update_progress(&self, job_id: &str, status: JobStatus, progress: i32) -> Result<()> {
        ScrapeJob::update_progress(job_id, status, progress, &self.pool).await
    }

    async fn upsert_results(&self, job: &ScrapeJob) -> Result<()> {
        job.upsert_results(&self.pool).await
    }
}

// =============================================================================
// PostgresStoreConfigStore (implements BaseStoreConfigStore)
// =============================================================================

/// Config store backed by the `store_configs` table
pub struct PostgresStoreConfigStore {
    pool: PgPool,
}

impl PostgresStoreConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseStoreConfigStore for PostgresStoreConfigStore {
    async fn find_for_user(&self, user_id: &str) -> Result<Option<StoreConfig>> {
        StoreConfig::find_by_user(user_id, &self.pool).await
    }

    async fn save(&self, config: &StoreConfig) -> Result<()> {
        config.upsert(&self.pool).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every request (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub brightdata: Arc<ScrapeClient>,
    pub job_store: Arc<dyn BaseScrapeJobStore>,
    pub store_configs: Arc<dyn BaseStoreConfigStore>,
}

impl ServerDeps {
    pub fn new(
        brightdata: ScrapeClient,
        job_store: Arc<dyn BaseScrapeJobStore>,
        store_configs: Arc<dyn BaseStoreConfigStore>,
    ) -> Self {
        Self {
            brightdata: Arc::new(brightdata),
            job_store,
            store_configs,
        }
    }

    /// Production wiring: HTTP transport from config, Postgres-backed stores.
    pub fn from_config(config: &Config, pool: PgPool) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::with_base_url(
            config.brightdata_api_token.clone(),
            config.brightdata_base_url.clone(),
        ));
        let client = BrightDataClient::with_transport(transport).with_settings(config.client_settings());

        Self::new(
            client,
            Arc::new(PostgresScrapeJobStore::new(pool.clone())),
            Arc::new(PostgresStoreConfigStore::new(pool)),
        )
    }
}
