// Trait definitions for dependency injection
//
// Infrastructure traits only. Lifecycle rules live on the domain model, the
// stores just persist what they are given.
//
// Naming convention: Base* for trait names (e.g., BaseScrapeJobStore)

use anyhow::Result;
use async_trait::async_trait;
use brightdata_client::{JobStatus, Platform};

use crate::domains::scrape_jobs::ScrapeJob;
use crate::domains::store_config::StoreConfig;

// =============================================================================
// Scrape Job Store Trait (Infrastructure - job record persistence)
// =============================================================================

#[async_trait]
pub trait BaseScrapeJobStore: Send + Sync {
    /// Record a newly triggered job
    async fn insert(&self, job: &ScrapeJob) -> Result<()>;

    /// Look up a job by the provider's snapshot id
    async fn find_by_job_id(&self, job_id: &str) -> Result<Option<ScrapeJob>>;

    /// All jobs started by `user_id`, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScrapeJob>>;

    /// Most recently completed job of `user_id` on `platform`
    async fn latest_completed(&self, user_id: &str, platform: Platform) -> Result<Option<ScrapeJob>>;

    /// Persist a status/progress change
    async fn update_progress(&self, job_id: &str, status: JobStatus, progress: i32) -> Result<()>;

    /// Insert or complete `job` with its normalized results
    async fn upsert_results(&self, job: &ScrapeJob) -> Result<()>;
}

// =============================================================================
// Store Config Store Trait (Infrastructure - storefront configuration)
// =============================================================================

#[async_trait]
pub trait BaseStoreConfigStore: Send + Sync {
    async fn find_for_user(&self, user_id: &str) -> Result<Option<StoreConfig>>;

    /// Insert or replace the owner's configuration
    async fn save(&self, config: &StoreConfig) -> Result<()>;
}
