// TestDependencies - in-memory implementations for tests and local development
//
// Pairs a scripted BrightData transport with in-memory stores so the
// activities and HTTP routes can run without Postgres or the network.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use brightdata_client::testing::MockTransport;
use brightdata_client::{BrightDataClient, ClientSettings, JobStatus, Platform, Transport};
use chrono::Utc;

use super::{BaseScrapeJobStore, BaseStoreConfigStore, ScrapeClient, ServerDeps};
use crate::domains::scrape_jobs::ScrapeJob;
use crate::domains::store_config::StoreConfig;

// =============================================================================
// Memory Scrape Job Store
// =============================================================================

/// Job store keyed by provider job id. Data is lost on restart.
#[derive(Default)]
pub struct MemoryScrapeJobStore {
    jobs: RwLock<HashMap<String, ScrapeJob>>,
}

impl MemoryScrapeJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs
    pub fn len(&self) -> usize {
        self.jobs.read().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, ScrapeJob>>> {
        self.jobs.read().map_err(|_| anyhow!("scrape job store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, ScrapeJob>>> {
        self.jobs.write().map_err(|_| anyhow!("scrape job store lock poisoned"))
    }
}

#[async_trait]
impl BaseScrapeJobStore for MemoryScrapeJobStore {
    async fn insert(&self, job: &ScrapeJob) -> Result<()> {
        let mut jobs = self.write()?;
        if jobs.contains_key(&job.job_id) {
            bail!("scrape job {} already exists", job.job_id);
        }
        jobs.insert(job.job_id.clone(), job.clone());
        Ok(())
    }

    async fn find_by_job_id(&self, job_id: &str) -> Result<Option<ScrapeJob>> {
        Ok(self.read()?.get(job_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScrapeJob>> {
        let mut jobs: Vec<ScrapeJob> = self
            .read()?
            .values()
            .filter(|job| job.is_owned_by(user_id))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn latest_completed(&self, user_id: &str, platform: Platform) -> Result<Option<ScrapeJob>> {
        Ok(self
            .read()?
            .values()
            .filter(|job| {
                job.is_owned_by(user_id)
                    && job.platform == platform
                    && job.status == JobStatus::Completed
            })
            .max_by_key(|job| job.completed_at)
            .cloned())
    }

    async fn update_progress(&self, job_id: &str, status: JobStatus, progress: i32) -> Result<()> {
        if let Some(job) = self.write()?.get_mut(job_id) {
            job.status = status;
            job.progress = progress;
            if status.is_terminal() && job.completed_at.is_none() {
                job.completed_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn upsert_results(&self, job: &ScrapeJob) -> Result<()> {
        let mut jobs = self.write()?;
        let entry = jobs.entry(job.job_id.clone()).or_insert_with(|| job.clone());
        entry.status = JobStatus::Completed;
        entry.progress = 100;
        entry.results = job.results.clone();
        entry.completed_at = entry.completed_at.or(job.completed_at).or_else(|| Some(Utc::now()));
        Ok(())
    }
}

// =============================================================================
// Memory Store Config Store
// =============================================================================

/// Store configurations keyed by owner
#[derive(Default)]
pub struct MemoryStoreConfigStore {
    configs: RwLock<HashMap<String, StoreConfig>>,
}

impl MemoryStoreConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseStoreConfigStore for MemoryStoreConfigStore {
    async fn find_for_user(&self, user_id: &str) -> Result<Option<StoreConfig>> {
        let configs = self
            .configs
            .read()
            .map_err(|_| anyhow!("store config lock poisoned"))?;
        Ok(configs.get(user_id).cloned())
    }

    async fn save(&self, config: &StoreConfig) -> Result<()> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| anyhow!("store config lock poisoned"))?;
        // The first saved row keeps its id, as the unique user_id conflict does
        let id = configs.get(&config.user_id).map_or(config.id, |c| c.id);
        configs.insert(config.user_id.clone(), StoreConfig { id, ..config.clone() });
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Scripted transport plus in-memory stores. Keep the handles for assertions.
pub struct TestDependencies {
    pub transport: MockTransport,
    pub job_store: Arc<MemoryScrapeJobStore>,
    pub store_configs: Arc<MemoryStoreConfigStore>,
    pub settings: ClientSettings,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            transport: MockTransport::new(),
            job_store: Arc::new(MemoryScrapeJobStore::new()),
            store_configs: Arc::new(MemoryStoreConfigStore::new()),
            settings: ClientSettings::default(),
        }
    }

    /// Set the scripted BrightData transport
    pub fn mock_transport(mut self, transport: MockTransport) -> Self {
        self.transport = transport;
        self
    }

    /// Override client timeouts and polling budget
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn client(&self) -> ScrapeClient {
        let transport: Arc<dyn Transport> = Arc::new(self.transport.clone());
        BrightDataClient::with_transport(transport).with_settings(self.settings)
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.client(),
            self.job_store.clone(),
            self.store_configs.clone(),
        )
    }
}
