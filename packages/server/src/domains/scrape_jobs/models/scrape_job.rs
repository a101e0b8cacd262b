use anyhow::Result;
use brightdata_client::{JobOutcome, JobProgress, JobStatus, NormalizedRecord, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A scrape job triggered on behalf of a storefront owner.
///
/// `job_id` is the provider's snapshot id. Status moves forward only: once a
/// job leaves `running` it never returns, and terminal statuses are final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapeJob {
    pub id: Uuid,
    pub user_id: String,
    pub job_id: String,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub url: String,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub progress: i32,
    pub results: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    /// A freshly triggered job.
    pub fn running(user_id: &str, job_id: &str, platform: Platform, url: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            job_id: job_id.to_string(),
            platform,
            url: url.to_string(),
            status: JobStatus::Running,
            progress: 0,
            results: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Move to `next` if the lifecycle allows it. Returns whether anything changed.
    pub fn transition(&mut self, next: JobStatus) -> bool {
        if self.status == next || !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        true
    }

    /// Apply a provider progress report. Unknown statuses only update progress.
    pub fn apply_progress(&mut self, report: &JobProgress) -> bool {
        let mut changed = false;

        if let Some(next) = report.status.job_status() {
            changed |= self.transition(next);
        }

        if self.status == JobStatus::Running || self.status == JobStatus::Ready {
            let progress = report.progress.min(100) as i32;
            if progress > self.progress {
                self.progress = progress;
                changed = true;
            }
        }

        changed
    }

    /// Record normalized results and complete the job.
    pub fn complete(&mut self, record: &NormalizedRecord) -> Result<bool> {
        if !self.transition(JobStatus::Completed) && self.status != JobStatus::Completed {
            return Ok(false);
        }
        self.progress = 100;
        self.results = Some(serde_json::to_value(record)?);
        self.completed_at.get_or_insert_with(Utc::now);
        Ok(true)
    }

    /// Move to `next`, stamping `completed_at` when it is terminal.
    pub fn settle(&mut self, next: JobStatus) -> bool {
        let changed = self.transition(next);
        if changed && next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        changed
    }

    /// Apply a non-completed fetch or wait outcome (not_found, error, timeout, ...).
    pub fn apply_outcome(&mut self, outcome: &JobOutcome) -> bool {
        match outcome.job_status() {
            Some(JobStatus::Completed) | None => false,
            Some(next) => self.settle(next),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl ScrapeJob {
    const COLUMNS: &'static str = "id, user_id, job_id, platform, url, status, progress, \
         results, created_at, completed_at";

    pub async fn insert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO scrape_jobs (id, user_id, job_id, platform, url, status, progress, results, created_at, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(self.id)
        .bind(&self.user_id)
        .bind(&self.job_id)
        .bind(self.platform.as_str())
        .bind(&self.url)
        .bind(self.status.as_str())
        .bind(self.progress)
        .bind(&self.results)
        .bind(self.created_at)
        .bind(self.completed_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Persist a status change. Terminal statuses stamp `completed_at` once.
    pub async fn update_progress(
        job_id: &str,
        status: JobStatus,
        progress: i32,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE scrape_jobs
             SET status = $2,
                 progress = $3,
                 completed_at = CASE WHEN $4 THEN COALESCE(completed_at, NOW()) ELSE completed_at END
             WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(status.as_str())
        .bind(progress)
        .bind(status.is_terminal())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert a completed job, or complete the existing row with the same `job_id`.
    pub async fn upsert_results(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO scrape_jobs (id, user_id, job_id, platform, url, status, progress, results, created_at, completed_at)
             VALUES ($1, $2, $3, $4, $5, 'completed', 100, $6, $7, COALESCE($8, NOW()))
             ON CONFLICT (job_id) DO UPDATE
             SET status = 'completed',
                 progress = 100,
                 results = EXCLUDED.results,
                 completed_at = COALESCE(scrape_jobs.completed_at, EXCLUDED.completed_at)",
        )
        .bind(self.id)
        .bind(&self.user_id)
        .bind(&self.job_id)
        .bind(self.platform.as_str())
        .bind(&self.url)
        .bind(&self.results)
        .bind(self.created_at)
        .bind(self.completed_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_job_id(job_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let q = format!("SELECT {} FROM scrape_jobs WHERE job_id = $1", Self::COLUMNS);
        sqlx::query_as::<_, Self>(&q)
            .bind(job_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest completed job of `user_id` on `platform`.
    pub async fn find_latest_completed(
        user_id: &str,
        platform: Platform,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let q = format!(
            "SELECT {} FROM scrape_jobs
             WHERE user_id = $1 AND platform = $2 AND status = 'completed'
             ORDER BY completed_at DESC NULLS LAST
             LIMIT 1",
            Self::COLUMNS
        );
        sqlx::query_as::<_, Self>(&q)
            .bind(user_id)
            .bind(platform.as_str())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_user(user_id: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let q = format!(
            "SELECT {} FROM scrape_jobs WHERE user_id = $1 ORDER BY created_at DESC",
            Self::COLUMNS
        );
        sqlx::query_as::<_, Self>(&q)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
