use crate::domains::scrape_jobs::models::ScrapeJob;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJobData {
    pub id: String,
    pub job_id: String,
    pub platform: String,
    pub url: String,
    pub status: String,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<ScrapeJob> for ScrapeJobData {
    fn from(job: ScrapeJob) -> Self {
        Self {
            id: job.id.to_string(),
            job_id: job.job_id,
            platform: job.platform.to_string(),
            url: job.url,
            status: job.status.to_string(),
            progress: job.progress,
            results: job.results,
            created_at: job.created_at.to_rfc3339(),
            completed_at: job.completed_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
