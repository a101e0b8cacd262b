use anyhow::Result;
use brightdata_client::JobProgress;
use serde::Serialize;

use crate::domains::scrape_jobs::data::ScrapeJobData;
use crate::kernel::ServerDeps;

/// A job record together with the provider's latest report on it.
#[derive(Debug, Clone, Serialize)]
pub struct JobRefresh {
    pub job: ScrapeJobData,
    /// Absent when the job was already terminal and the provider wasn't asked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
}

/// Poll the provider for one of `user_id`'s jobs and persist what changed.
///
/// Returns `None` when the job doesn't exist or belongs to someone else. A
/// failed progress check is reported but leaves the stored job untouched.
pub async fn refresh_job_status(
    user_id: &str,
    job_id: &str,
    deps: &ServerDeps,
) -> Result<Option<JobRefresh>> {
    let Some(mut job) = deps.job_store.find_by_job_id(job_id).await? else {
        return Ok(None);
    };
    if !job.is_owned_by(user_id) {
        return Ok(None);
    }

    if job.status.is_terminal() {
        return Ok(Some(JobRefresh {
            job: job.into(),
            progress: None,
        }));
    }

    let report = deps.brightdata.poll_status(job_id).await;

    if let Some(error) = &report.error {
        tracing::warn!(job_id = %job_id, error = %error, "Progress check failed");
    } else if job.apply_progress(&report) {
        deps.job_store
            .update_progress(job_id, job.status, job.progress)
            .await?;
        tracing::debug!(
            job_id = %job_id,
            status = %job.status,
            progress = job.progress,
            "Scrape job progressed"
        );
    }

    Ok(Some(JobRefresh {
        job: job.into(),
        progress: Some(report),
    }))
}
