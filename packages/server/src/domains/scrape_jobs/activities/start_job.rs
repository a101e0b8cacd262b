use anyhow::Result;
use brightdata_client::{fetch_platform_data, FetchOutcome, FetchRequest, Platform};

use crate::domains::scrape_jobs::models::ScrapeJob;
use crate::kernel::ServerDeps;

/// Trigger a scrape for `user_id` and record the job.
///
/// The orchestrator's outcome is returned unchanged. A created job is stored as
/// running, a finished one with its results. Trigger failures leave no record.
pub async fn start_scrape_job(
    user_id: &str,
    request: &FetchRequest,
    deps: &ServerDeps,
) -> Result<FetchOutcome> {
    let outcome = fetch_platform_data(deps.brightdata.as_ref(), request).await;

    let Some(job_id) = outcome.job_id() else {
        tracing::warn!(
            user_id = %user_id,
            platform = %request.platform,
            outcome = ?outcome,
            "Scrape job was not created"
        );
        return Ok(outcome);
    };

    let platform: Platform = request.platform.parse()?;
    let mut job = ScrapeJob::running(user_id, job_id, platform, &request.url);

    match &outcome {
        FetchOutcome::Success { data, .. } => {
            job.complete(data)?;
            deps.job_store.upsert_results(&job).await?;
        }
        other => {
            if let Some(status) = other.job_status() {
                job.settle(status);
            }
            deps.job_store.insert(&job).await?;
        }
    }

    tracing::info!(
        user_id = %user_id,
        job_id = %job.job_id,
        platform = %job.platform,
        status = %job.status,
        "Recorded scrape job"
    );

    Ok(outcome)
}
