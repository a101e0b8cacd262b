use anyhow::Result;
use brightdata_client::{FetchOutcome, JobOutcome, JobStatus};

use crate::kernel::ServerDeps;

/// Download, normalize and store the results of one of `user_id`'s jobs.
///
/// Returns `None` when the job doesn't exist or belongs to someone else.
/// Completed jobs are answered from the store. `not_found`, including a reply
/// that carries a status object instead of records, keeps the job retryable;
/// other fetch failures are reported without touching the record.
pub async fn collect_job_results(
    user_id: &str,
    job_id: &str,
    deps: &ServerDeps,
) -> Result<Option<FetchOutcome>> {
    let Some(mut job) = deps.job_store.find_by_job_id(job_id).await? else {
        return Ok(None);
    };
    if !job.is_owned_by(user_id) {
        return Ok(None);
    }

    match (job.status, &job.results) {
        (JobStatus::Completed, Some(stored)) => {
            return Ok(Some(FetchOutcome::Success {
                platform: job.platform,
                data: job.platform.restore_record(stored),
                job_id: job.job_id.clone(),
            }));
        }
        (JobStatus::Failed, _) => {
            return Ok(Some(FetchOutcome::Failed {
                job_id: job.job_id.clone(),
                error: "Job failed".to_string(),
            }));
        }
        (JobStatus::Error, _) => {
            return Ok(Some(FetchOutcome::Error {
                job_id: Some(job.job_id.clone()),
                error: "Job errored".to_string(),
            }));
        }
        (JobStatus::Timeout, _) => {
            return Ok(Some(FetchOutcome::Timeout {
                job_id: job.job_id.clone(),
                error: "Job timed out before results were collected".to_string(),
            }));
        }
        _ => {}
    }

    let outcome = match deps.brightdata.fetch_results(job_id).await {
        // Anything but a record list is a status body, not a result
        JobOutcome::Completed { job_id, data } if !(data.is_array() || data.is_null()) => {
            tracing::warn!(job_id = %job_id, body = %data, "Snapshot payload is not a record list");
            JobOutcome::NotFound {
                job_id,
                error: "Snapshot is not ready yet".to_string(),
            }
        }
        outcome => outcome,
    };

    match &outcome {
        JobOutcome::Completed { data, .. } => {
            let record = job.platform.parse_payload(data);
            if job.complete(&record)? {
                deps.job_store.upsert_results(&job).await?;
                tracing::info!(
                    job_id = %job_id,
                    platform = %job.platform,
                    empty = record.is_empty_snapshot(),
                    "Stored scrape results"
                );
            }
        }
        JobOutcome::NotFound { .. } => {
            if job.apply_outcome(&outcome) {
                deps.job_store
                    .update_progress(job_id, job.status, job.progress)
                    .await?;
            }
        }
        other => {
            tracing::warn!(job_id = %job_id, outcome = ?other, "Result download failed");
        }
    }

    Ok(Some(FetchOutcome::from_job_outcome(job.platform, outcome)))
}
