//! `/api/scrape-jobs` handlers.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use brightdata_client::{FetchOutcome, FetchRequest, Platform};

use crate::domains::scrape_jobs::activities::{
    collect_job_results, refresh_job_status, start_scrape_job, JobRefresh,
};
use crate::domains::scrape_jobs::ScrapeJobData;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

/// HTTP status for an orchestrator outcome.
pub fn outcome_status(outcome: &FetchOutcome) -> StatusCode {
    match outcome {
        FetchOutcome::JobCreated { .. } => StatusCode::ACCEPTED,
        FetchOutcome::Success { .. }
        | FetchOutcome::Failed { .. }
        | FetchOutcome::Cancelled { .. } => StatusCode::OK,
        FetchOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        FetchOutcome::Error { .. } => StatusCode::BAD_GATEWAY,
        FetchOutcome::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// POST /api/scrape-jobs
pub async fn create_scrape_job(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(request): Json<FetchRequest>,
) -> Result<(StatusCode, Json<FetchOutcome>), ApiError> {
    request
        .platform
        .parse::<Platform>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if request.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }

    let outcome = start_scrape_job(&user.user_id, &request, &state.deps).await?;
    Ok((outcome_status(&outcome), Json(outcome)))
}

/// GET /api/scrape-jobs
pub async fn list_scrape_jobs(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ScrapeJobData>>, ApiError> {
    let jobs = state.deps.job_store.list_for_user(&user.user_id).await?;
    Ok(Json(jobs.into_iter().map(ScrapeJobData::from).collect()))
}

/// GET /api/scrape-jobs/:job_id
pub async fn get_scrape_job(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<JobRefresh>, ApiError> {
    let refresh = refresh_job_status(&user.user_id, &job_id, &state.deps).await?;
    refresh
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Scrape job {}", job_id)))
}

/// GET /api/scrape-jobs/:job_id/results
pub async fn get_scrape_job_results(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<(StatusCode, Json<FetchOutcome>), ApiError> {
    let collected = collect_job_results(&user.user_id, &job_id, &state.deps).await?;
    let outcome =
        collected.ok_or_else(|| ApiError::NotFound(format!("Scrape job {}", job_id)))?;
    Ok((outcome_status(&outcome), Json(outcome)))
}
