//! High-level "fetch platform data for a URL".
//!
//! Composes trigger, wait and parse. In fire-and-forget mode the caller gets the
//! job id back immediately; otherwise the call blocks until the job reaches a
//! terminal state and returns the normalized record.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::BrightDataClient;
use crate::parsers::NormalizedRecord;
use crate::platform::Platform;
use crate::transport::Transport;
use crate::types::{JobOutcome, JobStatus, TriggerParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<TriggerParams>,
    #[serde(default)]
    pub wait_for_results: bool,
}

impl FetchRequest {
    pub fn new(platform: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
            params: None,
            wait_for_results: false,
        }
    }

    pub fn with_params(mut self, params: TriggerParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn wait_for_results(mut self, wait: bool) -> Self {
        self.wait_for_results = wait;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Fire-and-forget: job accepted, poll it later
    JobCreated { job_id: String, message: String },
    Success {
        platform: Platform,
        data: NormalizedRecord,
        job_id: String,
    },
    Failed { job_id: String, error: String },
    NotFound { job_id: String, error: String },
    /// Trigger failures carry no job id
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job_id: Option<String>,
        error: String,
    },
    Timeout { job_id: String, error: String },
    Cancelled { job_id: String },
}

impl FetchOutcome {
    pub fn job_id(&self) -> Option<&str> {
        match self {
            FetchOutcome::JobCreated { job_id, .. }
            | FetchOutcome::Success { job_id, .. }
            | FetchOutcome::Failed { job_id, .. }
            | FetchOutcome::NotFound { job_id, .. }
            | FetchOutcome::Timeout { job_id, .. }
            | FetchOutcome::Cancelled { job_id } => Some(job_id),
            FetchOutcome::Error { job_id, .. } => job_id.as_deref(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Job status this outcome leaves the job in. `None` when there is no job
    /// to speak of (trigger failure) or the wait was abandoned.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            FetchOutcome::JobCreated { .. } => Some(JobStatus::Running),
            FetchOutcome::Success { .. } => Some(JobStatus::Completed),
            FetchOutcome::Failed { .. } => Some(JobStatus::Failed),
            FetchOutcome::NotFound { .. } => Some(JobStatus::NotFound),
            FetchOutcome::Error { job_id, .. } => job_id.as_ref().map(|_| JobStatus::Error),
            FetchOutcome::Timeout { .. } => Some(JobStatus::Timeout),
            FetchOutcome::Cancelled { .. } => None,
        }
    }

    /// Wrap a fetch or wait result, parsing the payload when it completed.
    pub fn from_job_outcome(platform: Platform, outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Completed { job_id, data } => FetchOutcome::Success {
                platform,
                data: platform.parse_payload(&data),
                job_id,
            },
            JobOutcome::Failed { job_id, error } => FetchOutcome::Failed { job_id, error },
            JobOutcome::NotFound { job_id, error } => FetchOutcome::NotFound { job_id, error },
            JobOutcome::Error { job_id, error } => FetchOutcome::Error {
                job_id: Some(job_id),
                error,
            },
            JobOutcome::Timeout { job_id, error } => FetchOutcome::Timeout { job_id, error },
            JobOutcome::Cancelled { job_id } => FetchOutcome::Cancelled { job_id },
        }
    }
}

/// Trigger a scrape for `request.url` and optionally wait for its data.
///
/// Never returns an `Err`: trigger failures become [`FetchOutcome::Error`] and
/// every non-completed terminal state is passed through.
pub async fn fetch_platform_data<T: Transport>(
    client: &BrightDataClient<T>,
    request: &FetchRequest,
) -> FetchOutcome {
    fetch_platform_data_with_cancel(client, request, &CancellationToken::new()).await
}

pub async fn fetch_platform_data_with_cancel<T: Transport>(
    client: &BrightDataClient<T>,
    request: &FetchRequest,
    cancel: &CancellationToken,
) -> FetchOutcome {
    let triggered = match client
        .trigger(
            &request.platform,
            std::slice::from_ref(&request.url),
            request.params.as_ref(),
        )
        .await
    {
        Ok(job) => job,
        Err(e) => {
            return FetchOutcome::Error {
                job_id: None,
                error: e.to_string(),
            }
        }
    };

    if !request.wait_for_results {
        return FetchOutcome::JobCreated {
            message: format!(
                "Crawl job created for {}. Check status with job_id.",
                triggered.platform
            ),
            job_id: triggered.job_id,
        };
    }

    let outcome = client
        .await_completion_with_cancel(&triggered.job_id, client.settings().polling, cancel)
        .await;

    tracing::info!(
        job_id = %triggered.job_id,
        platform = %triggered.platform,
        status = ?outcome.job_status(),
        "BrightData fetch finished"
    );

    FetchOutcome::from_job_outcome(triggered.platform, outcome)
}
