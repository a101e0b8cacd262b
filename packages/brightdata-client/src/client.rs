//! BrightData dataset API client.
//!
//! Wraps the trigger, progress and snapshot endpoints and implements the
//! wait-for-completion polling loop. Holds no business logic.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{BrightDataError, Result};
use crate::platform::Platform;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use crate::types::{
    ClientSettings, JobOutcome, JobProgress, JobStatus, PollSettings, ProgressStatus,
    TriggerParams, TriggeredJob,
};

pub struct BrightDataClient<T = HttpTransport> {
    transport: T,
    settings: ClientSettings,
}

impl BrightDataClient<HttpTransport> {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(api_token))
    }
}

impl<T: Transport> BrightDataClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            settings: ClientSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Start a collection job for `urls` on `platform`.
    ///
    /// Unsupported platforms are rejected before anything is sent.
    pub async fn trigger(
        &self,
        platform: &str,
        urls: &[String],
        params: Option<&TriggerParams>,
    ) -> Result<TriggeredJob> {
        let platform: Platform = platform.parse()?;

        let entries: Vec<Value> = urls
            .iter()
            .map(|url| {
                let mut entry = Map::new();
                entry.insert("url".to_string(), Value::String(url.clone()));
                if let Some(params) = params {
                    for (key, value) in params {
                        entry.insert(key.clone(), value.clone());
                    }
                }
                Value::Object(entry)
            })
            .collect();

        let request = ApiRequest::post(
            "/trigger",
            Value::Array(entries),
            self.settings.trigger_timeout,
        )
        .with_query("dataset_id", platform.dataset_id());

        let response = self
            .transport
            .send(request)
            .await
            .and_then(ApiResponse::error_for_status)
            .inspect_err(|e| {
                tracing::warn!(platform = %platform, error = %e, "BrightData trigger failed");
            })?;

        let body = response.json()?;
        let job_id = body
            .get("snapshot_id")
            .and_then(Value::as_str)
            .ok_or_else(|| BrightDataError::invalid_response("trigger response has no snapshot_id"))?
            .to_string();

        tracing::info!(
            job_id = %job_id,
            platform = %platform,
            url_count = urls.len(),
            "BrightData scrape job triggered"
        );

        Ok(TriggeredJob {
            job_id,
            status: JobStatus::Running,
            platform,
            urls: urls.to_vec(),
            created_at: Utc::now(),
        })
    }

    /// Check progress of a job. Never fails: problems come back as `status: error`.
    pub async fn poll_status(&self, job_id: &str) -> JobProgress {
        let request = ApiRequest::get(format!("/progress/{}", job_id), self.settings.status_timeout);

        let body = match self
            .transport
            .send(request)
            .await
            .and_then(ApiResponse::error_for_status)
            .and_then(|response| response.json())
        {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(job_id, error = %e, "BrightData status check failed");
                return JobProgress::error(job_id, e.to_string());
            }
        };

        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(|s| ProgressStatus::from(s.to_string()))
            .unwrap_or_else(ProgressStatus::unknown);

        JobProgress {
            job_id: job_id.to_string(),
            status,
            progress: number(&body, "progress").min(100) as u32,
            total_records: number(&body, "total_records"),
            error: None,
        }
    }

    /// Download the raw snapshot of a job.
    ///
    /// A 404 or a 202 "still building" reply maps to [`JobOutcome::NotFound`]
    /// (not ready or expired, retry later);
    /// any other failure maps to [`JobOutcome::Error`].
    pub async fn fetch_results(&self, job_id: &str) -> JobOutcome {
        let request = ApiRequest::get(format!("/snapshot/{}", job_id), self.settings.results_timeout)
            .with_query("format", "json");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(job_id, error = %e, "BrightData snapshot fetch failed");
                return JobOutcome::Error {
                    job_id: job_id.to_string(),
                    error: e.to_string(),
                };
            }
        };

        if response.status == 404 {
            return JobOutcome::NotFound {
                job_id: job_id.to_string(),
                error: "Job not found or not yet completed".to_string(),
            };
        }

        // 202 carries a "still building" status object, not data
        if response.status == 202 {
            return JobOutcome::NotFound {
                job_id: job_id.to_string(),
                error: "Snapshot is not ready yet".to_string(),
            };
        }

        if !response.is_success() {
            tracing::warn!(job_id, status = response.status, "BrightData snapshot fetch rejected");
            return JobOutcome::Error {
                job_id: job_id.to_string(),
                error: format!("HTTP {}: {}", response.status, response.body),
            };
        }

        match response.json() {
            Ok(data) => JobOutcome::Completed {
                job_id: job_id.to_string(),
                data,
            },
            Err(e) => JobOutcome::Error {
                job_id: job_id.to_string(),
                error: e.to_string(),
            },
        }
    }

    /// Poll every `poll_interval` until the job is ready, fails, or `max_wait`
    /// elapses. A ready job is fetched exactly once.
    pub async fn await_completion(
        &self,
        job_id: &str,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> JobOutcome {
        self.await_completion_with_cancel(
            job_id,
            PollSettings::new(max_wait, poll_interval),
            &CancellationToken::new(),
        )
        .await
    }

    /// [`Self::await_completion`] with a cancellation token checked before every
    /// poll and raced against every sleep.
    ///
    /// A transport failure on any poll ends the wait with [`JobOutcome::Error`];
    /// it is not retried.
    pub async fn await_completion_with_cancel(
        &self,
        job_id: &str,
        settings: PollSettings,
        cancel: &CancellationToken,
    ) -> JobOutcome {
        let started = Instant::now();
        let mut polls: u32 = 0;

        while started.elapsed() < settings.max_wait {
            if cancel.is_cancelled() {
                return cancelled(job_id, polls);
            }

            let progress = self.poll_status(job_id).await;
            polls += 1;

            match progress.status {
                ProgressStatus::Ready => {
                    tracing::info!(
                        job_id,
                        polls,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "BrightData job ready, fetching snapshot"
                    );
                    return self.fetch_results(job_id).await;
                }
                ProgressStatus::Failed => {
                    return JobOutcome::Failed {
                        job_id: job_id.to_string(),
                        error: progress
                            .error
                            .unwrap_or_else(|| "Scrape job failed upstream".to_string()),
                    };
                }
                ProgressStatus::Error => {
                    return JobOutcome::Error {
                        job_id: job_id.to_string(),
                        error: progress
                            .error
                            .unwrap_or_else(|| "Scrape job reported an error".to_string()),
                    };
                }
                ProgressStatus::Running | ProgressStatus::Unknown(_) => {
                    tracing::debug!(
                        job_id,
                        status = %progress.status,
                        progress = progress.progress,
                        polls,
                        "BrightData job still in progress"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return cancelled(job_id, polls),
                _ = tokio::time::sleep(settings.poll_interval) => {}
            }
        }

        tracing::warn!(job_id, polls, max_wait_secs = settings.max_wait.as_secs(), "BrightData wait timed out");
        JobOutcome::Timeout {
            job_id: job_id.to_string(),
            error: format!(
                "Job did not complete within {} seconds",
                settings.max_wait.as_secs()
            ),
        }
    }
}

fn cancelled(job_id: &str, polls: u32) -> JobOutcome {
    tracing::info!(job_id, polls, "BrightData wait cancelled");
    JobOutcome::Cancelled {
        job_id: job_id.to_string(),
    }
}

/// Non-negative integer field, tolerating floats.
fn number(body: &Value, key: &str) -> u64 {
    body.get(key)
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        })
        .unwrap_or(0)
}
