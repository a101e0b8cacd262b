use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::platform::Platform;

/// Extra per-URL fields merged verbatim into each trigger entry.
pub type TriggerParams = Map<String, Value>;

// ============================================================================
// Job lifecycle
// ============================================================================

/// Lifecycle of a scrape job as tracked locally.
///
/// `Ready` and `NotFound` are waypoints: the first means the snapshot can be
/// fetched, the second that a fetch found nothing yet and may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Running,
    Ready,
    Failed,
    Error,
    NotFound,
    Timeout,
    Completed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Ready => "ready",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::NotFound => "not_found",
            JobStatus::Timeout => "timeout",
            JobStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Error | JobStatus::Timeout | JobStatus::Completed
        )
    }

    /// Whether a job in `self` may move to `next`.
    ///
    /// Re-recording the current status is always allowed. Nothing re-enters
    /// `Running` and terminal statuses are final.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        if next == JobStatus::Running || self.is_terminal() {
            return false;
        }
        true
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not a [`JobStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status: {0}")]
pub struct UnknownJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(JobStatus::Running),
            "ready" => Ok(JobStatus::Ready),
            "failed" => Ok(JobStatus::Failed),
            "error" => Ok(JobStatus::Error),
            "not_found" => Ok(JobStatus::NotFound),
            "timeout" => Ok(JobStatus::Timeout),
            "completed" => Ok(JobStatus::Completed),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = UnknownJobStatus;

    fn try_from(value: String) -> Result<Self, UnknownJobStatus> {
        value.parse()
    }
}

/// Status string reported by the progress endpoint.
///
/// Only `ready` means the snapshot can be fetched. Anything unrecognised is kept
/// verbatim in `Unknown` and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProgressStatus {
    Running,
    Ready,
    Failed,
    Error,
    Unknown(String),
}

impl ProgressStatus {
    pub fn unknown() -> Self {
        ProgressStatus::Unknown("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProgressStatus::Running => "running",
            ProgressStatus::Ready => "ready",
            ProgressStatus::Failed => "failed",
            ProgressStatus::Error => "error",
            ProgressStatus::Unknown(raw) => raw,
        }
    }

    /// Local job status implied by this report, if any.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            ProgressStatus::Running => Some(JobStatus::Running),
            ProgressStatus::Ready => Some(JobStatus::Ready),
            ProgressStatus::Failed => Some(JobStatus::Failed),
            ProgressStatus::Error => Some(JobStatus::Error),
            ProgressStatus::Unknown(_) => None,
        }
    }
}

impl From<String> for ProgressStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => ProgressStatus::Running,
            "ready" => ProgressStatus::Ready,
            "failed" => ProgressStatus::Failed,
            "error" => ProgressStatus::Error,
            _ => ProgressStatus::Unknown(value),
        }
    }
}

impl From<ProgressStatus> for String {
    fn from(value: ProgressStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Operation results
// ============================================================================

/// Returned by a successful trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredJob {
    pub job_id: String,
    pub status: JobStatus,
    pub platform: Platform,
    pub urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One progress check. Failures are reported with `status: error` and a message
/// rather than as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub job_id: String,
    pub status: ProgressStatus,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobProgress {
    pub fn error(job_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: ProgressStatus::Error,
            progress: 0,
            total_records: 0,
            error: Some(error.into()),
        }
    }
}

/// Result of fetching a snapshot or waiting for one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Raw snapshot payload, not yet normalized
    Completed { job_id: String, data: Value },
    /// Provider reported the job as failed
    Failed { job_id: String, error: String },
    /// Snapshot not available (not ready yet or expired); retryable
    NotFound { job_id: String, error: String },
    Error { job_id: String, error: String },
    /// Local wait budget exhausted
    Timeout { job_id: String, error: String },
    /// Wait abandoned through its cancellation token
    Cancelled { job_id: String },
}

impl JobOutcome {
    /// Local job status this outcome implies. A cancelled wait says nothing
    /// about the remote job.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            JobOutcome::Completed { .. } => Some(JobStatus::Completed),
            JobOutcome::Failed { .. } => Some(JobStatus::Failed),
            JobOutcome::NotFound { .. } => Some(JobStatus::NotFound),
            JobOutcome::Error { .. } => Some(JobStatus::Error),
            JobOutcome::Timeout { .. } => Some(JobStatus::Timeout),
            JobOutcome::Cancelled { .. } => None,
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Wait-for-completion budget. The interval is fixed for the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(300),
            poll_interval: Duration::from_secs(10),
        }
    }
}

impl PollSettings {
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval,
        }
    }
}

/// Per-call HTTP timeouts plus the default polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub trigger_timeout: Duration,
    pub status_timeout: Duration,
    /// Snapshots can be large, so this is longer than the other two
    pub results_timeout: Duration,
    pub polling: PollSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            trigger_timeout: Duration::from_secs(30),
            status_timeout: Duration::from_secs(30),
            results_timeout: Duration::from_secs(60),
            polling: PollSettings::default(),
        }
    }
}
