//! Test doubles for the BrightData client.
//!
//! [`MockTransport`] answers trigger, progress and snapshot calls from scripted
//! queues and records every request, so tests can assert on call counts without
//! a network.
//!
//! # Example
//!
//! ```rust
//! use brightdata_client::testing::{Endpoint, MockTransport};
//! use brightdata_client::BrightDataClient;
//!
//! # tokio_test_block(async {
//! let mock = MockTransport::new()
//!     .with_snapshot_id("s_123")
//!     .with_progress_statuses(&["running", "ready"]);
//! let client = BrightDataClient::with_transport(mock.clone());
//!
//! let progress = client.poll_status("s_123").await;
//! assert_eq!(progress.status.as_str(), "running");
//! assert_eq!(mock.calls_to(Endpoint::Progress), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{BrightDataError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Which dataset API endpoint a request path targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Trigger,
    Progress,
    Snapshot,
    Other,
}

impl Endpoint {
    pub fn of(path: &str) -> Self {
        if path.starts_with("/trigger") {
            Endpoint::Trigger
        } else if path.starts_with("/progress/") {
            Endpoint::Progress
        } else if path.starts_with("/snapshot/") {
            Endpoint::Snapshot
        } else {
            Endpoint::Other
        }
    }
}

type Scripted = Result<ApiResponse>;

#[derive(Default)]
struct MockState {
    trigger: VecDeque<Scripted>,
    progress: VecDeque<Scripted>,
    snapshot: VecDeque<Scripted>,
    requests: Vec<ApiRequest>,
}

impl MockState {
    fn queue(&mut self, endpoint: Endpoint) -> Option<&mut VecDeque<Scripted>> {
        match endpoint {
            Endpoint::Trigger => Some(&mut self.trigger),
            Endpoint::Progress => Some(&mut self.progress),
            Endpoint::Snapshot => Some(&mut self.snapshot),
            Endpoint::Other => None,
        }
    }
}

/// Scripted transport. Clones share state, so keep one handle for assertions
/// and give another to the client.
///
/// Each endpoint has a queue of responses consumed in order; the last entry
/// repeats forever. An endpoint with nothing scripted answers 500.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, endpoint: Endpoint, response: Scripted) -> Self {
        if let Some(queue) = self.state.lock().unwrap().queue(endpoint) {
            queue.push_back(response);
        }
        self
    }

    /// Successful trigger returning `snapshot_id`.
    pub fn with_snapshot_id(self, snapshot_id: &str) -> Self {
        let body = json!({ "snapshot_id": snapshot_id }).to_string();
        self.push(Endpoint::Trigger, Ok(ApiResponse::new(200, body)))
    }

    pub fn with_trigger_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Endpoint::Trigger, Ok(ApiResponse::new(status, body)))
    }

    /// Queue one progress report.
    pub fn with_progress(self, status: &str, progress: u32) -> Self {
        let body = json!({ "status": status, "progress": progress, "total_records": 0 }).to_string();
        self.push(Endpoint::Progress, Ok(ApiResponse::new(200, body)))
    }

    /// Queue progress reports in order; `ready` entries report 100%.
    pub fn with_progress_statuses(self, statuses: &[&str]) -> Self {
        statuses.iter().fold(self, |mock, status| {
            let progress = if *status == "ready" { 100 } else { 0 };
            mock.with_progress(status, progress)
        })
    }

    pub fn with_progress_response(self, response: ApiResponse) -> Self {
        self.push(Endpoint::Progress, Ok(response))
    }

    /// Successful snapshot download returning `data`.
    pub fn with_snapshot(self, data: Value) -> Self {
        self.push(Endpoint::Snapshot, Ok(ApiResponse::new(200, data.to_string())))
    }

    pub fn with_snapshot_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Endpoint::Snapshot, Ok(ApiResponse::new(status, body)))
    }

    /// Make `endpoint` fail at the transport level.
    pub fn with_failure(self, endpoint: Endpoint, message: &str) -> Self {
        self.push(endpoint, Err(BrightDataError::transport(message)))
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| Endpoint::of(&r.path) == endpoint)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let endpoint = Endpoint::of(&request.path);
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);

        let scripted = state.queue(endpoint).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        scripted.unwrap_or_else(|| Ok(ApiResponse::new(500, "no scripted response")))
    }
}
