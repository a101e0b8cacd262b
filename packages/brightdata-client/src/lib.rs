//! BrightData dataset scrape-job client.
//!
//! Triggers collection jobs for social and maps pages, tracks them until the
//! snapshot is ready, and normalizes the per-platform records.
//!
//! # Example
//!
//! ```rust,ignore
//! use brightdata_client::{fetch_platform_data, BrightDataClient, FetchOutcome, FetchRequest};
//!
//! let client = BrightDataClient::new("your-api-token");
//!
//! let request = FetchRequest::new("instagram", "https://instagram.com/lookatme")
//!     .wait_for_results(true);
//! match fetch_platform_data(&client, &request).await {
//!     FetchOutcome::Success { data, .. } => println!("{:?}", data),
//!     other => println!("not ready: {:?}", other),
//! }
//! ```
//!
//! # Modules
//!
//! - [`client`] - trigger / progress / snapshot calls and the polling loop
//! - [`parsers`] - per-platform record normalization
//! - [`orchestrator`] - fire-and-forget or block-until-done fetch
//! - [`transport`] - HTTP seam
//! - [`testing`] - scripted transport for tests

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod parsers;
pub mod platform;
pub mod testing;
pub mod transport;
pub mod types;

pub use client::BrightDataClient;
pub use error::{BrightDataError, Result};
pub use orchestrator::{
    fetch_platform_data, fetch_platform_data_with_cancel, FetchOutcome, FetchRequest,
};
pub use parsers::{
    parse_facebook_data, parse_googlemaps_data, parse_instagram_data, FacebookStats,
    GoogleMapsStats, InstagramStats, NormalizedRecord, NO_DATA_RETURNED,
};
pub use platform::Platform;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, DEFAULT_BASE_URL};
pub use types::{
    ClientSettings, JobOutcome, JobProgress, JobStatus, PollSettings, ProgressStatus,
    TriggerParams, TriggeredJob, UnknownJobStatus,
};

// Re-exported so callers can cancel waits without a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
