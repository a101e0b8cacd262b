//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_scrape_job, get_scrape_job, get_scrape_job_results, get_store_config,
    get_store_display, health_handler, list_scrape_jobs, put_store_config, scrape_store,
};

/// Headroom on top of the provider budget before a request is abandoned
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(30);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Longest a single request may legitimately take: a trigger, a full wait and
/// a snapshot download.
fn request_timeout(deps: &ServerDeps) -> Duration {
    let settings = deps.brightdata.settings();
    settings.trigger_timeout
        + settings.polling.max_wait
        + settings.status_timeout
        + settings.results_timeout
        + REQUEST_TIMEOUT_SLACK
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let timeout = request_timeout(&deps);
    let state = AppState {
        deps: Arc::new(deps),
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/scrape-jobs",
            post(create_scrape_job).get(list_scrape_jobs),
        )
        .route("/api/scrape-jobs/:job_id", get(get_scrape_job))
        .route("/api/scrape-jobs/:job_id/results", get(get_scrape_job_results))
        .route(
            "/api/store/config",
            get(get_store_config).put(put_store_config),
        )
        .route("/api/store/scrape", post(scrape_store))
        .route("/api/display/:user_id", get(get_store_display))
        .layer(Extension(state));

    with_http_layers(router, timeout)
}

/// Request timeout (answered with 408) and HTTP tracing.
fn with_http_layers(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
