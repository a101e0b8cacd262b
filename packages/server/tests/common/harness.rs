//! Test harness driving the real router against in-memory dependencies.
//!
//! Each test gets a fresh job store and a scripted BrightData transport. The
//! transport handle is shared with the router, so scripting it after setup
//! affects the next request.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use brightdata_client::testing::MockTransport;
use serde_json::Value;
use std::sync::Arc;
use storefront_core::kernel::{MemoryScrapeJobStore, TestDependencies};
use storefront_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

pub const OWNER: &str = "owner-1";

pub struct TestHarness {
    pub app: Router,
    pub transport: MockTransport,
    pub job_store: Arc<MemoryScrapeJobStore>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> TestHarness {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::new();
        TestHarness {
            app: build_app(deps.server_deps()),
            transport: deps.transport.clone(),
            job_store: deps.job_store.clone(),
        }
    }

    async fn teardown(self) {}
}

impl TestHarness {
    /// Send a request as `user` (no header when `None`) and decode the JSON reply.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, user, None).await
    }

    pub async fn post(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, user, Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, user, Some(body)).await
    }
}
