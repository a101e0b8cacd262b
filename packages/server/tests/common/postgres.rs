//! Postgres harness with testcontainers for the SQL-backed stores.
//!
//! One container is shared across all tests and migrations run once. Tests
//! isolate themselves by using fresh job and user ids.

use anyhow::{Context, Result};
use sqlx::PgPool;
use storefront_core::kernel::{PostgresScrapeJobStore, PostgresStoreConfigStore};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared test infrastructure that persists across all tests.
struct SharedPostgres {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

pub struct PostgresHarness {
    /// Database pool - use this for fixtures and raw assertions.
    pub db_pool: PgPool,
    pub store: PostgresScrapeJobStore,
    pub configs: PostgresStoreConfigStore,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> PostgresHarness {
        let infra = SharedPostgres::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");

        PostgresHarness {
            store: PostgresScrapeJobStore::new(db_pool.clone()),
            configs: PostgresStoreConfigStore::new(db_pool.clone()),
            db_pool,
        }
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

/// An id no other test uses.
pub fn unique_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
