//! Postgres-backed test context.
//!
//! Every test binary starts one Postgres container on first use, migrates it
//! and then hands each test its own pool. Tests never truncate: they stay
//! apart by working on rows they created themselves (fresh ids, random
//! request numbers, fresh users).

use std::sync::Arc;

use anyhow::{Context, Result};
use sourcing_core::config::DiscoverySettings;
use sourcing_core::kernel::{
    BaseKnowledgeProvider, BaseRegistryLookup, MockKnowledgeProvider, MockRegistryLookup,
    ServerDeps,
};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Container handle plus the URL it is reachable on
struct Database {
    url: String,
    _container: ContainerAsync<Postgres>,
}

static DATABASE: OnceCell<Database> = OnceCell::const_new();

async fn start_database() -> Result<Database> {
    // RUST_LOG=sourcing_core=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let container = Postgres::default()
        .with_tag("16")
        .with_cmd(["-c", "max_connections=200"])
        .start()
        .await
        .context("Failed to start Postgres container")?;

    let url = format!(
        "postgresql://postgres:postgres@{}:{}/postgres",
        container.get_host().await?,
        container.get_host_port_ipv4(5432).await?
    );

    let pool = PgPool::connect(&url)
        .await
        .context("Failed to connect to Postgres for migrations")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    pool.close().await;

    Ok(Database {
        url,
        _container: container,
    })
}

async fn database_url() -> &'static str {
    let database = DATABASE
        .get_or_init(|| async {
            start_database()
                .await
                .expect("Failed to start the shared test database")
        })
        .await;
    &database.url
}

/// Per-test context.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn discovers(ctx: &TestHarness) {
///     let deps = ctx.deps(MockKnowledgeProvider::new(), MockRegistryLookup::new());
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        let url = database_url().await;
        let db_pool = PgPool::connect(url)
            .await
            .expect("Failed to connect to test database");
        Self { db_pool }
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    /// `ServerDeps` over the test database with default discovery settings
    pub fn deps(
        &self,
        knowledge: MockKnowledgeProvider,
        registry: MockRegistryLookup,
    ) -> ServerDeps {
        self.deps_with_settings(knowledge, registry, DiscoverySettings::default())
    }

    pub fn deps_with_settings(
        &self,
        knowledge: MockKnowledgeProvider,
        registry: MockRegistryLookup,
        settings: DiscoverySettings,
    ) -> ServerDeps {
        let knowledge: Arc<dyn BaseKnowledgeProvider> = Arc::new(knowledge);
        let registry: Arc<dyn BaseRegistryLookup> = Arc::new(registry);
        ServerDeps::new(self.db_pool.clone(), knowledge, registry, settings)
    }
}
