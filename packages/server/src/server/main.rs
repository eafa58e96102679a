// Main entry point for the sourcing API server

use std::sync::Arc;

use anyhow::{Context, Result};
use knowledge_client::KnowledgeClient;
use sourcing_core::kernel::{KnowledgeAdapter, RdapRegistry, ServerDeps};
use sourcing_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sourcing_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting supplier sourcing API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.knowledge_model,
        registry = %config.registry_base_url,
        discovery_concurrency = config.discovery.discovery_concurrency,
        resolve_missing_contacts = config.discovery.resolve_missing_contacts,
        validate_discovered_domains = config.discovery.validate_discovered_domains,
        "Configuration loaded"
    );

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let knowledge_client = KnowledgeClient::new(config.knowledge_api_key.clone())
        .with_base_url(&config.knowledge_base_url)
        .with_timeout(config.provider_timeout);
    let knowledge = Arc::new(KnowledgeAdapter::new(
        knowledge_client,
        config.knowledge_model.clone(),
    ));
    let registry = Arc::new(RdapRegistry::new(
        config.registry_base_url.clone(),
        config.registry_timeout,
    ));

    let deps = ServerDeps::new(pool, knowledge, registry, config.discovery.clone())
        .with_timeouts(config.provider_timeout, config.registry_timeout)
        .with_outreach_from_address(config.outreach_from_address.clone());

    let app = build_app(deps, &config.allowed_origins);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
