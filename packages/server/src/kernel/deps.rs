//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by every
//! domain activity. External services sit behind trait objects so tests can
//! swap in the doubles from `test_dependencies`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::DiscoverySettings;
use crate::kernel::{BaseKnowledgeProvider, BaseRegistryLookup};

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Search-grounded LLM used for discovery and contact resolution
    pub knowledge: Arc<dyn BaseKnowledgeProvider>,
    /// Domain registry used to drop unregistered websites
    pub registry: Arc<dyn BaseRegistryLookup>,
    pub settings: DiscoverySettings,
    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// Upper bound on a single registry lookup
    pub registry_timeout: Duration,
    /// Sender address on synthesized outreach messages
    pub outreach_from_address: String,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        knowledge: Arc<dyn BaseKnowledgeProvider>,
        registry: Arc<dyn BaseRegistryLookup>,
        settings: DiscoverySettings,
    ) -> Self {
        Self {
            db_pool,
            knowledge,
            registry,
            settings,
            provider_timeout: Duration::from_secs(30),
            registry_timeout: Duration::from_secs(5),
            outreach_from_address: "noreply@company.com".to_string(),
        }
    }

    pub fn with_timeouts(mut self, provider_timeout: Duration, registry_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self.registry_timeout = registry_timeout;
        self
    }

    pub fn with_outreach_from_address(mut self, address: impl Into<String>) -> Self {
        self.outreach_from_address = address.into();
        self
    }
}
