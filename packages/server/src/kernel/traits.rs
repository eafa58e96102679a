// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompts, parsing and sanitation live in the suppliers domain and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseKnowledgeProvider)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Knowledge Provider Trait (search-grounded LLM)
// =============================================================================

#[async_trait]
pub trait BaseKnowledgeProvider: Send + Sync {
    /// Ask a question with a system instruction (returns raw text answer)
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// =============================================================================
// Domain Registry Trait (RDAP / WHOIS style lookups)
// =============================================================================

/// What the registry knows about a registered domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRegistration {
    pub domain: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait BaseRegistryLookup: Send + Sync {
    /// Look up a bare domain. `Ok(None)` means the registry has no record.
    async fn lookup(&self, domain: &str) -> Result<Option<DomainRegistration>>;
}
