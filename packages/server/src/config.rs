use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub knowledge_api_key: String,
    pub knowledge_base_url: String,
    pub knowledge_model: String,
    pub provider_timeout: Duration,
    pub registry_base_url: String,
    pub registry_timeout: Duration,
    pub discovery: DiscoverySettings,
    pub outreach_from_address: String,
    pub allowed_origins: Vec<String>,
}

/// Tuning for the discovery and validation fan-out.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Concurrent provider queries per discovery run
    pub discovery_concurrency: usize,
    /// Concurrent registry lookups per validation batch
    pub validation_concurrency: usize,
    /// Ask the provider for an address when a candidate came back without one
    pub resolve_missing_contacts: bool,
    /// Drop candidates whose domain is not registered
    pub validate_discovered_domains: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            discovery_concurrency: 4,
            validation_concurrency: 5,
            resolve_missing_contacts: false,
            validate_discovered_domains: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = DiscoverySettings::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8080)?,
            knowledge_api_key: env::var("KNOWLEDGE_API_KEY")
                .context("KNOWLEDGE_API_KEY must be set")?,
            knowledge_base_url: env::var("KNOWLEDGE_BASE_URL")
                .unwrap_or_else(|_| knowledge_client::PERPLEXITY_BASE_URL.to_string()),
            knowledge_model: env::var("KNOWLEDGE_MODEL").unwrap_or_else(|_| "sonar-pro".to_string()),
            provider_timeout: Duration::from_secs(parse_or("PROVIDER_TIMEOUT_SECS", 30)?),
            registry_base_url: env::var("REGISTRY_BASE_URL")
                .unwrap_or_else(|_| "https://rdap.org".to_string()),
            registry_timeout: Duration::from_secs(parse_or("REGISTRY_TIMEOUT_SECS", 5)?),
            discovery: DiscoverySettings {
                discovery_concurrency: parse_or(
                    "DISCOVERY_CONCURRENCY",
                    defaults.discovery_concurrency,
                )?
                .max(1),
                validation_concurrency: parse_or(
                    "VALIDATION_CONCURRENCY",
                    defaults.validation_concurrency,
                )?
                .max(1),
                resolve_missing_contacts: parse_or(
                    "RESOLVE_MISSING_CONTACTS",
                    defaults.resolve_missing_contacts,
                )?,
                validate_discovered_domains: parse_or(
                    "VALIDATE_DISCOVERED_DOMAINS",
                    defaults.validate_discovered_domains,
                )?,
            },
            outreach_from_address: env::var("OUTREACH_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@company.com".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value (got {:?})", key, raw)),
        Err(_) => Ok(default),
    }
}
