//! RDAP registry lookups (the JSON successor of WHOIS).
//!
//! `GET {base}/domain/{domain}` answers 200 with a domain object for
//! registered names and 404 for unknown ones. The public bootstrap service
//! at rdap.org redirects to the authoritative registry per TLD.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{BaseRegistryLookup, DomainRegistration};

pub struct RdapRegistry {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl RdapRegistry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(rename = "ldhName")]
    ldh_name: Option<String>,
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: Option<DateTime<Utc>>,
}

impl RdapDomain {
    fn event(&self, action: &str) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .find(|e| e.action == action)
            .and_then(|e| e.date)
    }

    fn into_registration(self, queried: &str) -> Option<DomainRegistration> {
        let registered_at = self.event("registration");
        let expires_at = self.event("expiration");
        let domain = self.ldh_name?.trim_end_matches('.').to_lowercase();
        if domain.is_empty() {
            return None;
        }
        debug!(queried, domain = %domain, "RDAP record found");
        Some(DomainRegistration {
            domain,
            registered_at,
            expires_at,
        })
    }
}

#[async_trait]
impl BaseRegistryLookup for RdapRegistry {
    async fn lookup(&self, domain: &str) -> Result<Option<DomainRegistration>> {
        let response = self
            .http_client
            .get(format!("{}/domain/{}", self.base_url, domain))
            .header("Accept", "application/rdap+json")
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("RDAP request failed for {}", domain))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let record: RdapDomain = response
                    .json()
                    .await
                    .with_context(|| format!("Invalid RDAP response for {}", domain))?;
                Ok(record.into_registration(domain))
            }
            status => Err(anyhow::anyhow!(
                "RDAP lookup for {} returned {}",
                domain,
                status
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_registration_events() {
        let record: RdapDomain = serde_json::from_str(
            r#"{
                "objectClassName": "domain",
                "ldhName": "EXAMPLE.COM",
                "events": [
                    {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
                    {"eventAction": "expiration", "eventDate": "2030-08-13T04:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let registration = record.into_registration("example.com").unwrap();
        assert_eq!(registration.domain, "example.com");
        assert!(registration.registered_at.is_some());
        assert!(registration.expires_at.unwrap() > registration.registered_at.unwrap());
    }

    #[test]
    fn test_missing_ldh_name_is_not_a_registration() {
        let record: RdapDomain = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(record.into_registration("example.com").is_none());
    }
}
