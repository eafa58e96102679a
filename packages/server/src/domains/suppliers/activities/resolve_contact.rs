//! Contact address lookup for a single company.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domains::suppliers::parsing::sanitize_address;
use crate::kernel::BaseKnowledgeProvider;

const CONTACT_SYSTEM_PROMPT: &str = "You find working email addresses for commercial \
enquiries. Reply with the address only (for example sales@company.com) or with an empty \
string. No quotes, comments, explanations or extra text.";

/// Local parts tried first, in order
pub const PREFERRED_MAILBOXES: &[&str] = &[
    "sales",
    "orders",
    "wholesale",
    "info",
    "contact",
    "procurement",
];

pub fn contact_prompt(company_name: &str, website: &str, region: &str) -> String {
    let priority = PREFERRED_MAILBOXES
        .iter()
        .map(|m| format!("{m}@"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Find the email address of the sales, purchasing or wholesale department of \
         {company_name} (website: {website}) in the region {region}. Priority: {priority} or \
         the local-language equivalent. Return ONLY the email address. If none is found, \
         return an empty string."
    )
}

/// Ask the provider for one contact address.
///
/// Returns an empty string when nothing usable comes back. Provider errors
/// and timeouts are logged, not returned. A cancelled lookup also yields an
/// empty string without waiting for the provider.
pub async fn resolve_contact_address(
    company_name: &str,
    website: &str,
    region: &str,
    provider: &dyn BaseKnowledgeProvider,
    timeout: Duration,
    cancel: &CancellationToken,
) -> String {
    let prompt = contact_prompt(company_name, website, region);

    let answer = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(company = company_name, "Contact lookup cancelled");
            return String::new();
        }
        answer = tokio::time::timeout(timeout, provider.ask(CONTACT_SYSTEM_PROMPT, &prompt)) => answer,
    };

    let raw = match answer {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(company = company_name, website, error = %e, "Contact lookup failed");
            return String::new();
        }
        Err(_) => {
            warn!(company = company_name, website, "Contact lookup timed out");
            return String::new();
        }
    };

    let address = sanitize_address(&raw);
    debug!(
        company = company_name,
        found = !address.is_empty(),
        "Contact lookup finished"
    );
    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockKnowledgeProvider;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_returns_sanitized_address() {
        let provider = MockKnowledgeProvider::new()
            .answer_when("Acme", "The sales team can be reached at \"sales@acme.com\".");

        let address = resolve_contact_address(
            "Acme",
            "acme.com",
            "Europe",
            &provider,
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(address, "sales@acme.com");
    }

    #[tokio::test]
    async fn test_non_conforming_answer_yields_empty() {
        let provider =
            MockKnowledgeProvider::new().answer_when("Acme", "No public email address found.");

        let address = resolve_contact_address(
            "Acme",
            "acme.com",
            "Europe",
            &provider,
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(address, "");
    }

    #[tokio::test]
    async fn test_provider_error_yields_empty() {
        let provider = MockKnowledgeProvider::new().fail_when("Acme", "401 unauthorized");

        let address = resolve_contact_address(
            "Acme",
            "acme.com",
            "Europe",
            &provider,
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(address, "");
    }

    #[tokio::test]
    async fn test_timeout_yields_empty() {
        let provider = MockKnowledgeProvider::new().hang_when("Acme");

        let address = resolve_contact_address(
            "Acme",
            "acme.com",
            "Europe",
            &provider,
            Duration::from_millis(30),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(address, "");
    }

    #[tokio::test]
    async fn test_cancelled_lookup_returns_without_waiting() {
        let provider = MockKnowledgeProvider::new().hang_when("Acme");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let address = tokio::time::timeout(
            Duration::from_secs(2),
            resolve_contact_address("Acme", "acme.com", "Europe", &provider, TIMEOUT, &cancel),
        )
        .await
        .unwrap();
        assert_eq!(address, "");
    }

    #[test]
    fn test_prompt_lists_mailbox_priority() {
        let prompt = contact_prompt("Acme", "acme.com", "Asia");
        assert!(prompt.contains("sales@, orders@, wholesale@, info@, contact@, procurement@"));
        assert!(prompt.contains("acme.com"));
    }
}
