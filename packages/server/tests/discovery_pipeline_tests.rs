//! Integration tests for the discovery pipeline (provider doubles + real
//! database).

mod common;

use std::time::Duration;

use crate::common::{
    candidate, create_test_article, provider_answer, seed_suppliers, test_user, TestHarness,
};
use sourcing_core::common::{ArticleId, SourcingError};
use sourcing_core::config::DiscoverySettings;
use sourcing_core::domains::suppliers::activities::{discover_for_article, get_suppliers};
use sourcing_core::kernel::{MockKnowledgeProvider, MockRegistryLookup};
use test_context::test_context;
use tokio_util::sync::CancellationToken;

#[test_context(TestHarness)]
#[tokio::test]
async fn rerun_replaces_previous_candidates(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-214", None).await.unwrap();
    let user = test_user();

    let first = ctx.deps(
        MockKnowledgeProvider::new().answer_when(
            "region Europe",
            &provider_answer(&[("Old Dealer", "olddealer.de", "info@olddealer.de")]),
        ),
        MockRegistryLookup::new(),
    );
    discover_for_article(article_id, Some(user), &first, &CancellationToken::new())
        .await
        .unwrap();

    let second = ctx.deps(
        MockKnowledgeProvider::new().answer_when(
            "region Asia",
            &provider_answer(&[("New Dealer", "newdealer.jp", "")]),
        ),
        MockRegistryLookup::new(),
    );
    let stored = discover_for_article(article_id, Some(user), &second, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "New Dealer");
    assert_eq!(stored[0].user_id, Some(user));

    let persisted = get_suppliers(article_id, pool).await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].website, "newdealer.jp");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failing_region_still_persists_the_rest(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-215", None).await.unwrap();

    let deps = ctx.deps(
        MockKnowledgeProvider::new()
            .answer_when("region Europe", &provider_answer(&[("Eu", "eu-parts.de", "")]))
            .answer_when(
                "region North America",
                &provider_answer(&[("Na", "na-parts.com", "")]),
            )
            .answer_when(
                "region South America",
                &provider_answer(&[("Sa", "sa-parts.com.br", "")]),
            )
            .fail_when("region Russia/CIS", "provider exploded")
            .answer_when(
                "region Asia",
                &provider_answer(&[("As", "as-parts.jp", ""), ("Eu dup", "EU-PARTS.de", "")]),
            ),
        MockRegistryLookup::new(),
    );

    let stored = discover_for_article(article_id, None, &deps, &CancellationToken::new())
        .await
        .unwrap();

    let names: Vec<&str> = stored.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), 4);
    assert!(!names.contains(&"Eu dup"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_run_still_replaces(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-216", None).await.unwrap();
    seed_suppliers(pool, article_id, &[candidate("Old", "old.com", "")])
        .await
        .unwrap();

    let deps = ctx.deps(
        MockKnowledgeProvider::new().fail_when("part number", "down"),
        MockRegistryLookup::new(),
    );
    let stored = discover_for_article(article_id, None, &deps, &CancellationToken::new())
        .await
        .unwrap();

    assert!(stored.is_empty());
    assert!(get_suppliers(article_id, pool).await.unwrap().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancelled_run_keeps_previous_candidates(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-217", None).await.unwrap();
    seed_suppliers(pool, article_id, &[candidate("Keep", "keep.com", "")])
        .await
        .unwrap();

    let deps = ctx
        .deps(
            MockKnowledgeProvider::new().hang_when("part number"),
            MockRegistryLookup::new(),
        )
        .with_timeouts(Duration::from_secs(600), Duration::from_secs(5));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = discover_for_article(article_id, None, &deps, &cancel).await;

    assert!(matches!(result, Err(SourcingError::Cancelled)));
    let stored = get_suppliers(article_id, pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].website, "keep.com");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancelled_contact_stage_keeps_previous_candidates(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-219", None).await.unwrap();
    seed_suppliers(pool, article_id, &[candidate("Keep", "keep.com", "")])
        .await
        .unwrap();

    let knowledge = MockKnowledgeProvider::new()
        .hang_when("department of")
        .answer_when(
            "region Europe",
            &provider_answer(&[("Quiet Parts", "quietparts.de", "")]),
        );
    let settings = DiscoverySettings {
        resolve_missing_contacts: true,
        ..DiscoverySettings::default()
    };
    let deps = ctx
        .deps_with_settings(knowledge, MockRegistryLookup::new(), settings)
        .with_timeouts(Duration::from_secs(600), Duration::from_secs(5));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        discover_for_article(article_id, None, &deps, &cancel),
    )
    .await
    .expect("cancellation should interrupt the contact lookup");

    assert!(matches!(result, Err(SourcingError::Cancelled)));
    let stored = get_suppliers(article_id, pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].website, "keep.com");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn optional_stages_resolve_and_validate(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article_id = create_test_article(pool, "6ES7-218", None).await.unwrap();

    let knowledge = MockKnowledgeProvider::new()
        // contact prompts mention the company; put them first so they win
        .answer_when("of Quiet Parts", "orders@quietparts.de")
        .answer_when(
            "region Europe",
            &provider_answer(&[
                ("Loud Parts", "https://loudparts.de", "sales@loudparts.de"),
                ("Quiet Parts", "https://www.quietparts.de/shop", ""),
                ("Ghost Parts", "https://ghostparts.biz", "x@ghostparts.biz"),
            ]),
        );
    let registry = MockRegistryLookup::new()
        .with_registered("loudparts.de")
        .with_registered("quietparts.de");
    let settings = DiscoverySettings {
        resolve_missing_contacts: true,
        validate_discovered_domains: true,
        ..DiscoverySettings::default()
    };
    let deps = ctx.deps_with_settings(knowledge, registry, settings);

    let stored = discover_for_article(article_id, None, &deps, &CancellationToken::new())
        .await
        .unwrap();

    let mut pairs: Vec<(String, String)> = stored
        .iter()
        .map(|s| (s.name.clone(), s.email.clone()))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("Loud Parts".to_string(), "sales@loudparts.de".to_string()),
            ("Quiet Parts".to_string(), "orders@quietparts.de".to_string()),
        ]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn discovery_for_missing_article_is_not_found(ctx: &TestHarness) {
    let deps = ctx.deps(MockKnowledgeProvider::new(), MockRegistryLookup::new());

    let result =
        discover_for_article(ArticleId::new(), None, &deps, &CancellationToken::new()).await;

    assert!(matches!(result, Err(SourcingError::NotFound { .. })));
}
