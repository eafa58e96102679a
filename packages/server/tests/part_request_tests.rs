//! Integration tests for part requests and article registration.

mod common;

use crate::common::{candidate, seed_suppliers, test_user, TestHarness};
use sourcing_core::common::{RequestId, SourcingError};
use sourcing_core::domains::requests::activities::{
    create_request, delete_article, delete_request, register_article,
};
use sourcing_core::domains::requests::Article;
use sourcing_core::domains::suppliers::activities::get_suppliers;
use test_context::test_context;

fn unique_number() -> String {
    format!("REQ-{}", uuid::Uuid::new_v4().simple())
}

#[test_context(TestHarness)]
#[tokio::test]
async fn request_numbers_are_unique(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let number = unique_number();

    let created = create_request(&number, Some(test_user()), pool).await.unwrap();
    assert_eq!(created.number, number);

    assert!(matches!(
        create_request(&number, None, pool).await,
        Err(SourcingError::Conflict(_))
    ));
    assert!(matches!(
        create_request("   ", None, pool).await,
        Err(SourcingError::InvalidInput(_))
    ));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn register_article_checks_its_request(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let detached = register_article(" 3RT2015 ", None, None, pool).await.unwrap();
    assert_eq!(detached.code, "3RT2015");
    assert!(detached.request_id.is_none());

    assert!(matches!(
        register_article("3RT2015", Some(RequestId::new()), None, pool).await,
        Err(SourcingError::NotFound { .. })
    ));
    assert!(matches!(
        register_article("", None, None, pool).await,
        Err(SourcingError::InvalidInput(_))
    ));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_request_detaches_its_articles(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let request = create_request(&unique_number(), None, pool).await.unwrap();
    let article = register_article("3RT2016", Some(request.id), None, pool)
        .await
        .unwrap();
    seed_suppliers(pool, article.id, &[candidate("Acme", "acme.com", "")])
        .await
        .unwrap();

    delete_request(request.id, pool).await.unwrap();

    let kept = Article::find_by_id(article.id, pool).await.unwrap().unwrap();
    assert!(kept.request_id.is_none());
    assert_eq!(get_suppliers(article.id, pool).await.unwrap().len(), 1);

    assert!(matches!(
        delete_request(request.id, pool).await,
        Err(SourcingError::NotFound { .. })
    ));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_missing_article_is_not_found(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let article = register_article("3RT2017", None, None, pool).await.unwrap();

    delete_article(article.id, pool).await.unwrap();

    assert!(matches!(
        delete_article(article.id, pool).await,
        Err(SourcingError::NotFound { .. })
    ));
}
