//! Supplier catalog operations
//!
//! Thin layer over the `Supplier` model that turns missing rows into
//! `NotFound` and checks address edits.

use sqlx::PgPool;
use tracing::info;

use crate::common::{ArticleId, SourcingError, SourcingResult, SupplierId, UserId};
use crate::domains::requests::Article;
use crate::domains::suppliers::models::{Supplier, SupplierCandidate};
use crate::domains::suppliers::parsing::sanitize_address;

/// Replace every candidate of an article with `candidates`.
///
/// All-or-nothing: if any insert fails the previous set is left intact.
pub async fn replace_suppliers(
    article_id: ArticleId,
    candidates: &[SupplierCandidate],
    user_id: Option<UserId>,
    pool: &PgPool,
) -> SourcingResult<Vec<Supplier>> {
    let suppliers = Supplier::replace_for_article(article_id, candidates, user_id, pool)
        .await?
        .ok_or_else(|| SourcingError::not_found("Article", article_id))?;

    info!(
        article_id = %article_id,
        count = suppliers.len(),
        "Supplier set replaced"
    );
    Ok(suppliers)
}

pub async fn get_suppliers(article_id: ArticleId, pool: &PgPool) -> SourcingResult<Vec<Supplier>> {
    if Article::find_by_id(article_id, pool).await?.is_none() {
        return Err(SourcingError::not_found("Article", article_id));
    }
    Ok(Supplier::find_by_article(article_id, pool).await?)
}

pub async fn set_address_verified(
    supplier_id: SupplierId,
    verified: bool,
    pool: &PgPool,
) -> SourcingResult<Supplier> {
    Supplier::set_email_validated(supplier_id, verified, pool)
        .await?
        .ok_or_else(|| SourcingError::not_found("Supplier", supplier_id))
}

/// Set a supplier's contact address. An empty string clears it; anything
/// else must contain a usable address.
pub async fn update_address(
    supplier_id: SupplierId,
    address: &str,
    pool: &PgPool,
) -> SourcingResult<Supplier> {
    let address = address.trim();
    let address = if address.is_empty() {
        String::new()
    } else {
        let cleaned = sanitize_address(address);
        if cleaned.is_empty() {
            return Err(SourcingError::InvalidInput(format!(
                "not an email address: {:?}",
                address
            )));
        }
        cleaned
    };

    Supplier::update_email(supplier_id, &address, pool)
        .await?
        .ok_or_else(|| SourcingError::not_found("Supplier", supplier_id))
}

/// Returns false if the supplier did not exist
pub async fn delete_supplier(supplier_id: SupplierId, pool: &PgPool) -> SourcingResult<bool> {
    Ok(Supplier::delete(supplier_id, pool).await?)
}
