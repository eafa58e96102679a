//! Typed ID definitions for all domain entities.
//!
//! ```rust
//! use sourcing_core::common::{ArticleId, SupplierId};
//!
//! let article_id = ArticleId::new();
//! let supplier_id = SupplierId::new();
//!
//! // This would be a compile error:
//! // let wrong: SupplierId = article_id;
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for users of the surrounding intranet (owned by the auth layer).
pub struct User;

/// Marker type for PartRequest entities (user-visible sourcing batches).
pub struct PartRequest;

/// Marker type for Article entities (part codes being sourced).
pub struct Article;

/// Marker type for SupplierCandidate entities.
pub struct Supplier;

/// Marker type for EmailCampaign entities.
pub struct EmailCampaign;

/// Marker type for CampaignArticleLink entities.
pub struct CampaignArticle;

/// Marker type for CampaignMessage entities.
pub struct CampaignMessage;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type RequestId = Id<PartRequest>;

pub type ArticleId = Id<Article>;

pub type SupplierId = Id<Supplier>;

pub type CampaignId = Id<EmailCampaign>;

pub type CampaignArticleId = Id<CampaignArticle>;

pub type MessageId = Id<CampaignMessage>;
