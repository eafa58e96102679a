//! Supplier domain activities
//!
//! - `discover`: region fan-out against the knowledge provider
//! - `resolve_contact`: single-company address lookup
//! - `validate_domains`: registry gate for websites
//! - `catalog`: persisted candidate sets per article
//! - `run_discovery`: the whole pipeline for one article

pub mod catalog;
pub mod discover;
pub mod resolve_contact;
pub mod run_discovery;
pub mod validate_domains;

pub use catalog::*;
pub use discover::{discover_suppliers, FanoutOptions, DEFAULT_REGIONS};
pub use resolve_contact::resolve_contact_address;
pub use run_discovery::discover_for_article;
pub use validate_domains::validate_domains;
