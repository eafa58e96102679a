// Supplier Sourcing - API Core
//
// Discovers candidate suppliers for part codes through a search-grounded
// knowledge provider, keeps a per-article supplier catalog, and groups
// suppliers by contact address into trackable outreach campaigns.
//
// Each domain keeps its SQL in models/ and its orchestration in activities/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
