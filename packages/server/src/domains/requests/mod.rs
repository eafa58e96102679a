//! Part requests and the article codes registered under them.
//!
//! The surrounding intranet owns the full CRUD for these; this domain keeps
//! only what discovery and campaign grouping read and the few writes needed
//! to exercise them.

pub mod activities;
pub mod models;

pub use models::*;
