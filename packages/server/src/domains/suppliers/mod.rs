//! Supplier discovery and the per-article candidate catalog.

pub mod activities;
pub mod models;
pub mod parsing;

pub use models::*;
