//! Outreach campaigns built from supplier groups.

pub mod activities;
pub mod models;

pub use models::*;
