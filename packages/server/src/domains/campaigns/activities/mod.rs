//! Campaign domain activities
//!
//! - `grouping`: supplier groups by contact address across requests
//! - `lifecycle`: create, message, send, close, edit, delete and reads

pub mod grouping;
pub mod lifecycle;

pub use grouping::{aggregate_by_address, group_by_address, PartAggregate, SupplierGroup};
pub use lifecycle::*;
