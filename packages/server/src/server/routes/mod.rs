// HTTP routes
pub mod campaigns;
pub mod health;
pub mod requests;
pub mod suppliers;

pub use health::health_handler;
