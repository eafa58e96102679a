// HTTP server setup (Axum + JSON routes)
pub mod app;
pub mod errors;
pub mod extractors;
pub mod routes;

pub use app::*;
pub use errors::ApiError;
pub use extractors::ActingUser;
