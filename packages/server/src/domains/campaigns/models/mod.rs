pub mod campaign;
pub mod campaign_article;
pub mod message;
pub mod status;

pub use campaign::*;
pub use campaign_article::*;
pub use message::*;
pub use status::*;
