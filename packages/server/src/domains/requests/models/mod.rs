pub mod article;
pub mod part_request;

pub use article::*;
pub use part_request::*;
