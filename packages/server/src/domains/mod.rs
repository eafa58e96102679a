// Business domains
pub mod campaigns;
pub mod requests;
pub mod suppliers;
