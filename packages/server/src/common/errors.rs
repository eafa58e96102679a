use thiserror::Error;

pub type SourcingResult<T> = std::result::Result<T, SourcingError>;

/// Errors surfaced by the supplier sourcing and campaign operations.
///
/// `Provider` and `Validation` are normally recovered inside the
/// fan-out loops (the unit of work is skipped); they only reach a caller
/// from the single-shot pass-through operations.
#[derive(Error, Debug)]
pub enum SourcingError {
    #[error("Knowledge provider error: {0}")]
    Provider(String),

    #[error("Registry lookup error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] anyhow::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl SourcingError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SourcingError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for SourcingError {
    fn from(err: sqlx::Error) -> Self {
        SourcingError::Persistence(err.into())
    }
}
