use thiserror::Error;

use crate::domain::forms::FieldErrors;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    /// Field-keyed validation failure; recoverable, blocks the submission.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// A record id from a stale view no longer exists.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },
    /// A transition attempted from a state that no longer permits it.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl MarketError {
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl From<FieldErrors> for MarketError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
