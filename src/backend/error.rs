// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Caller has no resolved identity; clients redirect to the login screen.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Malformed page record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Media item not found: {0}")]
    MediaNotFound(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("No wizard session in progress")]
    SessionNotFound,

    #[error("Wizard step does not allow this action: {0}")]
    InvalidStep(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    /// Fixed, user-facing message for a failed lifecycle operation.
    #[error("{0}")]
    OperationFailed(String),

    #[error("Internal canister error: {0}")]
    InternalError(String),
}
