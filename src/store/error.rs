//! Remote store error types.
//!
//! Every failure coming out of the row API, the storage API or the in-memory
//! store is mapped onto [`StoreError`]. The variants are backend agnostic so hooks
//! and the review state machine can branch on them without knowing which client
//! produced them.

use miette::Diagnostic;
use thiserror::Error;

/// Remote store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Row not found: {table} with id '{id}'")]
    #[diagnostic(code(community_admin::store::not_found))]
    NotFound { table: String, id: String },

    #[error("Conflict in {table}: {message}")]
    #[diagnostic(code(community_admin::store::conflict))]
    Conflict { table: String, message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(community_admin::store::validation))]
    Validation { message: String },

    #[error("Remote API error ({status}): {message}")]
    #[diagnostic(code(community_admin::store::api))]
    Api { status: u16, message: String },

    #[error("Failed to reach the remote store")]
    #[diagnostic(
        code(community_admin::store::connection),
        help("Check the configured URL and your network connection.")
    )]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from remote store: {message}")]
    #[diagnostic(code(community_admin::store::invalid_response))]
    InvalidResponse { message: String },

    #[error("Storage error in bucket '{bucket}': {message}")]
    #[diagnostic(code(community_admin::store::storage))]
    Storage { bucket: String, message: String },
}

impl StoreError {
    /// Shorthand for a validation failure raised before any remote call.
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            StoreError::Connection { source: e }
        } else {
            StoreError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;
