//! Error taxonomy shared by the seller store and its callers.

use crate::domain::seller::{SellerId, VersionId};

/// Coarse classification of a [`StoreError`], stable for callers that only need to
/// branch on the kind (e.g. to choose an HTTP status).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ReferenceNotFound,
    NotFound,
    ConcurrentModification,
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Referenced {entity} '{value}' does not exist")]
    ReferenceNotFound { entity: &'static str, value: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Version {previous_version_id} is no longer the current version of seller {seller_id}")]
    ConcurrentModification {
        seller_id: SellerId,
        previous_version_id: VersionId,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            StoreError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
