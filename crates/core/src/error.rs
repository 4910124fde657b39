//! Domain error taxonomy shared across the workspace.

use crate::types::DbId;

/// Domain-level errors, independent of any transport or framework.
///
/// The api crate maps these onto HTTP statuses; the db and storage layers
/// produce them at their boundaries.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity type name, e.g. `"Listing"`.
        entity: &'static str,
        /// The id that was looked up.
        id: DbId,
    },

    /// Missing or malformed input, rejected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with existing state (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The asset store could not be written. The caller must not proceed
    /// to a relational commit after seeing this.
    #[error("Asset storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Anything else that should surface as a sanitized server error.
    #[error("Internal error: {0}")]
    Internal(String),
}
