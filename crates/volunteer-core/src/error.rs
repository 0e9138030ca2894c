//! Error types for the volunteering domain

use thiserror::Error;

use crate::permission::Permission;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Closed set of failure kinds produced by the domain and mutation layers.
///
/// These carry no transport vocabulary; the HTTP boundary maps each kind to a
/// status code exactly once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The caller was not granted the permission the operation requires
    #[error("Missing permission: {0}")]
    MissingPermission(Permission),

    /// The caller holds the permission but does not own the target resource
    #[error("Caller is not the owner of the resource")]
    NotOwner,

    /// Any other validation or integrity failure
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
}

impl CoreError {
    /// Shorthand for an unprocessable error
    pub fn unprocessable(reason: impl Into<String>) -> Self {
        CoreError::Unprocessable(reason.into())
    }
}
