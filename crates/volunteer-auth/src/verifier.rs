//! Identity verifier seam and bearer header parsing

use async_trait::async_trait;

use crate::error::{AuthError, Result};
use crate::types::VerifiedIdentity;

/// Validates a bearer credential and extracts the caller identity.
///
/// Implementations never expose token internals beyond the returned
/// [`VerifiedIdentity`].
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw bearer token
    ///
    /// # Returns
    /// * `Ok(VerifiedIdentity)` - Subject and granted permissions
    /// * `Err(AuthError)` - If the token is not acceptable
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity>;

    /// Get a description of this verifier (for logging)
    fn description(&self) -> &str {
        "identity verifier"
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly two whitespace-separated parts, the first being
/// `Bearer` (case-insensitive).
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or(AuthError::HeaderMissing)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::InvalidHeader("Authorization header must start with \"Bearer\"".into()),
        ),
        (Some(_), None, _) | (None, _, _) => {
            Err(AuthError::InvalidHeader("Token not found".into()))
        }
        _ => Err(AuthError::InvalidHeader(
            "Authorization header must be bearer token".into(),
        )),
    }
}
