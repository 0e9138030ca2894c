//! Caller authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use volunteer_auth::{bearer_token, AuthError, VerifiedIdentity};

use super::error::ApiError;
use super::handlers::AppState;

/// The authenticated caller of a protected route.
///
/// Extraction fails with the verifier's error before the handler body runs,
/// so authentication always precedes permission and ownership checks.
#[derive(Debug, Clone)]
pub struct Caller(pub VerifiedIdentity);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AuthError::InvalidHeader("Authorization header is not valid text".into())
            })?),
            None => None,
        };
        let token = bearer_token(header)?;

        let identity = state.verifier.verify(token).await.map_err(|err| {
            warn!(
                verifier = state.verifier.description(),
                code = err.code(),
                "Authentication failed"
            );
            err
        })?;

        debug!(subject = %identity.subject, "Caller authenticated");
        Ok(Caller(identity))
    }
}
