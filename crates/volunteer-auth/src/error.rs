//! Error types for credential verification

use thiserror::Error;

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while authenticating a caller.
///
/// Each variant carries the HTTP status and short machine-readable code the
/// API reports for it; see [`AuthError::status`] and [`AuthError::code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header on the request
    #[error("Authorization header is expected")]
    HeaderMissing,

    /// Header present but not of the form `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(String),

    /// Token could not be decoded
    #[error("Unable to parse authentication token: {0}")]
    MalformedToken(String),

    /// No signing key matches the token's key id
    #[error("Unable to find the appropriate key: {0}")]
    KeyNotFound(String),

    /// Token algorithm is not accepted
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Issuer, audience or subject claims are wrong or missing
    #[error("Incorrect claims: {0}")]
    InvalidClaims(String),

    /// Token carries no `permissions` claim
    #[error("Permissions not included in token")]
    PermissionsMissing,

    /// Token is not known to the verifier
    #[error("Unknown token")]
    UnknownToken,

    /// Signing keys could not be fetched from the identity provider
    #[error("Failed to fetch JWKS: {0}")]
    JwksUnavailable(String),
}

impl AuthError {
    /// HTTP status reported for this error
    pub fn status(&self) -> u16 {
        match self {
            AuthError::HeaderMissing
            | AuthError::InvalidHeader(_)
            | AuthError::UnsupportedAlgorithm(_)
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_)
            | AuthError::UnknownToken => 401,
            AuthError::MalformedToken(_)
            | AuthError::KeyNotFound(_)
            | AuthError::PermissionsMissing => 400,
            AuthError::JwksUnavailable(_) => 503,
        }
    }

    /// Machine-readable code reported in the response message
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_)
            | AuthError::MalformedToken(_)
            | AuthError::KeyNotFound(_)
            | AuthError::UnsupportedAlgorithm(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::UnknownToken => "invalid_token",
            AuthError::JwksUnavailable(_) => "jwks_unavailable",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience => AuthError::InvalidClaims("incorrect audience".into()),
            ErrorKind::InvalidIssuer => AuthError::InvalidClaims("incorrect issuer".into()),
            ErrorKind::InvalidSubject => AuthError::InvalidClaims("incorrect subject".into()),
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::InvalidClaims(format!("missing claim '{}'", claim))
            }
            _ => AuthError::MalformedToken(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::JwksUnavailable(err.to_string())
    }
}
