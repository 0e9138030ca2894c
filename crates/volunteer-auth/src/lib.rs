//! Caller Authentication
//!
//! Turns a bearer credential into a [`VerifiedIdentity`]: the subject the
//! credential names and the permission strings it grants. The API never looks
//! inside a token itself.
//!
//! ## Verifiers
//!
//! - **JWT**: RS256 access tokens from an Auth0-style tenant, keys from JWKS
//! - **Static**: fixed token table for tests and local development
//!
//! ## Usage
//!
//! ```ignore
//! use volunteer_auth::{bearer_token, handlers::*, IdentityVerifier};
//!
//! let verifier = JwtVerifier::new(JwtVerifierConfig::auth0(
//!     "volunteer.eu.auth0.com",
//!     "volunteer-api",
//! ));
//!
//! let token = bearer_token(Some("Bearer eyJ..."))?;
//! let identity = verifier.verify(token).await?;
//! println!("Subject: {}", identity.subject);
//! ```
//!
//! Every failure is an [`AuthError`] carrying the HTTP status and the short
//! machine-readable code the API reports.

pub mod error;
pub mod handlers;
pub mod types;
pub mod verifier;

pub use error::{AuthError, Result};
pub use handlers::{JwtVerifier, JwtVerifierConfig, StaticVerifier};
pub use types::VerifiedIdentity;
pub use verifier::{bearer_token, IdentityVerifier};
