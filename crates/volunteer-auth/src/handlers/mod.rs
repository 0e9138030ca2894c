//! Identity verifier implementations

pub mod jwt;
pub mod static_tokens;

pub use jwt::{Jwk, JwkSet, JwtVerifier, JwtVerifierConfig};
pub use static_tokens::StaticVerifier;
