//! Static token verifier
//!
//! Maps opaque tokens to fixed identities. Used by tests and for local runs
//! without an identity provider.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{AuthError, Result};
use crate::types::VerifiedIdentity;
use crate::verifier::IdentityVerifier;

/// Verifier backed by an in-memory token table
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    /// Create an empty verifier; every token is rejected
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `identity`
    pub fn with_token(mut self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    /// Load a token table from JSON of the form
    /// `{"<token>": {"subject": "...", "permissions": ["..."]}}`
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let tokens: HashMap<String, VerifiedIdentity> = serde_json::from_str(json)?;
        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    fn description(&self) -> &str {
        "static token verifier"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        let identity = self.tokens.get(token).ok_or(AuthError::UnknownToken)?;

        if identity.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use volunteer_core::IdentityRef;

    fn identity(subject: &str) -> VerifiedIdentity {
        VerifiedIdentity::new(IdentityRef::new(subject).unwrap())
    }

    #[tokio::test]
    async fn test_known_token() {
        let verifier = StaticVerifier::new()
            .with_token("org-token", identity("org-A").with_permissions(["create:event"]));

        let verified = verifier.verify("org-token").await.unwrap();
        assert_eq!(verified.subject.as_str(), "org-A");
        assert!(verified.permissions.contains("create:event"));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let verifier = StaticVerifier::new();
        let err = verifier.verify("nope").await.unwrap_err();

        assert_eq!(err, AuthError::UnknownToken);
        assert_eq!(err.status(), 401);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let verifier = StaticVerifier::new().with_token(
            "old",
            identity("org-A").with_expires_at(Utc::now() - Duration::minutes(5)),
        );

        assert_eq!(verifier.verify("old").await.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn test_from_json() {
        let verifier = StaticVerifier::from_json(
            r#"{
                "user-token": {
                    "subject": "auth0|60c58174612d820070a5f057",
                    "permissions": ["add:event-participant", "remove:event-participant"]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(verifier.len(), 1);
        let verified = verifier.verify("user-token").await.unwrap();
        assert!(verified.permissions.contains("remove:event-participant"));

        assert!(StaticVerifier::from_json(r#"{"t": {"subject": ""}}"#).is_err());
    }
}
