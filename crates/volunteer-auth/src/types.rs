//! Core types for credential verification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use volunteer_core::{IdentityRef, PermissionSet};

/// A caller identity established from a verified bearer credential.
///
/// This is the only thing the rest of the API learns about a token: the
/// subject it names and the permission strings it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Subject identifier (the `sub` claim), compared against resource owners
    pub subject: IdentityRef,

    /// Permission strings granted to the caller
    #[serde(default)]
    pub permissions: PermissionSet,

    /// The issuer of the credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// When the credential expires (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl VerifiedIdentity {
    /// Create an identity with no permissions
    pub fn new(subject: IdentityRef) -> Self {
        Self {
            subject,
            permissions: PermissionSet::new(),
            issuer: None,
            expires_at: None,
        }
    }

    /// Set the granted permissions
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Set issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set expiration time
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check if the credential is expired
    pub fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(exp) if exp < Utc::now())
    }
}
