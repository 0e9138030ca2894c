//! External identity references
//!
//! Organisations and users may carry a reference to an identity held by the
//! external identity provider. That reference is the sole authentication key,
//! so comparing two of them has to treat an absent reference as matching
//! nothing, including another absent reference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-empty identity reference issued by the external identity provider
/// (for example `auth0|60c58135612d820070a5f049`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityRef(String);

impl IdentityRef {
    /// Create an identity reference. Empty or all-whitespace input yields `None`.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IdentityRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IdentityRef::new(value).ok_or_else(|| "identity reference cannot be empty".to_string())
    }
}

impl From<IdentityRef> for String {
    fn from(identity: IdentityRef) -> Self {
        identity.0
    }
}

/// Compare an owning identity against a caller identity.
///
/// Only two present references with identical text match. If either side is
/// absent the result is `false`.
pub fn identities_match(owner: Option<&IdentityRef>, caller: Option<&IdentityRef>) -> bool {
    match (owner, caller) {
        (Some(owner), Some(caller)) => owner.as_str() == caller.as_str(),
        (None, _) | (_, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> IdentityRef {
        IdentityRef::new(value).unwrap()
    }

    #[test]
    fn test_empty_identity_is_absent() {
        assert!(IdentityRef::new("").is_none());
        assert!(IdentityRef::new("   ").is_none());
        assert!(IdentityRef::new("auth0|abc").is_some());
    }

    #[test]
    fn test_present_identities_match_exactly() {
        assert!(identities_match(Some(&id("org-A")), Some(&id("org-A"))));
        assert!(!identities_match(Some(&id("org-A")), Some(&id("org-B"))));
        assert!(!identities_match(Some(&id("org-A")), Some(&id("ORG-A"))));
    }

    #[test]
    fn test_absent_identities_never_match() {
        assert!(!identities_match(None, None));
        assert!(!identities_match(Some(&id("org-A")), None));
        assert!(!identities_match(None, Some(&id("org-A"))));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let parsed: Result<IdentityRef, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: IdentityRef = serde_json::from_str("\"auth0|x\"").unwrap();
        assert_eq!(parsed.as_str(), "auth0|x");
    }
}
