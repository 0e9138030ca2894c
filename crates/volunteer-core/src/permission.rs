//! Permission gate
//!
//! Checks a caller's granted permission strings against the one an operation
//! requires. Ownership is not considered here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

use crate::error::CoreError;

/// Permissions required by the mutating endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    AddEventParticipant,
    RemoveEventParticipant,
}

impl Permission {
    /// All permissions known to the API
    pub const ALL: [Permission; 5] = [
        Permission::CreateEvent,
        Permission::UpdateEvent,
        Permission::DeleteEvent,
        Permission::AddEventParticipant,
        Permission::RemoveEventParticipant,
    ];

    /// The exact permission string the identity provider grants
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateEvent => "create:event",
            Permission::UpdateEvent => "update:event",
            Permission::DeleteEvent => "delete:event",
            Permission::AddEventParticipant => "add:event-participant",
            Permission::RemoveEventParticipant => "remove:event-participant",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// Set of opaque permission strings granted to a caller.
///
/// Strings are kept verbatim; unknown strings are carried but never match a
/// required [`Permission`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Create an empty permission set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a granted permission string
    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.0.insert(permission.into());
        self
    }

    /// Exact-presence check
    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.as_str().to_string()
    }
}

/// Check that `granted` contains `required`.
///
/// Fails closed with [`CoreError::MissingPermission`].
pub fn authorize(granted: &PermissionSet, required: Permission) -> Result<(), CoreError> {
    if granted.contains(required.as_str()) {
        Ok(())
    } else {
        warn!(
            required = %required,
            granted = ?granted,
            "Permission denied: required permission not granted"
        );
        Err(CoreError::MissingPermission(required))
    }
}
