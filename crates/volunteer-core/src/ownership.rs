//! Ownership resolution
//!
//! Who owns a resource depends on the operation, not on the resource type:
//! an event is mutated by its organisation, but event membership is mutated by
//! the participating user alone. Each [`Operation`] therefore selects an
//! [`OwnershipStrategy`] that knows where to find the owning identity.

use tracing::warn;

use crate::error::CoreError;
use crate::identity::{identities_match, IdentityRef};
use crate::model::{Organisation, User};
use crate::permission::{authorize, Permission, PermissionSet};

/// Mutating operations exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    AddParticipant,
    RemoveParticipant,
}

impl Operation {
    /// Permission string the caller must hold
    pub fn required_permission(self) -> Permission {
        match self {
            Operation::CreateEvent => Permission::CreateEvent,
            Operation::UpdateEvent => Permission::UpdateEvent,
            Operation::DeleteEvent => Permission::DeleteEvent,
            Operation::AddParticipant => Permission::AddEventParticipant,
            Operation::RemoveParticipant => Permission::RemoveEventParticipant,
        }
    }

    /// Strategy used to find the owner for this operation
    pub fn ownership(self) -> &'static dyn OwnershipStrategy {
        match self {
            Operation::CreateEvent | Operation::UpdateEvent | Operation::DeleteEvent => {
                &OrganisationOwnership
            }
            Operation::AddParticipant | Operation::RemoveParticipant => &SelfParticipation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateEvent => "create_event",
            Operation::UpdateEvent => "update_event",
            Operation::DeleteEvent => "delete_event",
            Operation::AddParticipant => "add_participant",
            Operation::RemoveParticipant => "remove_participant",
        }
    }
}

/// The loaded records an ownership decision may look at
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipContext<'a> {
    /// Target organisation, or the organisation owning the target event
    pub organisation: Option<&'a Organisation>,
    /// Target user of a membership change
    pub user: Option<&'a User>,
}

impl<'a> OwnershipContext<'a> {
    pub fn organisation(organisation: &'a Organisation) -> Self {
        Self {
            organisation: Some(organisation),
            user: None,
        }
    }

    pub fn user(user: &'a User) -> Self {
        Self {
            organisation: None,
            user: Some(user),
        }
    }
}

/// Locates the owning identity for a class of operations
pub trait OwnershipStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// The identity that must match the caller, if one can be determined
    fn owning_identity<'a>(&self, context: &OwnershipContext<'a>) -> Option<&'a IdentityRef>;
}

/// Event create, update and delete belong to the owning organisation
#[derive(Debug, Clone, Copy)]
pub struct OrganisationOwnership;

impl OwnershipStrategy for OrganisationOwnership {
    fn name(&self) -> &'static str {
        "organisation"
    }

    fn owning_identity<'a>(&self, context: &OwnershipContext<'a>) -> Option<&'a IdentityRef> {
        context.organisation.and_then(|org| org.identity.as_ref())
    }
}

/// A user manages their own participation; the organisation has no say
#[derive(Debug, Clone, Copy)]
pub struct SelfParticipation;

impl OwnershipStrategy for SelfParticipation {
    fn name(&self) -> &'static str {
        "self_participation"
    }

    fn owning_identity<'a>(&self, context: &OwnershipContext<'a>) -> Option<&'a IdentityRef> {
        context.user.and_then(|user| user.identity.as_ref())
    }
}

/// Resolve the owning identity for `operation`
pub fn resolve_owner<'a>(
    operation: Operation,
    context: &OwnershipContext<'a>,
) -> Option<&'a IdentityRef> {
    operation.ownership().owning_identity(context)
}

/// Exact match between owner and caller; absence on either side never matches
pub fn check_ownership(owner: Option<&IdentityRef>, caller: Option<&IdentityRef>) -> bool {
    identities_match(owner, caller)
}

/// Permission gate for `operation`
pub fn authorize_operation(granted: &PermissionSet, operation: Operation) -> Result<(), CoreError> {
    authorize(granted, operation.required_permission())
}

/// Ownership gate for `operation`, failing with [`CoreError::NotOwner`]
pub fn authorize_owner(
    operation: Operation,
    context: &OwnershipContext<'_>,
    caller: Option<&IdentityRef>,
) -> Result<(), CoreError> {
    let strategy = operation.ownership();
    let owner = strategy.owning_identity(context);

    if check_ownership(owner, caller) {
        Ok(())
    } else {
        warn!(
            operation = operation.as_str(),
            strategy = strategy.name(),
            owner = ?owner.map(IdentityRef::as_str),
            caller = ?caller.map(IdentityRef::as_str),
            "Ownership denied: caller is not the resource owner"
        );
        Err(CoreError::NotOwner)
    }
}
