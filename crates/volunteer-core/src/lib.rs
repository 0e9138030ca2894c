//! # Volunteer Core
//!
//! Domain model and authorization rules for the volunteering event API.
//!
//! ## Key Concepts
//!
//! - **Organisation**: identity-backed actor that owns events
//! - **User**: identity-backed participant in events
//! - **Event**: the mutable resource, owned by exactly one organisation
//! - **Permission gate**: the caller must hold the operation's permission string
//! - **Ownership**: the caller's identity must match the owning identity, which
//!   is the organisation for event mutations and the user for membership changes
//!
//! Nothing in this crate performs I/O. Persistence and transport live in
//! `volunteer-api`; credential verification lives in `volunteer-auth`.

pub mod error;
pub mod fields;
pub mod identity;
pub mod model;
pub mod ownership;
pub mod permission;
pub mod projection;

pub use error::{CoreError, Result};
pub use fields::{EventPatch, CREATE_FIELDS, UPDATE_FIELDS};
pub use identity::{identities_match, IdentityRef};
pub use model::{parse_timestamp, Event, NewEvent, Organisation, Timestamp, User};
pub use ownership::{
    authorize_operation, authorize_owner, check_ownership, resolve_owner, Operation,
    OrganisationOwnership, OwnershipContext, OwnershipStrategy, SelfParticipation,
};
pub use permission::{authorize, Permission, PermissionSet};
pub use projection::{
    EventFormat, EventView, OrganisationDetailView, OrganisationView, ParticipationView,
};
