//! Resource mutator
//!
//! Every write follows the same sequence, and the first failing step decides
//! the outcome:
//!
//! 1. Permission gate on the caller's granted permissions
//! 2. Load the record that determines the owner (missing: unprocessable)
//! 3. Ownership check against the caller's subject
//! 4. Validate the request fields
//! 5. Mutate through the store (any storage failure: unprocessable)
//!
//! Updates hand the parsed patch to the store, which applies it to the row it
//! currently holds. Two updates naming different fields both take effect.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use volunteer_auth::VerifiedIdentity;
use volunteer_core::fields::{self, EventPatch};
use volunteer_core::{
    authorize_operation, authorize_owner, CoreError, Event, Operation, Organisation,
    OwnershipContext, ParticipationView, User,
};

use crate::storage::{StorageError, Store};

/// Normalise a storage failure at the mutation boundary
fn storage_failure(operation: Operation) -> impl Fn(StorageError) -> CoreError {
    move |err| {
        match &err {
            StorageError::NotFound(_) | StorageError::Constraint(_) => {
                warn!(operation = operation.as_str(), error = %err, "Store rejected mutation")
            }
            StorageError::Database(_) | StorageError::Connection(_) => {
                error!(operation = operation.as_str(), error = %err, "Store failed during mutation")
            }
        }
        CoreError::unprocessable(err.to_string())
    }
}

/// Read `user_id` from a participant body
fn user_id(body: &Map<String, Value>) -> Result<i64, CoreError> {
    match body.get("user_id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| CoreError::unprocessable("user_id must be an integer")),
        Some(Value::Null) | None => Err(CoreError::unprocessable("user_id is required")),
        Some(_) => Err(CoreError::unprocessable("user_id must be an integer")),
    }
}

/// Applies authorized changes to events and their participants
#[derive(Debug, Clone)]
pub struct ResourceMutator {
    store: Arc<dyn Store>,
}

impl ResourceMutator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Owner lookups
    // =========================================================================

    async fn load_organisation(
        &self,
        operation: Operation,
        id: i64,
    ) -> Result<Organisation, CoreError> {
        self.store
            .get_organisation(id)
            .await
            .map_err(storage_failure(operation))?
            .ok_or_else(|| {
                warn!(operation = operation.as_str(), organisation_id = id, "Unknown organisation");
                CoreError::unprocessable(format!("organisation {} does not exist", id))
            })
    }

    async fn load_event(&self, operation: Operation, id: i64) -> Result<Event, CoreError> {
        self.store
            .get_event(id)
            .await
            .map_err(storage_failure(operation))?
            .ok_or_else(|| {
                warn!(operation = operation.as_str(), event_id = id, "Unknown event");
                CoreError::unprocessable(format!("event {} does not exist", id))
            })
    }

    async fn load_user(&self, operation: Operation, id: i64) -> Result<User, CoreError> {
        self.store
            .get_user(id)
            .await
            .map_err(storage_failure(operation))?
            .ok_or_else(|| {
                warn!(operation = operation.as_str(), user_id = id, "Unknown user");
                CoreError::unprocessable(format!("user {} does not exist", id))
            })
    }

    /// Load an event and the organisation that owns it, then check ownership
    async fn owned_event(
        &self,
        operation: Operation,
        caller: &VerifiedIdentity,
        event_id: i64,
    ) -> Result<Event, CoreError> {
        let event = self.load_event(operation, event_id).await?;
        let organisation = self.load_organisation(operation, event.organisation_id).await?;

        authorize_owner(
            operation,
            &OwnershipContext::organisation(&organisation),
            Some(&caller.subject),
        )?;
        Ok(event)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Create an event for the organisation named in `body`
    pub async fn create_event(
        &self,
        caller: &VerifiedIdentity,
        body: &Map<String, Value>,
    ) -> Result<Event, CoreError> {
        let operation = Operation::CreateEvent;
        authorize_operation(&caller.permissions, operation)?;

        let organisation_id = fields::organisation_id(body)?;
        let organisation = self.load_organisation(operation, organisation_id).await?;
        authorize_owner(
            operation,
            &OwnershipContext::organisation(&organisation),
            Some(&caller.subject),
        )?;

        let new_event = fields::parse_new_event(body)?;
        let event = self
            .store
            .insert_event(new_event)
            .await
            .map_err(storage_failure(operation))?;

        info!(
            event_id = event.id,
            organisation_id = event.organisation_id,
            subject = %caller.subject,
            "Event created"
        );
        Ok(event)
    }

    /// Apply a partial update to an event
    pub async fn update_event(
        &self,
        caller: &VerifiedIdentity,
        event_id: i64,
        body: &Map<String, Value>,
    ) -> Result<Event, CoreError> {
        let operation = Operation::UpdateEvent;
        authorize_operation(&caller.permissions, operation)?;

        self.owned_event(operation, caller, event_id).await?;

        let patch = EventPatch::from_json(body)?;
        let stored = self
            .store
            .update_event(event_id, &patch)
            .await
            .map_err(storage_failure(operation))?;

        info!(event_id, subject = %caller.subject, "Event updated");
        Ok(stored)
    }

    /// Delete an event and its participant associations, returning its id
    pub async fn delete_event(
        &self,
        caller: &VerifiedIdentity,
        event_id: i64,
    ) -> Result<i64, CoreError> {
        let operation = Operation::DeleteEvent;
        authorize_operation(&caller.permissions, operation)?;

        self.owned_event(operation, caller, event_id).await?;
        self.store
            .delete_event(event_id)
            .await
            .map_err(storage_failure(operation))?;

        info!(event_id, subject = %caller.subject, "Event deleted");
        Ok(event_id)
    }

    // =========================================================================
    // Participants
    // =========================================================================

    /// Add the user named in `body` to an event. Re-adding is a no-op.
    pub async fn add_participant(
        &self,
        caller: &VerifiedIdentity,
        event_id: i64,
        body: &Map<String, Value>,
    ) -> Result<ParticipationView, CoreError> {
        let operation = Operation::AddParticipant;
        authorize_operation(&caller.permissions, operation)?;

        let user = self.load_user(operation, user_id(body)?).await?;
        authorize_owner(operation, &OwnershipContext::user(&user), Some(&caller.subject))?;

        let event = self
            .store
            .add_participant(event_id, user.id)
            .await
            .map_err(storage_failure(operation))?;

        info!(event_id, user_id = user.id, "Participant added");
        Ok(ParticipationView::from_event(&event))
    }

    /// Remove the user named in `body` from an event. Removing an absent
    /// participant succeeds.
    pub async fn remove_participant(
        &self,
        caller: &VerifiedIdentity,
        event_id: i64,
        body: &Map<String, Value>,
    ) -> Result<ParticipationView, CoreError> {
        let operation = Operation::RemoveParticipant;
        authorize_operation(&caller.permissions, operation)?;

        let user = self.load_user(operation, user_id(body)?).await?;
        authorize_owner(operation, &OwnershipContext::user(&user), Some(&caller.subject))?;

        let event = self
            .store
            .remove_participant(event_id, user.id)
            .await
            .map_err(storage_failure(operation))?;

        info!(event_id, user_id = user.id, "Participant removed");
        Ok(ParticipationView::from_event(&event))
    }
}
