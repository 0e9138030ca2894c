//! In-memory storage backend
//!
//! Default storage implementation. All tables sit behind one lock so that a
//! mutation touching several of them is atomic. Data is lost on restart.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use volunteer_core::{Event, EventPatch, IdentityRef, NewEvent, Organisation, User};

use super::{StorageError, Store};

#[derive(Debug, Default)]
struct Tables {
    organisations: BTreeMap<i64, Organisation>,
    users: BTreeMap<i64, User>,
    events: BTreeMap<i64, Event>,
    last_organisation_id: i64,
    last_user_id: i64,
    last_event_id: i64,
}

impl Tables {
    fn require_organisation(&self, id: i64) -> Result<(), StorageError> {
        if self.organisations.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::Constraint(format!(
                "organisation {} does not exist",
                id
            )))
        }
    }
}

/// Fail when `identity` is already held by an existing record
fn check_unique_identity<'a>(
    identity: Option<&IdentityRef>,
    mut existing: impl Iterator<Item = Option<&'a IdentityRef>>,
) -> Result<(), StorageError> {
    let Some(identity) = identity else {
        return Ok(());
    };
    if existing.any(|other| other == Some(identity)) {
        return Err(StorageError::Constraint(format!(
            "identity '{}' is already registered",
            identity
        )));
    }
    Ok(())
}

/// In-memory store implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::Database("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::Database("store lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    // =========================================================================
    // Events
    // =========================================================================

    async fn list_events(&self) -> Result<Vec<Event>, StorageError> {
        let tables = self.read()?;
        Ok(tables.events.values().cloned().collect())
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StorageError> {
        let tables = self.read()?;
        Ok(tables.events.get(&id).cloned())
    }

    async fn list_events_for_organisation(
        &self,
        organisation_id: i64,
    ) -> Result<Vec<Event>, StorageError> {
        let tables = self.read()?;
        Ok(tables
            .events
            .values()
            .filter(|e| e.organisation_id == organisation_id)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, StorageError> {
        let mut tables = self.write()?;
        tables.require_organisation(event.organisation_id)?;
        event
            .validate()
            .map_err(|e| StorageError::Constraint(e.to_string()))?;

        tables.last_event_id += 1;
        let event = event.into_event(tables.last_event_id);
        info!(event_id = event.id, organisation_id = event.organisation_id, "Inserted event");
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> Result<Event, StorageError> {
        let mut tables = self.write()?;
        let stored = tables
            .events
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("event {}", id)))?;

        *stored = patch
            .apply(stored)
            .map_err(|e| StorageError::Constraint(e.to_string()))?;
        info!(event_id = id, "Updated event");
        Ok(stored.clone())
    }

    async fn delete_event(&self, id: i64) -> Result<(), StorageError> {
        let mut tables = self.write()?;
        match tables.events.remove(&id) {
            Some(event) => {
                info!(
                    event_id = id,
                    participants = event.participants.len(),
                    "Deleted event"
                );
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("event {}", id))),
        }
    }

    async fn add_participant(&self, event_id: i64, user_id: i64) -> Result<Event, StorageError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&user_id) {
            return Err(StorageError::Constraint(format!("user {} does not exist", user_id)));
        }
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or_else(|| StorageError::NotFound(format!("event {}", event_id)))?;

        if event.participants.insert(user_id) {
            info!(event_id, user_id, "Added participant");
        }
        Ok(event.clone())
    }

    async fn remove_participant(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Event, StorageError> {
        let mut tables = self.write()?;
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or_else(|| StorageError::NotFound(format!("event {}", event_id)))?;

        if event.participants.remove(&user_id) {
            info!(event_id, user_id, "Removed participant");
        }
        Ok(event.clone())
    }

    // =========================================================================
    // Organisations
    // =========================================================================

    async fn list_organisations(&self) -> Result<Vec<Organisation>, StorageError> {
        let tables = self.read()?;
        Ok(tables.organisations.values().cloned().collect())
    }

    async fn get_organisation(&self, id: i64) -> Result<Option<Organisation>, StorageError> {
        let tables = self.read()?;
        Ok(tables.organisations.get(&id).cloned())
    }

    async fn insert_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, StorageError> {
        let mut tables = self.write()?;
        check_unique_identity(
            organisation.identity.as_ref(),
            tables.organisations.values().map(|o| o.identity.as_ref()),
        )?;

        tables.last_organisation_id += 1;
        let organisation = Organisation {
            id: tables.last_organisation_id,
            ..organisation
        };
        info!(organisation_id = organisation.id, name = %organisation.name, "Inserted organisation");
        tables.organisations.insert(organisation.id, organisation.clone());
        Ok(organisation)
    }

    // =========================================================================
    // Users
    // =========================================================================

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        let tables = self.read()?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_users(&self, ids: &[i64]) -> Result<Vec<User>, StorageError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: User) -> Result<User, StorageError> {
        let mut tables = self.write()?;
        check_unique_identity(
            user.identity.as_ref(),
            tables.users.values().map(|u| u.identity.as_ref()),
        )?;

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            ..user
        };
        info!(user_id = user.id, "Inserted user");
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
