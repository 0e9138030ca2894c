//! Storage abstraction for the volunteering API
//!
//! The [`Store`] trait is the explicit handle every component receives; there
//! is no ambient session. Two backends exist:
//!
//! - [`MemoryStore`]: default, process-local, lost on restart
//! - `PostgresStore` (feature `postgres`): persistent, one transaction per mutation
//!
//! Both enforce the same integrity rules: foreign keys, the event time
//! ordering check, unique identities and cascading participant removal.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use std::fmt::Debug;

use volunteer_core::{Event, EventPatch, NewEvent, Organisation, User};

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Foreign key, check or uniqueness violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Storage backend trait for organisations, users and events
///
/// Implementations must be thread-safe. Each mutating call is atomic: it either
/// applies completely or leaves the store unchanged.
#[async_trait]
pub trait Store: Send + Sync + Debug {
    // =========================================================================
    // Events
    // =========================================================================

    /// All events, ordered by id
    async fn list_events(&self) -> Result<Vec<Event>, StorageError>;

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StorageError>;

    /// Events owned by one organisation, ordered by id
    async fn list_events_for_organisation(
        &self,
        organisation_id: i64,
    ) -> Result<Vec<Event>, StorageError>;

    /// Insert an event and return it with its generated id
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StorageError>;

    /// Apply a partial update to the stored event and return the result.
    ///
    /// The patch is applied to the current row while it is locked, so fields
    /// the patch does not name keep whatever value is stored at that moment.
    /// Participants are left as stored.
    async fn update_event(&self, id: i64, patch: &EventPatch) -> Result<Event, StorageError>;

    /// Delete an event together with its participant associations
    async fn delete_event(&self, id: i64) -> Result<(), StorageError>;

    /// Associate a user with an event. Already-present associations are kept
    /// as they are. Returns the event after the change.
    async fn add_participant(&self, event_id: i64, user_id: i64) -> Result<Event, StorageError>;

    /// Remove an association if present. Returns the event after the change.
    async fn remove_participant(&self, event_id: i64, user_id: i64)
        -> Result<Event, StorageError>;

    // =========================================================================
    // Organisations
    // =========================================================================

    /// All organisations, ordered by id
    async fn list_organisations(&self) -> Result<Vec<Organisation>, StorageError>;

    async fn get_organisation(&self, id: i64) -> Result<Option<Organisation>, StorageError>;

    /// Insert an organisation. The `id` field is ignored and a new one assigned.
    async fn insert_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, StorageError>;

    // =========================================================================
    // Users
    // =========================================================================

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Users with the given ids, ordered by id. Unknown ids are skipped.
    async fn get_users(&self, ids: &[i64]) -> Result<Vec<User>, StorageError>;

    /// Insert a user. The `id` field is ignored and a new one assigned.
    async fn insert_user(&self, user: User) -> Result<User, StorageError>;
}
