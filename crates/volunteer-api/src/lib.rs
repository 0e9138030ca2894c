//! Volunteering Event API
//!
//! HTTP service coordinating volunteering events between organisations and
//! users. Organisations own events; users manage their own participation.
//!
//! ## Request Pipeline
//!
//! Every write passes, in order:
//!
//! 1. **Authentication**: bearer credential verified into a subject and permissions
//! 2. **Permission gate**: the operation's permission string must be granted
//! 3. **Ownership**: the subject must match the owning organisation or user
//! 4. **Mutation**: allow-listed fields validated and applied through the store
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /events` - List events
//! - `GET /events/{id}` - Get one event
//! - `POST /events` - Create an event (`create:event`)
//! - `PATCH /events/{id}` - Update an event (`update:event`)
//! - `DELETE /events/{id}` - Delete an event (`delete:event`)
//! - `POST /events/{id}/participants` - Join an event (`add:event-participant`)
//! - `DELETE /events/{id}/participants` - Leave an event (`remove:event-participant`)
//! - `GET /organisations` - List organisations
//! - `GET /organisations/{id}` - Organisation with past and upcoming events

pub mod api;
pub mod config;
pub mod core;
pub mod fixtures;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, ServerConfig, VerifierSource};
pub use crate::core::{ResourceMutator, ResourceReader};
pub use storage::{MemoryStore, StorageError, Store};
#[cfg(feature = "postgres")]
pub use storage::PostgresStore;
