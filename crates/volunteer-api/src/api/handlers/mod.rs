//! API request handlers

pub mod events;
pub mod organisations;

use axum::extract::{rejection::PathRejection, Path};
use std::sync::Arc;

use volunteer_auth::IdentityVerifier;

use crate::api::error::ApiError;
use crate::core::{ResourceMutator, ResourceReader};
use crate::storage::Store;

pub use events::{
    add_participant, create_event, delete_event, get_event, list_events, remove_participant,
    update_event,
};
pub use organisations::{get_organisation, list_organisations};

/// Application state shared across handlers
pub struct AppState {
    /// Verifies bearer credentials on protected routes
    pub verifier: Arc<dyn IdentityVerifier>,
    pub mutator: ResourceMutator,
    pub reader: ResourceReader,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            mutator: ResourceMutator::new(store.clone()),
            reader: ResourceReader::new(store),
            verifier,
        }
    }
}

/// Integer id from the path; anything else is an unknown route
fn resource_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::NotFound(rejection.body_text()))
}
