//! Event handlers
//!
//! Reads are public. Writes require a [`Caller`]; the permission gate runs
//! before the request body is decoded, so an unpermitted caller is told so
//! even when the body is malformed.

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::Json;
use serde_json::{Map, Value};
use std::sync::Arc;

use volunteer_core::{authorize_operation, EventView, Operation, ParticipationView};

use super::{resource_id, AppState};
use crate::api::auth::Caller;
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

type JsonBody = Result<Json<Map<String, Value>>, JsonRejection>;

/// List all events
///
/// GET /events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<EventView>>>, ApiError> {
    let events = state.reader.list_events().await?;
    Ok(Json(ApiResponse::data(events)))
}

/// Get one event
///
/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<EventView>>, ApiError> {
    let event_id = resource_id(path)?;
    let event = state
        .reader
        .get_event(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("event {}", event_id)))?;

    Ok(Json(ApiResponse::data(event)))
}

/// Create an event
///
/// POST /events (permission `create:event`, caller must be the organisation)
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    body: JsonBody,
) -> Result<Json<ApiResponse<EventView>>, ApiError> {
    authorize_operation(&caller.permissions, Operation::CreateEvent)?;
    let Json(body) = body?;

    let event = state.mutator.create_event(&caller, &body).await?;
    let view = state.reader.view_event(&event).await?;
    Ok(Json(ApiResponse::created(view)))
}

/// Partially update an event
///
/// PATCH /events/{event_id} (permission `update:event`, caller must own the event)
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    path: Result<Path<i64>, PathRejection>,
    body: JsonBody,
) -> Result<Json<ApiResponse<EventView>>, ApiError> {
    let event_id = resource_id(path)?;
    authorize_operation(&caller.permissions, Operation::UpdateEvent)?;
    let Json(body) = body?;

    let event = state.mutator.update_event(&caller, event_id, &body).await?;
    let view = state.reader.view_event(&event).await?;
    Ok(Json(ApiResponse::updated(view)))
}

/// Delete an event
///
/// DELETE /events/{event_id} (permission `delete:event`, caller must own the event)
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let event_id = resource_id(path)?;
    let deleted = state.mutator.delete_event(&caller, event_id).await?;
    Ok(Json(ApiResponse::deleted(deleted)))
}

/// Add a user to an event
///
/// POST /events/{event_id}/participants (permission `add:event-participant`,
/// caller must be the user)
pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    path: Result<Path<i64>, PathRejection>,
    body: JsonBody,
) -> Result<Json<ApiResponse<ParticipationView>>, ApiError> {
    let event_id = resource_id(path)?;
    authorize_operation(&caller.permissions, Operation::AddParticipant)?;
    let Json(body) = body?;

    let participation = state.mutator.add_participant(&caller, event_id, &body).await?;
    Ok(Json(ApiResponse::updated(participation)))
}

/// Remove a user from an event
///
/// DELETE /events/{event_id}/participants (permission
/// `remove:event-participant`, caller must be the user)
pub async fn remove_participant(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    path: Result<Path<i64>, PathRejection>,
    body: JsonBody,
) -> Result<Json<ApiResponse<ParticipationView>>, ApiError> {
    let event_id = resource_id(path)?;
    authorize_operation(&caller.permissions, Operation::RemoveParticipant)?;
    let Json(body) = body?;

    let participation = state
        .mutator
        .remove_participant(&caller, event_id, &body)
        .await?;
    Ok(Json(ApiResponse::updated(participation)))
}
