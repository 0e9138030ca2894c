//! Organisation read handlers

use axum::extract::{rejection::PathRejection, Path, State};
use axum::Json;
use std::sync::Arc;

use volunteer_core::{OrganisationDetailView, OrganisationView};

use super::{resource_id, AppState};
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

/// List organisations
///
/// GET /organisations
pub async fn list_organisations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<OrganisationView>>>, ApiError> {
    let organisations = state.reader.list_organisations().await?;
    Ok(Json(ApiResponse::data(organisations)))
}

/// Organisation details with past and upcoming events
///
/// GET /organisations/{organisation_id}
pub async fn get_organisation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<OrganisationDetailView>>, ApiError> {
    let organisation_id = resource_id(path)?;
    let detail = state
        .reader
        .get_organisation(organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("organisation {}", organisation_id)))?;

    Ok(Json(ApiResponse::data(detail)))
}
