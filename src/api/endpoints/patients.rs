//! `/patients` endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{json_body, path_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{EntityId, NewPatient, Patient};

/// `GET /patients`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(ctx.store.list_patients().await?))
}

/// `POST /patients`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = ctx.store.create_patient(json_body(payload)?).await?;
    tracing::info!(id = patient.id, "Patient registered");
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PUT /patients/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let id = path_id(id)?;
    ctx.store
        .update_patient(id, json_body(payload)?)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("patient", id))
}

/// `DELETE /patients/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    if ctx.store.delete_patient(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("patient", id))
    }
}
