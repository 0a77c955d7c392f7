//! Dev API endpoint handlers, one module per resource family.

pub mod deliveries;
pub mod diet_charts;
pub mod health;
pub mod pantry;
pub mod patients;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::api::error::ApiError;
use crate::models::EntityId;

/// Unwrap a JSON body, turning extractor rejections into the
/// structured 400 response.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Unwrap an `:id` segment. A non-numeric id is a structured 400 too.
pub(crate) fn path_id(id: Result<Path<EntityId>, PathRejection>) -> Result<EntityId, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
