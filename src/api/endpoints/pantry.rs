//! Pantry endpoints: delivery personnel, preparation tasks and the
//! performance snapshot.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{json_body, path_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{
    DeliveryPersonnel, EntityId, MealPreparationTask, NewDeliveryPersonnel, PantryPerformance,
    PreparationStatus, StatusUpdate,
};

/// `GET /delivery-personnel`
pub async fn list_personnel(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<DeliveryPersonnel>>, ApiError> {
    Ok(Json(ctx.store.list_delivery_personnel().await?))
}

/// `POST /delivery-personnel`
pub async fn create_personnel(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewDeliveryPersonnel>, JsonRejection>,
) -> Result<(StatusCode, Json<DeliveryPersonnel>), ApiError> {
    let person = ctx
        .store
        .create_delivery_personnel(json_body(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /meal-preparation-tasks`
pub async fn list_tasks(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<MealPreparationTask>>, ApiError> {
    Ok(Json(ctx.store.list_preparation_tasks().await?))
}

/// `PUT /meal-preparation-tasks/:id` with `{status}`.
pub async fn update_task(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<StatusUpdate<PreparationStatus>>, JsonRejection>,
) -> Result<Json<MealPreparationTask>, ApiError> {
    let id = path_id(id)?;
    let StatusUpdate { status } = json_body(payload)?;
    ctx.store
        .update_preparation_status(id, status)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("meal preparation task", id))
}

/// `GET /pantry-performance`
pub async fn performance(
    State(ctx): State<ApiContext>,
) -> Result<Json<PantryPerformance>, ApiError> {
    Ok(Json(ctx.store.pantry_performance().await?))
}
