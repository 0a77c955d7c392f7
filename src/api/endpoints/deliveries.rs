//! `/meal-deliveries` and `/assign-meal`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use super::{json_body, path_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{AssignMeal, DeliveryUpdate, EntityId, MealDelivery};

/// `GET /meal-deliveries`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<MealDelivery>>, ApiError> {
    Ok(Json(ctx.store.list_meal_deliveries().await?))
}

/// `PUT /meal-deliveries/:id` with `{status, notes?}`.
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<DeliveryUpdate>, JsonRejection>,
) -> Result<Json<MealDelivery>, ApiError> {
    let id = path_id(id)?;
    ctx.store
        .update_meal_delivery(id, json_body(payload)?)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("meal delivery", id))
}

/// `POST /assign-meal` with `{mealId, personnelId}`.
pub async fn assign(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AssignMeal>, JsonRejection>,
) -> Result<Json<MealDelivery>, ApiError> {
    let AssignMeal {
        meal_id,
        personnel_id,
    } = json_body(payload)?;

    match ctx.store.assign_meal(meal_id, personnel_id).await? {
        Some(delivery) => {
            tracing::info!(meal_id, personnel_id, "Meal assigned");
            Ok(Json(delivery))
        }
        None => Err(ApiError::NotFound(format!(
            "meal delivery {meal_id} or delivery personnel {personnel_id} not found"
        ))),
    }
}
