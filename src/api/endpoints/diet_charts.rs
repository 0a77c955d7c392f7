//! `/diet-charts` endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{json_body, path_id};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{DietChart, EntityId, NewDietChart};

/// `GET /diet-charts`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<DietChart>>, ApiError> {
    Ok(Json(ctx.store.list_diet_charts().await?))
}

/// `POST /diet-charts`: the body must carry exactly one meal per slot.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewDietChart>, JsonRejection>,
) -> Result<(StatusCode, Json<DietChart>), ApiError> {
    let chart = ctx.store.create_diet_chart(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(chart)))
}

/// `PUT /diet-charts/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<NewDietChart>, JsonRejection>,
) -> Result<Json<DietChart>, ApiError> {
    let id = path_id(id)?;
    ctx.store
        .update_diet_chart(id, json_body(payload)?)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("diet chart", id))
}

/// `DELETE /diet-charts/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    if ctx.store.delete_diet_chart(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("diet chart", id))
    }
}
