use serde::{Deserialize, Serialize};

use super::enums::PreparationStatus;
use super::EntityId;

/// Pantry task for preparing one meal. Patient and diet fields are
/// denormalized copies, never edited through this entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPreparationTask {
    pub id: EntityId,
    pub patient_name: String,
    pub meal_type: String,
    pub diet_details: String,
    pub status: PreparationStatus,
}

/// `{status}` body of the status update endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}
