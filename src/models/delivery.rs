use serde::{Deserialize, Serialize};

use super::enums::DeliveryStatus;
use super::EntityId;

/// One meal on its way to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDelivery {
    pub id: EntityId,
    pub patient_name: String,
    pub room_number: String,
    pub diet_details: String,
    pub status: DeliveryStatus,
    /// Name of the assigned delivery personnel, not their id.
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl MealDelivery {
    pub fn assigned_display(&self) -> &str {
        self.assigned_to.as_deref().unwrap_or("Unassigned")
    }
}

/// Body of `PUT /meal-deliveries/{id}`. `notes` is only sent when the
/// delivery round records them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryUpdate {
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryUpdate {
    pub fn status(status: DeliveryStatus) -> Self {
        Self { status, notes: None }
    }

    pub fn delivered_with_notes(notes: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Delivered,
            notes: Some(notes.into()),
        }
    }

    pub fn apply(&self, delivery: &mut MealDelivery) {
        delivery.status = self.status;
        if let Some(notes) = &self.notes {
            delivery.notes = notes.clone();
        }
    }
}

/// Body of `POST /assign-meal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMeal {
    pub meal_id: EntityId,
    pub personnel_id: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery() -> MealDelivery {
        MealDelivery {
            id: 1,
            patient_name: "John Doe".into(),
            room_number: "101".into(),
            diet_details: "Low sodium".into(),
            status: DeliveryStatus::Pending,
            assigned_to: None,
            notes: "ring twice".into(),
        }
    }

    #[test]
    fn unassigned_display() {
        let mut d = delivery();
        assert_eq!(d.assigned_display(), "Unassigned");
        d.assigned_to = Some("David Wilson".into());
        assert_eq!(d.assigned_display(), "David Wilson");
    }

    #[test]
    fn plain_status_update_keeps_notes() {
        let mut d = delivery();
        DeliveryUpdate::status(DeliveryStatus::InProgress).apply(&mut d);
        assert_eq!(d.status, DeliveryStatus::InProgress);
        assert_eq!(d.notes, "ring twice");
    }

    #[test]
    fn status_only_body_omits_notes() {
        let json = serde_json::to_value(DeliveryUpdate::status(DeliveryStatus::Delivered)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "delivered" }));
    }

    #[test]
    fn assign_body_is_camel_case() {
        let json = serde_json::to_value(AssignMeal { meal_id: 1, personnel_id: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "mealId": 1, "personnelId": 2 }));
    }
}
