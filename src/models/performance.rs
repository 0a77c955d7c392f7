use serde::{Deserialize, Serialize};

/// Read-only pantry performance snapshot, computed by the backend.
/// Rates are percentages, times are minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryPerformance {
    pub meals_preparation_on_time: f64,
    pub delivery_success_rate: f64,
    pub average_preparation_time: f64,
    pub average_delivery_time: f64,
}

impl PantryPerformance {
    /// Figures served by the in-memory store until a backend provides real ones.
    pub fn baseline() -> Self {
        Self {
            meals_preparation_on_time: 95.0,
            delivery_success_rate: 98.0,
            average_preparation_time: 20.0,
            average_delivery_time: 15.0,
        }
    }
}
