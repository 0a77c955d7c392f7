//! The common resource interface and its two implementations.
//!
//! - `RemoteStore` talks to the REST backend.
//! - `InMemoryStore` keeps every collection in process memory and
//!   serves as the development fallback.
//!
//! Missing ids are not errors: updates return `Ok(None)` and deletes
//! return `Ok(false)`.

pub mod memory;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    DeliveryPersonnel, DeliveryUpdate, DietChart, EntityId, MealDelivery, MealPreparationTask,
    NewDeliveryPersonnel, NewDietChart, NewPatient, PantryPerformance, Patient, PreparationStatus,
};

pub use memory::InMemoryStore;
pub use remote::RemoteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot reach backend at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal lock error")]
    LockPoisoned,
}

/// One operation per backend endpoint.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;

    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError>;
    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError>;
    async fn update_patient(
        &self,
        id: EntityId,
        patient: NewPatient,
    ) -> Result<Option<Patient>, StoreError>;
    async fn delete_patient(&self, id: EntityId) -> Result<bool, StoreError>;

    async fn list_delivery_personnel(&self) -> Result<Vec<DeliveryPersonnel>, StoreError>;
    async fn create_delivery_personnel(
        &self,
        personnel: NewDeliveryPersonnel,
    ) -> Result<DeliveryPersonnel, StoreError>;

    async fn list_meal_deliveries(&self) -> Result<Vec<MealDelivery>, StoreError>;
    async fn update_meal_delivery(
        &self,
        id: EntityId,
        update: DeliveryUpdate,
    ) -> Result<Option<MealDelivery>, StoreError>;
    /// Record the personnel's name on the delivery. `None` when either id is unknown.
    async fn assign_meal(
        &self,
        meal_id: EntityId,
        personnel_id: EntityId,
    ) -> Result<Option<MealDelivery>, StoreError>;

    async fn list_preparation_tasks(&self) -> Result<Vec<MealPreparationTask>, StoreError>;
    async fn update_preparation_status(
        &self,
        id: EntityId,
        status: PreparationStatus,
    ) -> Result<Option<MealPreparationTask>, StoreError>;

    async fn list_diet_charts(&self) -> Result<Vec<DietChart>, StoreError>;
    async fn create_diet_chart(&self, chart: NewDietChart) -> Result<DietChart, StoreError>;
    async fn update_diet_chart(
        &self,
        id: EntityId,
        chart: NewDietChart,
    ) -> Result<Option<DietChart>, StoreError>;
    async fn delete_diet_chart(&self, id: EntityId) -> Result<bool, StoreError>;

    async fn pantry_performance(&self) -> Result<PantryPerformance, StoreError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_object_safe() {
        fn _assert_store(_: &dyn ResourceStore) {}
    }
}
