//! Domain entities shared by the stores, the resource client and the panels.
//!
//! Wire JSON uses camelCase field names to match the backend.

pub mod delivery;
pub mod diet_chart;
pub mod enums;
pub mod patient;
pub mod performance;
pub mod personnel;
pub mod preparation;

pub use delivery::{AssignMeal, DeliveryUpdate, MealDelivery};
pub use diet_chart::{DietChart, Meal, MealEntry, MealPlan, MealPlanError, NewDietChart};
pub use enums::{
    DeliveryFilter, DeliveryLabel, DeliveryStatus, Gender, MealSlot, ParseEnumError,
    PreparationStatus,
};
pub use patient::{NewPatient, Patient};
pub use performance::PantryPerformance;
pub use personnel::{DeliveryPersonnel, NewDeliveryPersonnel};
pub use preparation::{MealPreparationTask, StatusUpdate};

/// Backend-assigned identity of a stored entity.
pub type EntityId = u64;

/// An entity with a backend-assigned identity.
pub trait Identified {
    fn id(&self) -> EntityId;
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> EntityId {
                self.id
            }
        })+
    };
}

identified!(Patient, DietChart, DeliveryPersonnel, MealPreparationTask, MealDelivery);
