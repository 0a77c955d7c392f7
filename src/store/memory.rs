//! In-process store: one collection per resource, each with its own
//! monotonic id counter.
//!
//! Ids are never reused, even after deletes. State lives as long as the
//! store value; two processes never see each other's edits.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ResourceStore, StoreError};
use crate::models::{
    DeliveryPersonnel, DeliveryStatus, DeliveryUpdate, DietChart, EntityId, Gender, Identified,
    MealDelivery, MealPreparationTask, NewDeliveryPersonnel, NewDietChart, NewPatient,
    PantryPerformance, Patient, PreparationStatus,
};

// ═══════════════════════════════════════════════════════════
// Collection
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Collection<T> {
    items: Vec<T>,
    next_id: EntityId,
}

impl<T: Identified + Clone> Collection<T> {
    fn from_items(items: Vec<T>) -> Self {
        let next_id = items.iter().map(Identified::id).max().unwrap_or(0) + 1;
        Self { items, next_id }
    }

    /// Copy of the collection, never the live vector.
    fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    fn find(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> T {
        let item = build(self.next_id);
        self.next_id += 1;
        self.items.push(item.clone());
        item
    }

    fn update(&mut self, id: EntityId, apply: impl FnOnce(&mut T)) -> Option<T> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        apply(item);
        Some(item.clone())
    }

    fn remove(&mut self, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }
}

// ═══════════════════════════════════════════════════════════
// Store data
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct StoreData {
    patients: Collection<Patient>,
    personnel: Collection<DeliveryPersonnel>,
    deliveries: Collection<MealDelivery>,
    tasks: Collection<MealPreparationTask>,
    diet_charts: Collection<DietChart>,
    performance: PantryPerformance,
}

impl StoreData {
    fn empty() -> Self {
        Self {
            patients: Collection::from_items(Vec::new()),
            personnel: Collection::from_items(Vec::new()),
            deliveries: Collection::from_items(Vec::new()),
            tasks: Collection::from_items(Vec::new()),
            diet_charts: Collection::from_items(Vec::new()),
            performance: PantryPerformance::baseline(),
        }
    }

    /// Demo data shown by a development dashboard with no backend.
    fn demo() -> Self {
        Self {
            patients: Collection::from_items(vec![Patient {
                id: 1,
                name: "John Doe".into(),
                diseases: vec!["Diabetes".into()],
                allergies: vec!["Peanuts".into()],
                room_number: "101".into(),
                bed_number: "A".into(),
                floor_number: "1".into(),
                age: 45,
                gender: Gender::Male,
                contact_info: "555-0101".into(),
                emergency_contact: "555-0102".into(),
            }]),
            personnel: Collection::from_items(vec![DeliveryPersonnel {
                id: 1,
                name: "David Wilson".into(),
                contact_info: "555-0123".into(),
                other_details: "Zone A".into(),
            }]),
            deliveries: Collection::from_items(vec![MealDelivery {
                id: 1,
                patient_name: "John Doe".into(),
                room_number: "101".into(),
                diet_details: "Low sodium, Diabetic".into(),
                status: DeliveryStatus::Pending,
                assigned_to: Some("David Wilson".into()),
                notes: String::new(),
            }]),
            tasks: Collection::from_items(vec![
                MealPreparationTask {
                    id: 1,
                    patient_name: "John Doe".into(),
                    meal_type: "Breakfast".into(),
                    diet_details: "Low sodium, Diabetic".into(),
                    status: PreparationStatus::Pending,
                },
                MealPreparationTask {
                    id: 2,
                    patient_name: "Jane Smith".into(),
                    meal_type: "Lunch".into(),
                    diet_details: "Vegetarian".into(),
                    status: PreparationStatus::InProgress,
                },
            ]),
            diet_charts: Collection::from_items(Vec::new()),
            performance: PantryPerformance::baseline(),
        }
    }

    fn assign_meal(&mut self, meal_id: EntityId, personnel_id: EntityId) -> Option<MealDelivery> {
        let name = self.personnel.find(personnel_id)?.name.clone();
        self.deliveries
            .update(meal_id, |delivery| delivery.assigned_to = Some(name))
    }
}

// ═══════════════════════════════════════════════════════════
// InMemoryStore
// ═══════════════════════════════════════════════════════════

/// Explicitly constructed in-memory store. Inject it wherever a
/// `ResourceStore` is expected; call `reset()` between tests.
#[derive(Debug)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
    initial: StoreData,
}

impl InMemoryStore {
    /// Store with no entities.
    pub fn empty() -> Self {
        Self::from_data(StoreData::empty())
    }

    /// Store pre-loaded with the demo patient, personnel, delivery and tasks.
    pub fn seeded() -> Self {
        Self::from_data(StoreData::demo())
    }

    fn from_data(data: StoreData) -> Self {
        Self {
            data: Mutex::new(data.clone()),
            initial: data,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>, StoreError> {
        self.data.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Restore the state the store was constructed with, id counters included.
    pub fn reset(&self) -> Result<(), StoreError> {
        *self.lock()? = self.initial.clone();
        tracing::debug!("In-memory store reset");
        Ok(())
    }

    pub fn update_delivery_personnel(
        &self,
        id: EntityId,
        personnel: NewDeliveryPersonnel,
    ) -> Result<Option<DeliveryPersonnel>, StoreError> {
        Ok(self
            .lock()?
            .personnel
            .update(id, |existing| *existing = personnel.with_id(id)))
    }

    pub fn delete_delivery_personnel(&self, id: EntityId) -> Result<bool, StoreError> {
        Ok(self.lock()?.personnel.remove(id))
    }

    /// Replace the performance snapshot served by `pantry_performance`.
    pub fn set_performance(&self, performance: PantryPerformance) -> Result<(), StoreError> {
        self.lock()?.performance = performance;
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError> {
        Ok(self.lock()?.patients.list())
    }

    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        Ok(self.lock()?.patients.insert_with(|id| patient.with_id(id)))
    }

    async fn update_patient(
        &self,
        id: EntityId,
        patient: NewPatient,
    ) -> Result<Option<Patient>, StoreError> {
        Ok(self
            .lock()?
            .patients
            .update(id, |existing| *existing = patient.with_id(id)))
    }

    async fn delete_patient(&self, id: EntityId) -> Result<bool, StoreError> {
        // Diet charts of the patient are left in place.
        Ok(self.lock()?.patients.remove(id))
    }

    async fn list_delivery_personnel(&self) -> Result<Vec<DeliveryPersonnel>, StoreError> {
        Ok(self.lock()?.personnel.list())
    }

    async fn create_delivery_personnel(
        &self,
        personnel: NewDeliveryPersonnel,
    ) -> Result<DeliveryPersonnel, StoreError> {
        Ok(self.lock()?.personnel.insert_with(|id| personnel.with_id(id)))
    }

    async fn list_meal_deliveries(&self) -> Result<Vec<MealDelivery>, StoreError> {
        Ok(self.lock()?.deliveries.list())
    }

    async fn update_meal_delivery(
        &self,
        id: EntityId,
        update: DeliveryUpdate,
    ) -> Result<Option<MealDelivery>, StoreError> {
        Ok(self
            .lock()?
            .deliveries
            .update(id, |delivery| update.apply(delivery)))
    }

    async fn assign_meal(
        &self,
        meal_id: EntityId,
        personnel_id: EntityId,
    ) -> Result<Option<MealDelivery>, StoreError> {
        Ok(self.lock()?.assign_meal(meal_id, personnel_id))
    }

    async fn list_preparation_tasks(&self) -> Result<Vec<MealPreparationTask>, StoreError> {
        Ok(self.lock()?.tasks.list())
    }

    async fn update_preparation_status(
        &self,
        id: EntityId,
        status: PreparationStatus,
    ) -> Result<Option<MealPreparationTask>, StoreError> {
        Ok(self.lock()?.tasks.update(id, |task| task.status = status))
    }

    async fn list_diet_charts(&self) -> Result<Vec<DietChart>, StoreError> {
        Ok(self.lock()?.diet_charts.list())
    }

    async fn create_diet_chart(&self, chart: NewDietChart) -> Result<DietChart, StoreError> {
        Ok(self.lock()?.diet_charts.insert_with(|id| chart.with_id(id)))
    }

    async fn update_diet_chart(
        &self,
        id: EntityId,
        chart: NewDietChart,
    ) -> Result<Option<DietChart>, StoreError> {
        Ok(self
            .lock()?
            .diet_charts
            .update(id, |existing| *existing = chart.with_id(id)))
    }

    async fn delete_diet_chart(&self, id: EntityId) -> Result<bool, StoreError> {
        Ok(self.lock()?.diet_charts.remove(id))
    }

    async fn pantry_performance(&self) -> Result<PantryPerformance, StoreError> {
        Ok(self.lock()?.performance)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealPlan, MealSlot};

    fn sample_patient(name: &str) -> NewPatient {
        NewPatient {
            name: name.into(),
            diseases: vec!["Hypertension".into()],
            allergies: vec![],
            room_number: "101".into(),
            bed_number: "A".into(),
            floor_number: "1".into(),
            age: 45,
            gender: Gender::Female,
            contact_info: "555-0200".into(),
            emergency_contact: "555-0201".into(),
        }
    }

    fn sample_chart(patient_id: EntityId) -> NewDietChart {
        let mut meals = MealPlan::default();
        let morning = meals.get_mut(MealSlot::Morning);
        morning.ingredients = vec!["oatmeal".into(), "banana".into()];
        morning.instructions = "no sugar".into();
        NewDietChart { patient_id, meals }
    }

    #[tokio::test]
    async fn seeded_delivery_is_assigned() {
        let store = InMemoryStore::seeded();
        let deliveries = store.list_meal_deliveries().await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].status, DeliveryStatus::Pending);
        assert_eq!(deliveries[0].assigned_to.as_deref(), Some("David Wilson"));
    }

    #[tokio::test]
    async fn created_patient_appears_in_list() {
        let store = InMemoryStore::empty();
        let created = store.create_patient(sample_patient("Mary")).await.unwrap();

        let patients = store.list_patients().await.unwrap();
        let found = patients.iter().find(|p| p.id == created.id).unwrap();
        assert_eq!(found.room_number, "101");
        assert_eq!(found.bed_number, "A");
        assert_eq!(found.floor_number, "1");
        assert_eq!(found.age, 45);
    }

    #[tokio::test]
    async fn created_ids_are_fresh() {
        let store = InMemoryStore::seeded();
        let before: Vec<EntityId> = store
            .list_patients()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        let created = store.create_patient(sample_patient("Mary")).await.unwrap();
        assert!(!before.contains(&created.id));
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::empty();
        let first = store.create_patient(sample_patient("A")).await.unwrap();
        let second = store.create_patient(sample_patient("B")).await.unwrap();
        assert!(store.delete_patient(first.id).await.unwrap());

        let third = store.create_patient(sample_patient("C")).await.unwrap();
        assert_ne!(third.id, second.id);
        assert_ne!(third.id, first.id);

        let ids: Vec<EntityId> = store
            .list_patients()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, third.id]);
    }

    #[tokio::test]
    async fn list_returns_a_copy() {
        let store = InMemoryStore::seeded();
        let mut listed = store.list_patients().await.unwrap();
        listed.clear();
        assert_eq!(store.list_patients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_ids_are_not_errors() {
        let store = InMemoryStore::seeded();
        assert!(!store.delete_patient(99).await.unwrap());
        assert!(!store.delete_diet_chart(99).await.unwrap());
        assert!(store
            .update_patient(99, sample_patient("X"))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_preparation_status(99, PreparationStatus::Completed)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_meal_delivery(99, DeliveryUpdate::status(DeliveryStatus::Delivered))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleted_patient_is_absent() {
        let store = InMemoryStore::seeded();
        assert!(store.delete_patient(1).await.unwrap());
        assert!(store.list_patients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_patient_keeps_diet_charts() {
        let store = InMemoryStore::seeded();
        store.create_diet_chart(sample_chart(1)).await.unwrap();
        store.delete_patient(1).await.unwrap();

        let charts = store.list_diet_charts().await.unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].patient_id, 1);
    }

    #[tokio::test]
    async fn diet_chart_keeps_ingredient_order() {
        let store = InMemoryStore::seeded();
        let chart = store.create_diet_chart(sample_chart(1)).await.unwrap();
        assert_eq!(chart.meals.morning.ingredients, vec!["oatmeal", "banana"]);
        assert_eq!(chart.meals.morning.instructions, "no sugar");
        assert_eq!(chart.meals.meals().len(), 3);
    }

    #[tokio::test]
    async fn update_diet_chart_replaces_plan() {
        let store = InMemoryStore::seeded();
        let chart = store.create_diet_chart(sample_chart(1)).await.unwrap();
        let mut replacement = sample_chart(1);
        replacement.meals.night.instructions = "warm milk".into();

        let updated = store
            .update_diet_chart(chart.id, replacement)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, chart.id);
        assert_eq!(updated.meals.night.instructions, "warm milk");
    }

    #[tokio::test]
    async fn preparation_status_update_changes_only_status() {
        let store = InMemoryStore::seeded();
        let before = store.list_preparation_tasks().await.unwrap()[1].clone();
        assert_eq!(before.status, PreparationStatus::InProgress);

        let after = store
            .update_preparation_status(2, PreparationStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.status, PreparationStatus::Completed);
        assert_eq!(after.patient_name, before.patient_name);
        assert_eq!(after.meal_type, before.meal_type);
        assert_eq!(after.diet_details, before.diet_details);
    }

    #[tokio::test]
    async fn repeated_status_update_is_idempotent() {
        let store = InMemoryStore::seeded();
        let update = DeliveryUpdate::status(DeliveryStatus::InProgress);
        let once = store.update_meal_delivery(1, update.clone()).await.unwrap();
        let twice = store.update_meal_delivery(1, update).await.unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.list_meal_deliveries().await.unwrap()[0], twice.unwrap());
    }

    #[tokio::test]
    async fn assign_sets_personnel_name_and_keeps_status() {
        let store = InMemoryStore::seeded();
        let delivery = store.assign_meal(1, 1).await.unwrap().unwrap();
        assert_eq!(delivery.assigned_display(), "David Wilson");
        assert_eq!(delivery.status, DeliveryStatus::Pending);
    }

    #[tokio::test]
    async fn assign_unknown_personnel_returns_none() {
        let store = InMemoryStore::seeded();
        assert!(store.assign_meal(1, 42).await.unwrap().is_none());
        assert!(store.assign_meal(42, 1).await.unwrap().is_none());
        let delivery = &store.list_meal_deliveries().await.unwrap()[0];
        assert_eq!(delivery.assigned_display(), "David Wilson");
    }

    #[tokio::test]
    async fn personnel_update_and_delete() {
        let store = InMemoryStore::seeded();
        let updated = store
            .update_delivery_personnel(
                1,
                NewDeliveryPersonnel {
                    name: "David W.".into(),
                    contact_info: "555-0999".into(),
                    other_details: "Zone B".into(),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.other_details, "Zone B");

        assert!(store.delete_delivery_personnel(1).unwrap());
        assert!(!store.delete_delivery_personnel(1).unwrap());
        assert!(store.list_delivery_personnel().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_restores_seed_and_counters() {
        let store = InMemoryStore::seeded();
        store.create_patient(sample_patient("Mary")).await.unwrap();
        store.delete_patient(1).await.unwrap();
        store
            .set_performance(PantryPerformance {
                meals_preparation_on_time: 50.0,
                ..PantryPerformance::baseline()
            })
            .unwrap();

        store.reset().unwrap();
        let patients = store.list_patients().await.unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].name, "John Doe");
        assert_eq!(
            store.pantry_performance().await.unwrap(),
            PantryPerformance::baseline()
        );
        let created = store.create_patient(sample_patient("Ann")).await.unwrap();
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn empty_store_has_no_entities() {
        let store = InMemoryStore::empty();
        assert!(store.list_meal_deliveries().await.unwrap().is_empty());
        assert!(store.list_preparation_tasks().await.unwrap().is_empty());
        assert!(store.list_delivery_personnel().await.unwrap().is_empty());
    }
}
