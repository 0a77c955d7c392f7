//! The three views of meal deliveries.
//!
//! - `DeliveryTrackingPanel`: pantry staff set status and assign personnel.
//! - `DeliveryOverviewPanel`: the manager filters and relabels deliveries
//!   using `DeliveryLabel`, converted to `DeliveryStatus` at the boundary.
//! - `DeliveryRoundPanel`: delivery personnel record notes and mark
//!   meals delivered.

use std::collections::HashMap;
use std::sync::Arc;

use super::{replace_row, Lifecycle, PanelError, PanelState};
use crate::client::ResourceClient;
use crate::models::{
    DeliveryFilter, DeliveryLabel, DeliveryPersonnel, DeliveryStatus, EntityId, MealDelivery,
};

// ═══════════════════════════════════════════════════════════
// Pantry: tracking
// ═══════════════════════════════════════════════════════════

const TRACKING_FETCH_FAILED: &str = "Failed to fetch data. Please try again later.";
const TRACKING_STATUS_FAILED: &str = "Failed to update meal delivery status. Please try again.";
const ASSIGN_FAILED: &str = "Failed to assign delivery personnel. Please try again.";

pub struct DeliveryTrackingPanel {
    client: ResourceClient,
    state: PanelState,
    deliveries: Vec<MealDelivery>,
    personnel: Vec<DeliveryPersonnel>,
}

impl DeliveryTrackingPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            deliveries: Vec::new(),
            personnel: Vec::new(),
        }
    }

    pub fn with_rows(
        client: ResourceClient,
        deliveries: Vec<MealDelivery>,
        personnel: Vec<DeliveryPersonnel>,
    ) -> Self {
        Self {
            state: PanelState::ready(),
            deliveries,
            personnel,
            ..Self::new(client)
        }
    }

    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    pub fn replace_rows(
        &mut self,
        deliveries: Vec<MealDelivery>,
        personnel: Vec<DeliveryPersonnel>,
    ) {
        self.deliveries = deliveries;
        self.personnel = personnel;
        self.state.mark_loaded();
    }

    pub fn deliveries(&self) -> &[MealDelivery] {
        &self.deliveries
    }

    /// Choices of the "assign" select.
    pub fn personnel(&self) -> &[DeliveryPersonnel] {
        &self.personnel
    }

    pub fn set_personnel(&mut self, personnel: Vec<DeliveryPersonnel>) {
        self.personnel = personnel;
    }

    pub fn status_options(&self) -> &'static [DeliveryStatus] {
        DeliveryStatus::ALL
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    /// Fetch deliveries and personnel together. Neither list changes
    /// unless both arrive.
    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        let client = &self.client;
        let (deliveries, personnel) = self
            .state
            .fetch(TRACKING_FETCH_FAILED, async move {
                tokio::try_join!(
                    client.list_meal_deliveries(),
                    client.list_delivery_personnel()
                )
            })
            .await?;
        self.deliveries = deliveries;
        self.personnel = personnel;
        Ok(())
    }

    pub async fn update_status(
        &mut self,
        id: EntityId,
        status: DeliveryStatus,
    ) -> Result<MealDelivery, PanelError> {
        let updated = self
            .state
            .call(
                TRACKING_STATUS_FAILED,
                self.client.update_meal_delivery_status(id, status),
            )
            .await?;
        let delivery = self
            .state
            .found(updated, "meal delivery", id, TRACKING_STATUS_FAILED)?;
        replace_row(&mut self.deliveries, delivery.clone());
        Ok(delivery)
    }

    /// Assign a courier. The delivery keeps its status.
    pub async fn assign(
        &mut self,
        meal_id: EntityId,
        personnel_id: EntityId,
    ) -> Result<MealDelivery, PanelError> {
        let updated = self
            .state
            .call(
                ASSIGN_FAILED,
                self.client.assign_meal_to_personnel(meal_id, personnel_id),
            )
            .await?;
        let delivery = self
            .state
            .found(updated, "meal delivery or personnel", meal_id, ASSIGN_FAILED)?;

        tracing::info!(
            meal_id,
            personnel_id,
            assigned_to = delivery.assigned_display(),
            "Delivery assigned"
        );
        replace_row(&mut self.deliveries, delivery.clone());
        Ok(delivery)
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

// ═══════════════════════════════════════════════════════════
// Manager: overview
// ═══════════════════════════════════════════════════════════

const OVERVIEW_FETCH_FAILED: &str = "Failed to fetch meal deliveries. Please try again later.";
const OVERVIEW_STATUS_FAILED: &str = "Failed to update delivery status. Please try again.";

pub struct DeliveryOverviewPanel {
    client: ResourceClient,
    state: PanelState,
    deliveries: Vec<MealDelivery>,
    filter: DeliveryFilter,
}

impl DeliveryOverviewPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            deliveries: Vec::new(),
            filter: DeliveryFilter::All,
        }
    }

    pub fn with_deliveries(client: ResourceClient, deliveries: Vec<MealDelivery>) -> Self {
        Self {
            state: PanelState::ready(),
            deliveries,
            ..Self::new(client)
        }
    }

    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    /// Take rows fetched by a dashboard. The filter stays.
    pub fn replace_rows(&mut self, deliveries: Vec<MealDelivery>) {
        self.deliveries = deliveries;
        self.state.mark_loaded();
    }

    pub fn deliveries(&self) -> &[MealDelivery] {
        &self.deliveries
    }

    pub fn filter(&self) -> DeliveryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: DeliveryFilter) {
        self.filter = filter;
    }

    /// Rows passing the current filter.
    pub fn visible(&self) -> Vec<&MealDelivery> {
        self.deliveries
            .iter()
            .filter(|d| self.filter.matches(d.status))
            .collect()
    }

    pub fn label_of(delivery: &MealDelivery) -> DeliveryLabel {
        delivery.status.into()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.deliveries = self
            .state
            .fetch(OVERVIEW_FETCH_FAILED, self.client.list_meal_deliveries())
            .await?;
        Ok(())
    }

    pub async fn update_status(
        &mut self,
        id: EntityId,
        label: DeliveryLabel,
    ) -> Result<MealDelivery, PanelError> {
        let status = DeliveryStatus::from(label);
        let updated = self
            .state
            .call(
                OVERVIEW_STATUS_FAILED,
                self.client.update_meal_delivery_status(id, status),
            )
            .await?;
        let delivery = self
            .state
            .found(updated, "meal delivery", id, OVERVIEW_STATUS_FAILED)?;
        replace_row(&mut self.deliveries, delivery.clone());
        Ok(delivery)
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

// ═══════════════════════════════════════════════════════════
// Delivery personnel: round
// ═══════════════════════════════════════════════════════════

const ROUND_FETCH_FAILED: &str = "Failed to fetch meal deliveries";
const ROUND_DELIVER_FAILED: &str = "Failed to update delivery status";

pub struct DeliveryRoundPanel {
    client: ResourceClient,
    state: PanelState,
    deliveries: Vec<MealDelivery>,
    drafts: HashMap<EntityId, String>,
}

impl DeliveryRoundPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            deliveries: Vec::new(),
            drafts: HashMap::new(),
        }
    }

    pub fn with_deliveries(client: ResourceClient, deliveries: Vec<MealDelivery>) -> Self {
        Self {
            state: PanelState::ready(),
            deliveries,
            ..Self::new(client)
        }
    }

    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    /// Take rows fetched by a dashboard. Drafts survive for deliveries
    /// still on the list.
    pub fn replace_rows(&mut self, deliveries: Vec<MealDelivery>) {
        self.drafts
            .retain(|id, _| deliveries.iter().any(|d| d.id == *id));
        self.deliveries = deliveries;
        self.state.mark_loaded();
    }

    pub fn deliveries(&self) -> &[MealDelivery] {
        &self.deliveries
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    /// Notes typed for `id`, falling back to the stored notes.
    pub fn notes_draft(&self, id: EntityId) -> &str {
        if let Some(draft) = self.drafts.get(&id) {
            return draft;
        }
        self.deliveries
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.notes.as_str())
            .unwrap_or_default()
    }

    pub fn edit_notes(&mut self, id: EntityId, notes: impl Into<String>) {
        self.drafts.insert(id, notes.into());
        self.state.clear_banner();
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.deliveries = self
            .state
            .fetch(ROUND_FETCH_FAILED, self.client.list_meal_deliveries())
            .await?;
        Ok(())
    }

    /// Mark delivered with the drafted notes. The draft survives a failure.
    pub async fn mark_delivered(&mut self, id: EntityId) -> Result<MealDelivery, PanelError> {
        let notes = self.notes_draft(id).to_string();
        let updated = self
            .state
            .call(
                ROUND_DELIVER_FAILED,
                self.client.mark_meal_delivered(id, &notes),
            )
            .await?;
        let delivery = self
            .state
            .found(updated, "meal delivery", id, ROUND_DELIVER_FAILED)?;

        tracing::info!(id, "Meal delivered");
        self.drafts.remove(&id);
        replace_row(&mut self.deliveries, delivery.clone());
        Ok(delivery)
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}
