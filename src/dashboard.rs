//! Dashboards: fetch several collections at once, then hand the rows
//! to their panels.
//!
//! A load commits only when every fetch succeeded. If any fails, the
//! dashboard shows one banner and its panels keep their rows. A
//! successful load swaps rows in place, so drafts and banners survive.
//!
//! Child panels share the dashboard's `Lifecycle`: unmounting the
//! dashboard, or any of its panels, cancels every pending call.

use std::sync::Arc;

use crate::client::ResourceClient;
use crate::models::PantryPerformance;
use crate::panels::{
    DeliveryOverviewPanel, DeliveryRoundPanel, DeliveryTrackingPanel, DietChartPanel, Lifecycle,
    PanelError, PanelState, PatientPanel, PersonnelPanel, PreparationPanel,
};

const MANAGER_LOAD_FAILED: &str = "Failed to fetch dashboard data. Please try again later.";
const PANTRY_LOAD_FAILED: &str = "Failed to fetch pantry dashboard data. Please try again later.";
const DELIVERY_LOAD_FAILED: &str = "Failed to fetch meal deliveries";

// ═══════════════════════════════════════════════════════════
// Manager
// ═══════════════════════════════════════════════════════════

/// Patients, diet charts and the delivery overview.
pub struct ManagerDashboard {
    client: ResourceClient,
    state: PanelState,
    pub patients: PatientPanel,
    pub diet_charts: DietChartPanel,
    pub deliveries: DeliveryOverviewPanel,
    performance: Option<PantryPerformance>,
}

impl ManagerDashboard {
    pub fn new(client: ResourceClient) -> Self {
        let state = PanelState::default();
        let lifecycle = state.lifecycle();
        Self {
            patients: PatientPanel::within(client.clone(), lifecycle.clone()),
            diet_charts: DietChartPanel::within(client.clone(), lifecycle.clone()),
            deliveries: DeliveryOverviewPanel::within(client.clone(), lifecycle),
            performance: None,
            state,
            client,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Shared with the child panels.
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub fn performance(&self) -> Option<&PantryPerformance> {
        self.performance.as_ref()
    }

    pub async fn load(&mut self) -> Result<(), PanelError> {
        let client = &self.client;
        let (patients, charts, deliveries, performance) = self
            .state
            .fetch(MANAGER_LOAD_FAILED, async move {
                tokio::try_join!(
                    client.list_patients(),
                    client.list_diet_charts(),
                    client.list_meal_deliveries(),
                    client.pantry_performance()
                )
            })
            .await?;

        tracing::debug!(
            patients = patients.len(),
            diet_charts = charts.len(),
            deliveries = deliveries.len(),
            "Manager dashboard loaded"
        );
        self.diet_charts.replace_rows(charts, patients.clone());
        self.patients.replace_rows(patients);
        self.deliveries.replace_rows(deliveries);
        self.performance = Some(performance);
        Ok(())
    }

    /// Copy the patient list into the diet chart patient select.
    pub fn sync_patient_options(&mut self) {
        self.diet_charts
            .set_patients(self.patients.patients().to_vec());
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

// ═══════════════════════════════════════════════════════════
// Pantry
// ═══════════════════════════════════════════════════════════

/// Preparation tasks, delivery tracking and personnel.
pub struct PantryDashboard {
    client: ResourceClient,
    state: PanelState,
    pub preparation: PreparationPanel,
    pub tracking: DeliveryTrackingPanel,
    pub personnel: PersonnelPanel,
}

impl PantryDashboard {
    pub fn new(client: ResourceClient) -> Self {
        let state = PanelState::default();
        let lifecycle = state.lifecycle();
        Self {
            preparation: PreparationPanel::within(client.clone(), lifecycle.clone()),
            tracking: DeliveryTrackingPanel::within(client.clone(), lifecycle.clone()),
            personnel: PersonnelPanel::within(client.clone(), lifecycle),
            state,
            client,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Shared with the child panels.
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub async fn load(&mut self) -> Result<(), PanelError> {
        let client = &self.client;
        let (tasks, personnel, deliveries) = self
            .state
            .fetch(PANTRY_LOAD_FAILED, async move {
                tokio::try_join!(
                    client.list_preparation_tasks(),
                    client.list_delivery_personnel(),
                    client.list_meal_deliveries()
                )
            })
            .await?;

        self.preparation.replace_rows(tasks);
        self.tracking.replace_rows(deliveries, personnel.clone());
        self.personnel.replace_rows(personnel);
        Ok(())
    }

    /// Offer newly added personnel in the assignment select.
    pub fn sync_personnel(&mut self) {
        self.tracking
            .set_personnel(self.personnel.personnel().to_vec());
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

// ═══════════════════════════════════════════════════════════
// Delivery
// ═══════════════════════════════════════════════════════════

pub struct DeliveryDashboard {
    client: ResourceClient,
    state: PanelState,
    pub round: DeliveryRoundPanel,
}

impl DeliveryDashboard {
    pub fn new(client: ResourceClient) -> Self {
        let state = PanelState::default();
        Self {
            round: DeliveryRoundPanel::within(client.clone(), state.lifecycle()),
            state,
            client,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Shared with the child panels.
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub async fn load(&mut self) -> Result<(), PanelError> {
        let deliveries = self
            .state
            .fetch(DELIVERY_LOAD_FAILED, self.client.list_meal_deliveries())
            .await?;
        self.round.replace_rows(deliveries);
        Ok(())
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}
