use std::sync::Arc;

use super::{split_list, Lifecycle, PanelError, PanelState};
use crate::client::ResourceClient;
use crate::models::{DietChart, EntityId, MealPlan, MealSlot, NewDietChart, Patient};

const FETCH_FAILED: &str = "Failed to fetch diet charts. Please try again later.";
const CREATE_FAILED: &str = "Failed to create diet chart. Please try again.";
const DELETE_FAILED: &str = "Failed to delete diet chart. Please try again.";

/// Text typed for one meal slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealDraft {
    /// Comma-separated.
    pub ingredients: String,
    pub instructions: String,
}

/// Draft of the "create diet chart" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DietChartForm {
    pub patient_id: Option<EntityId>,
    pub morning: MealDraft,
    pub evening: MealDraft,
    pub night: MealDraft,
}

impl DietChartForm {
    pub fn slot(&self, slot: MealSlot) -> &MealDraft {
        match slot {
            MealSlot::Morning => &self.morning,
            MealSlot::Evening => &self.evening,
            MealSlot::Night => &self.night,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut MealDraft {
        match slot {
            MealSlot::Morning => &mut self.morning,
            MealSlot::Evening => &mut self.evening,
            MealSlot::Night => &mut self.night,
        }
    }

    pub fn to_new_chart(&self) -> Result<NewDietChart, String> {
        let patient_id = self
            .patient_id
            .ok_or_else(|| "Select a patient".to_string())?;

        let mut meals = MealPlan::default();
        for &slot in MealSlot::ALL {
            let draft = self.slot(slot);
            let ingredients = split_list(&draft.ingredients);
            if ingredients.is_empty() {
                return Err(format!("{} ingredients are required", slot.display_name()));
            }
            let instructions = draft.instructions.trim();
            if instructions.is_empty() {
                return Err(format!("{} instructions are required", slot.display_name()));
            }
            let entry = meals.get_mut(slot);
            entry.ingredients = ingredients;
            entry.instructions = instructions.to_string();
        }

        Ok(NewDietChart { patient_id, meals })
    }
}

/// Manager panel for diet charts.
pub struct DietChartPanel {
    client: ResourceClient,
    state: PanelState,
    charts: Vec<DietChart>,
    patients: Vec<Patient>,
    form: DietChartForm,
}

impl DietChartPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            charts: Vec::new(),
            patients: Vec::new(),
            form: DietChartForm::default(),
        }
    }

    pub fn with_rows(client: ResourceClient, charts: Vec<DietChart>, patients: Vec<Patient>) -> Self {
        Self {
            state: PanelState::ready(),
            charts,
            patients,
            ..Self::new(client)
        }
    }

    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    /// Take rows fetched by a dashboard. A selected patient that is gone
    /// is cleared; the rest of the draft stays.
    pub fn replace_rows(&mut self, charts: Vec<DietChart>, patients: Vec<Patient>) {
        self.charts = charts;
        self.set_patients(patients);
        self.state.mark_loaded();
    }

    pub fn charts(&self) -> &[DietChart] {
        &self.charts
    }

    /// Patients offered in the patient select.
    pub fn patient_options(&self) -> &[Patient] {
        &self.patients
    }

    pub fn set_patients(&mut self, patients: Vec<Patient>) {
        if let Some(id) = self.form.patient_id {
            if !patients.iter().any(|p| p.id == id) {
                self.form.patient_id = None;
            }
        }
        self.patients = patients;
    }

    /// Name shown in the chart list, or the raw id if the patient is gone.
    pub fn patient_label(&self, patient_id: EntityId) -> String {
        self.patients
            .iter()
            .find(|p| p.id == patient_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Patient #{patient_id}"))
    }

    pub fn form(&self) -> &DietChartForm {
        &self.form
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub fn edit(&mut self, change: impl FnOnce(&mut DietChartForm)) {
        change(&mut self.form);
        self.state.clear_banner();
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.charts = self
            .state
            .fetch(FETCH_FAILED, self.client.list_diet_charts())
            .await?;
        Ok(())
    }

    pub async fn create(&mut self) -> Result<DietChart, PanelError> {
        let body = self
            .form
            .to_new_chart()
            .map_err(|message| self.state.reject(message))?;

        let chart = self
            .state
            .call(CREATE_FAILED, self.client.create_diet_chart(body))
            .await?;

        tracing::info!(id = chart.id, patient_id = chart.patient_id, "Diet chart created");
        self.charts.push(chart.clone());
        self.form = DietChartForm::default();
        Ok(chart)
    }

    pub async fn delete(&mut self, id: EntityId) -> Result<(), PanelError> {
        let deleted = self
            .state
            .call(DELETE_FAILED, self.client.delete_diet_chart(id))
            .await?;
        self.state
            .found(deleted.then_some(()), "diet chart", id, DELETE_FAILED)?;
        self.charts.retain(|c| c.id != id);
        Ok(())
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}
