use std::sync::Arc;

use super::{require, split_list, Lifecycle, PanelError, PanelState};
use crate::client::ResourceClient;
use crate::models::{EntityId, Gender, NewPatient, Patient};

const FETCH_FAILED: &str = "Failed to fetch patients. Please try again later.";
const CREATE_FAILED: &str = "Failed to create patient. Please try again.";
const CREATED: &str = "Patient created successfully!";
const DELETE_FAILED: &str = "Failed to delete patient. Please try again.";
const DELETED: &str = "Patient deleted successfully!";

/// Draft of the "add patient" form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    /// Comma-separated.
    pub diseases: String,
    /// Comma-separated.
    pub allergies: String,
    pub room_number: String,
    pub bed_number: String,
    pub floor_number: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub contact_info: String,
    pub emergency_contact: String,
}

impl PatientForm {
    /// Check required fields and build the request body.
    pub fn to_new_patient(&self) -> Result<NewPatient, String> {
        let age = self.age.trim();
        let age = age
            .parse::<u32>()
            .map_err(|_| format!("Age must be a whole number, got {age:?}"))?;

        Ok(NewPatient {
            name: require(&self.name, "Name")?,
            diseases: split_list(&self.diseases),
            allergies: split_list(&self.allergies),
            room_number: require(&self.room_number, "Room number")?,
            bed_number: require(&self.bed_number, "Bed number")?,
            floor_number: require(&self.floor_number, "Floor number")?,
            age,
            gender: self.gender.ok_or_else(|| "Gender is required".to_string())?,
            contact_info: require(&self.contact_info, "Contact info")?,
            emergency_contact: require(&self.emergency_contact, "Emergency contact")?,
        })
    }
}

/// Manager panel for registering and removing patients.
pub struct PatientPanel {
    client: ResourceClient,
    state: PanelState,
    patients: Vec<Patient>,
    form: PatientForm,
}

impl PatientPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            patients: Vec::new(),
            form: PatientForm::default(),
        }
    }

    /// Panel showing rows already fetched by a dashboard.
    pub fn with_patients(client: ResourceClient, patients: Vec<Patient>) -> Self {
        Self {
            state: PanelState::ready(),
            patients,
            ..Self::new(client)
        }
    }

    /// Panel whose calls are cancelled with `lifecycle`.
    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    /// Take rows fetched by a dashboard. The draft and banner stay.
    pub fn replace_rows(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
        self.state.mark_loaded();
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    /// Change the draft. Typing dismisses the current banner.
    pub fn edit(&mut self, change: impl FnOnce(&mut PatientForm)) {
        change(&mut self.form);
        self.state.clear_banner();
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        let rows = self
            .state
            .fetch(FETCH_FAILED, self.client.list_patients())
            .await?;
        self.patients = rows;
        Ok(())
    }

    /// Submit the draft. The form is cleared only once the patient exists.
    pub async fn create(&mut self) -> Result<Patient, PanelError> {
        let body = self
            .form
            .to_new_patient()
            .map_err(|message| self.state.reject(message))?;

        let created = self
            .state
            .call(CREATE_FAILED, self.client.create_patient(body))
            .await?;

        tracing::info!(id = created.id, "Patient created");
        self.patients.push(created.clone());
        self.form = PatientForm::default();
        self.state.succeed(CREATED);
        Ok(created)
    }

    pub async fn delete(&mut self, id: EntityId) -> Result<(), PanelError> {
        let deleted = self
            .state
            .call(DELETE_FAILED, self.client.delete_patient(id))
            .await?;
        self.state
            .found(deleted.then_some(()), "patient", id, DELETE_FAILED)?;

        // Diet charts of the patient are left in place.
        self.patients.retain(|p| p.id != id);
        self.state.succeed(DELETED);
        Ok(())
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::{Banner, LoadState};
    use crate::store::testing::UnreachableStore;
    use crate::store::InMemoryStore;
    use std::time::Duration;

    fn filled_form() -> PatientForm {
        PatientForm {
            name: "Mary Major".into(),
            diseases: "Asthma, Anemia".into(),
            allergies: "".into(),
            room_number: "101".into(),
            bed_number: "A".into(),
            floor_number: "1".into(),
            age: "45".into(),
            gender: Some(Gender::Female),
            contact_info: "555-0300".into(),
            emergency_contact: "555-0301".into(),
        }
    }

    fn offline_panel() -> PatientPanel {
        PatientPanel::new(ResourceClient::new(Arc::new(InMemoryStore::seeded())))
    }

    fn broken_panel() -> PatientPanel {
        PatientPanel::new(ResourceClient::new(Arc::new(UnreachableStore)))
    }

    #[test]
    fn form_builds_request_body() {
        let body = filled_form().to_new_patient().unwrap();
        assert_eq!(body.diseases, vec!["Asthma", "Anemia"]);
        assert!(body.allergies.is_empty());
        assert_eq!(body.age, 45);
    }

    #[test]
    fn form_requires_fields() {
        let mut form = filled_form();
        form.bed_number = " ".into();
        assert_eq!(form.to_new_patient().unwrap_err(), "Bed number is required");

        let mut form = filled_form();
        form.gender = None;
        assert_eq!(form.to_new_patient().unwrap_err(), "Gender is required");

        let mut form = filled_form();
        form.age = "forty".into();
        assert!(form.to_new_patient().is_err());
    }

    #[tokio::test]
    async fn refresh_loads_rows() {
        let mut panel = offline_panel();
        assert_eq!(panel.state().load_state(), LoadState::Idle);
        panel.refresh().await.unwrap();
        assert_eq!(panel.state().load_state(), LoadState::Ready);
        assert_eq!(panel.patients()[0].name, "John Doe");
        assert!(panel.state().last_loaded().is_some());
    }

    #[tokio::test]
    async fn create_appends_and_resets_form() {
        let mut panel = offline_panel();
        panel.refresh().await.unwrap();
        panel.edit(|form| *form = filled_form());

        let created = panel.create().await.unwrap();
        assert_eq!(panel.patients().len(), 2);
        assert_eq!(panel.patients()[1], created);
        assert_eq!(
            (created.room_number.as_str(), created.bed_number.as_str()),
            ("101", "A")
        );
        assert_eq!(created.floor_number, "1");
        assert_eq!(created.age, 45);
        assert_eq!(panel.form(), &PatientForm::default());
        assert_eq!(
            panel.state().banner(),
            Some(&Banner::Success(CREATED.to_string()))
        );
    }

    #[tokio::test]
    async fn failed_create_keeps_draft_and_rows() {
        let mut panel = broken_panel();
        panel.edit(|form| *form = filled_form());

        let err = panel.create().await.unwrap_err();
        assert!(matches!(err, PanelError::Request(_)));
        assert_eq!(panel.form(), &filled_form());
        assert!(panel.patients().is_empty());
        assert_eq!(panel.state().error(), Some(CREATE_FAILED));
        assert!(!panel.state().is_busy());
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let mut panel = offline_panel();
        let err = panel.create().await.unwrap_err();
        assert!(matches!(err, PanelError::Validation(_)));
        assert!(panel.state().error().is_some());

        panel.edit(|form| form.name = "A".into());
        assert_eq!(panel.state().banner(), None);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_prior_rows() {
        let rows = vec![filled_form().to_new_patient().unwrap().with_id(3)];
        let client = ResourceClient::new(Arc::new(UnreachableStore));
        let mut panel = PatientPanel::with_patients(client, rows.clone());

        assert!(panel.refresh().await.is_err());
        assert_eq!(panel.patients(), rows.as_slice());
        assert_eq!(panel.state().load_state(), LoadState::Failed);
        assert_eq!(panel.state().error(), Some(FETCH_FAILED));
    }

    #[tokio::test]
    async fn delete_removes_row_after_confirmation() {
        let mut panel = offline_panel();
        panel.refresh().await.unwrap();
        panel.delete(1).await.unwrap();
        assert!(panel.patients().is_empty());
        assert_eq!(panel.state().banner().map(Banner::message), Some(DELETED));
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let mut panel = offline_panel();
        panel.refresh().await.unwrap();
        let err = panel.delete(99).await.unwrap_err();
        assert!(matches!(err, PanelError::NotFound("patient", 99)));
        assert_eq!(panel.patients().len(), 1);
    }

    #[tokio::test]
    async fn unmount_discards_late_result() {
        let fallback = Arc::new(InMemoryStore::seeded());
        let client = ResourceClient::new(Arc::new(UnreachableStore))
            .with_fallback(fallback, Duration::from_millis(300));
        let mut panel = PatientPanel::new(client);
        let lifecycle = panel.lifecycle();

        let (result, ()) = tokio::join!(panel.refresh(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            lifecycle.unmount();
        });
        assert!(matches!(result, Err(PanelError::Cancelled)));
        assert!(panel.patients().is_empty());
        assert_eq!(panel.state().banner(), None);
    }
}
