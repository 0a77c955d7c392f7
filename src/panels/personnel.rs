use std::sync::Arc;

use super::{require, Lifecycle, PanelError, PanelState};
use crate::client::ResourceClient;
use crate::models::{DeliveryPersonnel, NewDeliveryPersonnel};

const FETCH_FAILED: &str = "Failed to fetch delivery personnel. Please try again later.";
const CREATE_FAILED: &str = "Failed to create delivery personnel. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelForm {
    pub name: String,
    pub contact_info: String,
    pub other_details: String,
}

impl PersonnelForm {
    pub fn to_new_personnel(&self) -> Result<NewDeliveryPersonnel, String> {
        Ok(NewDeliveryPersonnel {
            name: require(&self.name, "Name")?,
            contact_info: require(&self.contact_info, "Contact info")?,
            other_details: self.other_details.trim().to_string(),
        })
    }
}

/// Pantry panel listing delivery personnel. Unlike the other panels it
/// fetches its own rows when mounted.
pub struct PersonnelPanel {
    client: ResourceClient,
    state: PanelState,
    personnel: Vec<DeliveryPersonnel>,
    form: PersonnelForm,
}

impl PersonnelPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            personnel: Vec::new(),
            form: PersonnelForm::default(),
        }
    }

    /// Create the panel and load its list.
    pub async fn mount(client: ResourceClient) -> Self {
        let mut panel = Self::new(client);
        // A failed first load is shown through the banner.
        let _ = panel.refresh().await;
        panel
    }

    pub fn with_personnel(client: ResourceClient, personnel: Vec<DeliveryPersonnel>) -> Self {
        Self {
            state: PanelState::ready(),
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

    pub fn replace_rows(&mut self, personnel: Vec<DeliveryPersonnel>) {
        self.personnel = personnel;
        self.state.mark_loaded();
    }

    pub fn personnel(&self) -> &[DeliveryPersonnel] {
        &self.personnel
    }

    pub fn form(&self) -> &PersonnelForm {
        &self.form
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub fn edit(&mut self, change: impl FnOnce(&mut PersonnelForm)) {
        change(&mut self.form);
        self.state.clear_banner();
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.personnel = self
            .state
            .fetch(FETCH_FAILED, self.client.list_delivery_personnel())
            .await?;
        Ok(())
    }

    pub async fn create(&mut self) -> Result<DeliveryPersonnel, PanelError> {
        let body = self
            .form
            .to_new_personnel()
            .map_err(|message| self.state.reject(message))?;

        let person = self
            .state
            .call(CREATE_FAILED, self.client.create_delivery_personnel(body))
            .await?;

        tracing::info!(id = person.id, "Delivery personnel added");
        self.personnel.push(person.clone());
        self.form = PersonnelForm::default();
        Ok(person)
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::LoadState;
    use crate::store::testing::UnreachableStore;
    use crate::store::InMemoryStore;

    fn offline() -> ResourceClient {
        ResourceClient::new(Arc::new(InMemoryStore::seeded()))
    }

    #[tokio::test]
    async fn mount_loads_list() {
        let panel = PersonnelPanel::mount(offline()).await;
        assert_eq!(panel.state().load_state(), LoadState::Ready);
        assert_eq!(panel.personnel()[0].name, "David Wilson");
    }

    #[tokio::test]
    async fn mount_failure_shows_banner() {
        let panel = PersonnelPanel::mount(ResourceClient::new(Arc::new(UnreachableStore))).await;
        assert_eq!(panel.state().load_state(), LoadState::Failed);
        assert_eq!(panel.state().error(), Some(FETCH_FAILED));
        assert!(panel.personnel().is_empty());
    }

    #[tokio::test]
    async fn create_gets_fresh_id_and_clears_form() {
        let mut panel = PersonnelPanel::mount(offline()).await;
        panel.edit(|form| {
            form.name = "Ana Lima".into();
            form.contact_info = "555-0400".into();
        });

        let person = panel.create().await.unwrap();
        assert_ne!(person.id, 1);
        assert_eq!(panel.personnel().len(), 2);
        assert_eq!(panel.form(), &PersonnelForm::default());

        panel.refresh().await.unwrap();
        assert!(panel.personnel().iter().any(|p| p.id == person.id));
    }

    #[tokio::test]
    async fn missing_contact_is_rejected() {
        let mut panel = PersonnelPanel::new(offline());
        panel.edit(|form| form.name = "Ana Lima".into());
        let err = panel.create().await.unwrap_err();
        assert!(matches!(err, PanelError::Validation(ref m) if m == "Contact info is required"));
        assert_eq!(panel.form().name, "Ana Lima");
    }
}
