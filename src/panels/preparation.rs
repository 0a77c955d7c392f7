use std::sync::Arc;

use super::{replace_row, Lifecycle, PanelError, PanelState};
use crate::client::ResourceClient;
use crate::models::{EntityId, MealPreparationTask, PreparationStatus};

const FETCH_FAILED: &str = "Failed to fetch meal preparation tasks. Please try again later.";
const UPDATE_FAILED: &str = "Failed to update meal preparation status. Please try again.";

/// Pantry panel moving preparation tasks between statuses.
pub struct PreparationPanel {
    client: ResourceClient,
    state: PanelState,
    tasks: Vec<MealPreparationTask>,
}

impl PreparationPanel {
    pub fn new(client: ResourceClient) -> Self {
        Self {
            client,
            state: PanelState::default(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(client: ResourceClient, tasks: Vec<MealPreparationTask>) -> Self {
        Self {
            state: PanelState::ready(),
            tasks,
            ..Self::new(client)
        }
    }

    pub(crate) fn within(client: ResourceClient, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            state: PanelState::sharing(lifecycle),
            ..Self::new(client)
        }
    }

    pub fn replace_rows(&mut self, tasks: Vec<MealPreparationTask>) {
        self.tasks = tasks;
        self.state.mark_loaded();
    }

    pub fn tasks(&self) -> &[MealPreparationTask] {
        &self.tasks
    }

    /// Options of the per-row status select.
    pub fn status_options(&self) -> &'static [PreparationStatus] {
        PreparationStatus::ALL
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.state.lifecycle()
    }

    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        self.tasks = self
            .state
            .fetch(FETCH_FAILED, self.client.list_preparation_tasks())
            .await?;
        Ok(())
    }

    /// Any status may follow any other.
    pub async fn update_status(
        &mut self,
        id: EntityId,
        status: PreparationStatus,
    ) -> Result<MealPreparationTask, PanelError> {
        let updated = self
            .state
            .call(
                UPDATE_FAILED,
                self.client.update_preparation_status(id, status),
            )
            .await?;
        let task = self.state.found(updated, "preparation task", id, UPDATE_FAILED)?;

        tracing::debug!(id, status = status.as_str(), "Preparation status updated");
        replace_row(&mut self.tasks, task.clone());
        Ok(task)
    }

    pub fn unmount(&self) {
        self.state.lifecycle().unmount();
    }
}
