//! Resource client: one method per backend operation.
//!
//! Every call goes to the primary store first. When a fallback store is
//! configured (development mode) and the primary fails, the call is
//! repeated against the fallback after a simulated latency. Without a
//! fallback the failure reaches the caller as a single `ClientError`.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::config::{AppConfig, RunMode};
use crate::models::{
    DeliveryPersonnel, DeliveryStatus, DeliveryUpdate, DietChart, EntityId, MealDelivery,
    MealPreparationTask, NewDeliveryPersonnel, NewDietChart, NewPatient, PantryPerformance,
    Patient, PreparationStatus,
};
use crate::store::{InMemoryStore, RemoteStore, ResourceStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{operation} failed: {source}")]
    Request {
        operation: &'static str,
        source: StoreError,
    },
    #[error("Client setup failed: {0}")]
    Setup(StoreError),
}

impl ClientError {
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Request { operation, .. } => Some(operation),
            Self::Setup(_) => None,
        }
    }
}

/// Strategy-configured access to the resource collections.
#[derive(Clone)]
pub struct ResourceClient {
    primary: Arc<dyn ResourceStore>,
    fallback: Option<Arc<InMemoryStore>>,
    fallback_latency: Duration,
}

impl ResourceClient {
    /// Client that only ever talks to `primary`.
    pub fn new(primary: Arc<dyn ResourceStore>) -> Self {
        Self {
            primary,
            fallback: None,
            fallback_latency: Duration::ZERO,
        }
    }

    /// Answer failed primary calls from `store`, after `latency`.
    pub fn with_fallback(mut self, store: Arc<InMemoryStore>, latency: Duration) -> Self {
        self.fallback = Some(store);
        self.fallback_latency = latency;
        self
    }

    /// Pick the store strategy for the configured run mode.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = match config.mode {
            RunMode::Offline => Self::new(Arc::new(InMemoryStore::seeded())),
            RunMode::Production => Self::new(Arc::new(remote(config)?)),
            RunMode::Development => Self::new(Arc::new(remote(config)?)).with_fallback(
                Arc::new(InMemoryStore::seeded()),
                config.fallback_latency,
            ),
        };
        tracing::info!(
            mode = config.mode.as_str(),
            primary = client.primary.kind(),
            fallback = client.fallback.is_some(),
            "Resource client configured"
        );
        Ok(client)
    }

    pub fn fallback_store(&self) -> Option<&Arc<InMemoryStore>> {
        self.fallback.as_ref()
    }

    async fn call<T, F>(&self, operation: &'static str, run: F) -> Result<T, ClientError>
    where
        F: for<'a> Fn(&'a dyn ResourceStore) -> BoxFuture<'a, Result<T, StoreError>>,
    {
        let err = match run(self.primary.as_ref()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            tracing::error!(operation, error = %err, "Resource request failed");
            return Err(ClientError::Request {
                operation,
                source: err,
            });
        };

        tracing::warn!(
            operation,
            error = %err,
            "Primary store failed, answering from in-memory fallback"
        );
        tokio::time::sleep(self.fallback_latency).await;
        let fallback: &dyn ResourceStore = fallback.as_ref();
        run(fallback).await.map_err(|source| {
            tracing::error!(operation, error = %source, "Fallback store failed");
            ClientError::Request { operation, source }
        })
    }

    // ── Patients ────────────────────────────────────────────

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        self.call("list patients", |store| store.list_patients())
            .await
    }

    pub async fn create_patient(&self, patient: NewPatient) -> Result<Patient, ClientError> {
        self.call("create patient", |store| {
            store.create_patient(patient.clone())
        })
        .await
    }

    pub async fn update_patient(
        &self,
        id: EntityId,
        patient: NewPatient,
    ) -> Result<Option<Patient>, ClientError> {
        self.call("update patient", |store| {
            store.update_patient(id, patient.clone())
        })
        .await
    }

    pub async fn delete_patient(&self, id: EntityId) -> Result<bool, ClientError> {
        self.call("delete patient", |store| store.delete_patient(id))
            .await
    }

    // ── Delivery personnel ──────────────────────────────────

    pub async fn list_delivery_personnel(&self) -> Result<Vec<DeliveryPersonnel>, ClientError> {
        self.call("list delivery personnel", |store| {
            store.list_delivery_personnel()
        })
        .await
    }

    pub async fn create_delivery_personnel(
        &self,
        personnel: NewDeliveryPersonnel,
    ) -> Result<DeliveryPersonnel, ClientError> {
        self.call("create delivery personnel", |store| {
            store.create_delivery_personnel(personnel.clone())
        })
        .await
    }

    // ── Meal deliveries ─────────────────────────────────────

    pub async fn list_meal_deliveries(&self) -> Result<Vec<MealDelivery>, ClientError> {
        self.call("list meal deliveries", |store| {
            store.list_meal_deliveries()
        })
        .await
    }

    pub async fn update_meal_delivery_status(
        &self,
        id: EntityId,
        status: DeliveryStatus,
    ) -> Result<Option<MealDelivery>, ClientError> {
        self.call("update meal delivery status", |store| {
            store.update_meal_delivery(id, DeliveryUpdate::status(status))
        })
        .await
    }

    /// Set the delivery to delivered and record the courier's notes.
    pub async fn mark_meal_delivered(
        &self,
        id: EntityId,
        notes: &str,
    ) -> Result<Option<MealDelivery>, ClientError> {
        self.call("mark meal delivered", |store| {
            store.update_meal_delivery(id, DeliveryUpdate::delivered_with_notes(notes))
        })
        .await
    }

    pub async fn assign_meal_to_personnel(
        &self,
        meal_id: EntityId,
        personnel_id: EntityId,
    ) -> Result<Option<MealDelivery>, ClientError> {
        self.call("assign meal to delivery personnel", |store| {
            store.assign_meal(meal_id, personnel_id)
        })
        .await
    }

    // ── Preparation tasks ───────────────────────────────────

    pub async fn list_preparation_tasks(&self) -> Result<Vec<MealPreparationTask>, ClientError> {
        self.call("list meal preparation tasks", |store| {
            store.list_preparation_tasks()
        })
        .await
    }

    pub async fn update_preparation_status(
        &self,
        id: EntityId,
        status: PreparationStatus,
    ) -> Result<Option<MealPreparationTask>, ClientError> {
        self.call("update meal preparation status", |store| {
            store.update_preparation_status(id, status)
        })
        .await
    }

    // ── Diet charts ─────────────────────────────────────────

    pub async fn list_diet_charts(&self) -> Result<Vec<DietChart>, ClientError> {
        self.call("list diet charts", |store| store.list_diet_charts())
            .await
    }

    pub async fn create_diet_chart(&self, chart: NewDietChart) -> Result<DietChart, ClientError> {
        self.call("create diet chart", |store| {
            store.create_diet_chart(chart.clone())
        })
        .await
    }

    pub async fn update_diet_chart(
        &self,
        id: EntityId,
        chart: NewDietChart,
    ) -> Result<Option<DietChart>, ClientError> {
        self.call("update diet chart", |store| {
            store.update_diet_chart(id, chart.clone())
        })
        .await
    }

    pub async fn delete_diet_chart(&self, id: EntityId) -> Result<bool, ClientError> {
        self.call("delete diet chart", |store| store.delete_diet_chart(id))
            .await
    }

    // ── Performance ─────────────────────────────────────────

    pub async fn pantry_performance(&self) -> Result<PantryPerformance, ClientError> {
        self.call("fetch pantry performance", |store| {
            store.pantry_performance()
        })
        .await
    }
}

fn remote(config: &AppConfig) -> Result<RemoteStore, ClientError> {
    RemoteStore::new(&config.api_base_url, config.request_timeout).map_err(ClientError::Setup)
}
