//! REST backend client.
//!
//! One request per store operation, JSON in and out. A 404 on an
//! update, assign or delete means the id is unknown and becomes
//! `Ok(None)` / `Ok(false)`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ResourceStore, StoreError};
use crate::models::{
    AssignMeal, DeliveryPersonnel, DeliveryUpdate, DietChart, EntityId, MealDelivery,
    MealPreparationTask, NewDeliveryPersonnel, NewDietChart, NewPatient, PantryPerformance,
    Patient, PreparationStatus, StatusUpdate,
};

/// HTTP client for the meal coordination backend.
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RemoteStore {
    /// Create a store pointing at `base_url`, with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_connect() {
            StoreError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            StoreError::Timeout(self.timeout_secs)
        } else {
            StoreError::Http(e.to_string())
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, StoreError> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        tracing::debug!(%method, path, "Backend request");
        request.send().await.map_err(|e| self.map_send_error(e))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Some(body)).await?;
        decode(response).await
    }

    async fn write_optional<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Some(body)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn delete(&self, path: &str) -> Result<bool, StoreError> {
        let response = self.send::<()>(Method::DELETE, path, None).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(backend_error(response).await);
        }
        Ok(true)
    }
}

async fn backend_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Backend { status, body }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    if !response.status().is_success() {
        return Err(backend_error(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl ResourceStore for RemoteStore {
    fn kind(&self) -> &'static str {
        "remote"
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError> {
        self.get("/patients").await
    }

    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        self.write(Method::POST, "/patients", &patient).await
    }

    async fn update_patient(
        &self,
        id: EntityId,
        patient: NewPatient,
    ) -> Result<Option<Patient>, StoreError> {
        self.write_optional(Method::PUT, &format!("/patients/{id}"), &patient)
            .await
    }

    async fn delete_patient(&self, id: EntityId) -> Result<bool, StoreError> {
        self.delete(&format!("/patients/{id}")).await
    }

    async fn list_delivery_personnel(&self) -> Result<Vec<DeliveryPersonnel>, StoreError> {
        self.get("/delivery-personnel").await
    }

    async fn create_delivery_personnel(
        &self,
        personnel: NewDeliveryPersonnel,
    ) -> Result<DeliveryPersonnel, StoreError> {
        self.write(Method::POST, "/delivery-personnel", &personnel)
            .await
    }

    async fn list_meal_deliveries(&self) -> Result<Vec<MealDelivery>, StoreError> {
        self.get("/meal-deliveries").await
    }

    async fn update_meal_delivery(
        &self,
        id: EntityId,
        update: DeliveryUpdate,
    ) -> Result<Option<MealDelivery>, StoreError> {
        self.write_optional(Method::PUT, &format!("/meal-deliveries/{id}"), &update)
            .await
    }

    async fn assign_meal(
        &self,
        meal_id: EntityId,
        personnel_id: EntityId,
    ) -> Result<Option<MealDelivery>, StoreError> {
        let body = AssignMeal {
            meal_id,
            personnel_id,
        };
        self.write_optional(Method::POST, "/assign-meal", &body).await
    }

    async fn list_preparation_tasks(&self) -> Result<Vec<MealPreparationTask>, StoreError> {
        self.get("/meal-preparation-tasks").await
    }

    async fn update_preparation_status(
        &self,
        id: EntityId,
        status: PreparationStatus,
    ) -> Result<Option<MealPreparationTask>, StoreError> {
        self.write_optional(
            Method::PUT,
            &format!("/meal-preparation-tasks/{id}"),
            &StatusUpdate { status },
        )
        .await
    }

    async fn list_diet_charts(&self) -> Result<Vec<DietChart>, StoreError> {
        self.get("/diet-charts").await
    }

    async fn create_diet_chart(&self, chart: NewDietChart) -> Result<DietChart, StoreError> {
        self.write(Method::POST, "/diet-charts", &chart).await
    }

    async fn update_diet_chart(
        &self,
        id: EntityId,
        chart: NewDietChart,
    ) -> Result<Option<DietChart>, StoreError> {
        self.write_optional(Method::PUT, &format!("/diet-charts/{id}"), &chart)
            .await
    }

    async fn delete_diet_chart(&self, id: EntityId) -> Result<bool, StoreError> {
        self.delete(&format!("/diet-charts/{id}")).await
    }

    async fn pantry_performance(&self) -> Result<PantryPerformance, StoreError> {
        self.get("/pantry-performance").await
    }
}
