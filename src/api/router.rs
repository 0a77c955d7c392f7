//! Dev API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::store::ResourceStore;

/// Build the REST surface over `store`.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn dev_api_router(store: Arc<dyn ResourceStore>) -> Router {
    let ctx = ApiContext::new(store);

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            put(endpoints::patients::update).delete(endpoints::patients::delete),
        )
        .route(
            "/delivery-personnel",
            get(endpoints::pantry::list_personnel).post(endpoints::pantry::create_personnel),
        )
        .route("/meal-deliveries", get(endpoints::deliveries::list))
        .route("/meal-deliveries/:id", put(endpoints::deliveries::update))
        .route("/assign-meal", post(endpoints::deliveries::assign))
        .route("/meal-preparation-tasks", get(endpoints::pantry::list_tasks))
        .route(
            "/meal-preparation-tasks/:id",
            put(endpoints::pantry::update_task),
        )
        .route(
            "/diet-charts",
            get(endpoints::diet_charts::list).post(endpoints::diet_charts::create),
        )
        .route(
            "/diet-charts/:id",
            put(endpoints::diet_charts::update).delete(endpoints::diet_charts::delete),
        )
        .route("/pantry-performance", get(endpoints::pantry::performance))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::store::InMemoryStore;

    fn app() -> Router {
        dev_api_router(Arc::new(InMemoryStore::seeded()))
    }

    fn make_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_of(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_store_kind() {
        let response = app()
            .oneshot(make_request("GET", "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
    }

    #[tokio::test]
    async fn lists_seeded_patients_in_camel_case() {
        let response = app()
            .oneshot(make_request("GET", "/patients", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json[0]["name"], "John Doe");
        assert!(json[0]["roomNumber"].is_string());
    }

    #[tokio::test]
    async fn create_patient_returns_201() {
        let body = json!({
            "name": "Mary Major", "diseases": [], "allergies": ["Shellfish"],
            "roomNumber": "101", "bedNumber": "A", "floorNumber": "1", "age": 45,
            "gender": "female", "contactInfo": "555-0300", "emergencyContact": "555-0301"
        });
        let response = app()
            .oneshot(make_request("POST", "/patients", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_of(response).await;
        assert_eq!(json["id"], 2);
        assert_eq!(json["bedNumber"], "A");
    }

    #[tokio::test]
    async fn delete_missing_patient_is_404() {
        let response = app()
            .oneshot(make_request("DELETE", "/patients/99", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_existing_patient_is_204() {
        let response = app()
            .oneshot(make_request("DELETE", "/patients/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn uppercase_delivery_status_is_rejected() {
        let response = app()
            .oneshot(make_request(
                "PUT",
                "/meal-deliveries/1",
                Some(json!({ "status": "COMPLETED" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn assign_meal_sets_personnel_name() {
        let response = app()
            .oneshot(make_request(
                "POST",
                "/assign-meal",
                Some(json!({ "mealId": 1, "personnelId": 1 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["assignedTo"], "David Wilson");
        assert_eq!(json["status"], "pending");
    }

    #[tokio::test]
    async fn diet_chart_with_two_meals_is_rejected() {
        let body = json!({
            "patientId": 1,
            "meals": [
                { "type": "MORNING", "ingredients": ["oatmeal"], "instructions": "" },
                { "type": "NIGHT", "ingredients": ["soup"], "instructions": "" }
            ]
        });
        let response = app()
            .oneshot(make_request("POST", "/diet-charts", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preparation_status_update() {
        let response = app()
            .oneshot(make_request(
                "PUT",
                "/meal-preparation-tasks/2",
                Some(json!({ "status": "completed" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["status"], "completed");
        assert_eq!(json["patientName"], "Jane Smith");
    }

    #[tokio::test]
    async fn performance_snapshot() {
        let response = app()
            .oneshot(make_request("GET", "/pantry-performance", None))
            .await
            .unwrap();
        let json = json_of(response).await;
        assert_eq!(json["deliverySuccessRate"], 98.0);
    }

    #[tokio::test]
    async fn non_numeric_id_is_structured_400() {
        let response = app()
            .oneshot(make_request("DELETE", "/patients/abc", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].is_string());

        let response = app()
            .oneshot(make_request(
                "PUT",
                "/meal-preparation-tasks/first",
                Some(json!({ "status": "completed" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app()
            .oneshot(make_request("GET", "/nonexistent", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
