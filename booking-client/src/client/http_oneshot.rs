// booking-client/src/client/http_oneshot.rs
// Oneshot HTTP 客户端 - 内存调用
//
// 需要启用 "in-process" feature

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde::de::DeserializeOwned;
use shared::{GuestCount, ReservationRequest, TimeSlot};
use tower::ServiceExt;

use super::api::{BookingApi, RESERVATIONS_PATH, time_slots_path};
use super::http::{HttpClient, decode_json};
use crate::{ClientError, ClientResult};

/// Path prefix the reservation API is mounted under
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Oneshot HTTP client (in-memory calls)
///
/// Drives an axum Router through Tower's `oneshot`, for running the wizard
/// against a server in the same process without a socket.
///
/// # Example
///
/// ```ignore
/// let client = OneshotHttpClient::new(booking_mock::router(state));
/// let slots = client.time_slots(GuestCount::new(2)?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    base_path: String,
}

impl OneshotHttpClient {
    /// # Arguments
    /// * `router` - a Router with its state already applied
    pub fn new(router: Router) -> Self {
        Self {
            router,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Mount point of the API inside the router ("" for the root)
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    fn uri(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path.trim_start_matches('/'))
    }

    fn build_request(&self, method: Method, path: &str, body: Body) -> ClientResult<Request<Body>> {
        Request::builder()
            .method(method)
            .uri(self.uri(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body_bytes).into_owned(),
            });
        }

        decode_json(&body_bytes)
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(Method::GET, path, Body::empty())?;
        self.execute(request).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body_bytes = serde_json::to_vec(body)?;
        let request = self.build_request(Method::POST, path, Body::from(body_bytes))?;
        self.execute(request).await
    }
}

#[async_trait]
impl BookingApi for OneshotHttpClient {
    async fn time_slots(&self, guests: GuestCount) -> ClientResult<Vec<TimeSlot>> {
        self.get(&time_slots_path(guests)).await
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> ClientResult<serde_json::Value> {
        self.post(RESERVATIONS_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::{get, post};

    fn router() -> Router {
        Router::new()
            .route(
                "/api/timeslots",
                get(|| async { Json(vec![TimeSlot::available("18:00")]) }),
            )
            .route(
                "/api/reservations",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            )
            .route("/plain/timeslots", get(|| async { "all good" }))
    }

    #[tokio::test]
    async fn test_get_decodes_json_body() {
        let client = OneshotHttpClient::new(router());
        let slots = client.time_slots(GuestCount::new(2).unwrap()).await.unwrap();
        assert_eq!(slots, vec![TimeSlot::available("18:00")]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let client = OneshotHttpClient::new(router());
        let request = ReservationRequest {
            name: "Alex".into(),
            phone: "555-1234".into(),
            guests: 2,
            time_slot: "18:00".into(),
        };

        let err = client.create_reservation(&request).await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_json_is_invalid_response() {
        let client = OneshotHttpClient::new(router()).with_base_path("/plain");
        let err = client
            .time_slots(GuestCount::new(2).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_base_path_is_configurable() {
        let client = OneshotHttpClient::new(router()).with_base_path("/missing/");
        let err = client
            .time_slots(GuestCount::new(1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }
}
