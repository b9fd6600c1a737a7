// booking-client/src/client/http.rs
// HTTP 客户端 - 网络通信

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{GuestCount, ReservationRequest, TimeSlot};

use super::api::{BookingApi, RESERVATIONS_PATH, time_slots_path};
use crate::{ClientConfig, ClientError, ClientResult};

/// JSON-over-HTTP transport
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
}

/// 解析 2xx 响应体，非 JSON 或结构不符视为无效响应
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Network HTTP client (reqwest)
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base URL is empty".into()));
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.bytes().await?;
        decode_json(&body)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }
}

#[async_trait]
impl BookingApi for NetworkHttpClient {
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

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = NetworkHttpClient::new(&ClientConfig::new("http://localhost:3000/api/")).unwrap();
        assert_eq!(
            client.url("timeslots?guests=2"),
            "http://localhost:3000/api/timeslots?guests=2"
        );
        assert_eq!(
            client.url("/reservations"),
            "http://localhost:3000/api/reservations"
        );
    }

    #[test]
    fn test_decode_json_rejects_non_json_body() {
        let slots: Vec<TimeSlot> =
            decode_json(br#"[{"time":"18:00","available":true}]"#).unwrap();
        assert_eq!(slots, vec![TimeSlot::available("18:00")]);

        let err = decode_json::<Vec<TimeSlot>>(b"<html>ok</html>").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        // Valid JSON of the wrong shape
        let err = decode_json::<Vec<TimeSlot>>(br#"{"slots":[]}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_empty_base_url_is_a_config_error() {
        let err = NetworkHttpClient::new(&ClientConfig::new("  ")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::new(format!("http://{}/api", addr)).with_timeout(2);
        let client = NetworkHttpClient::new(&config).unwrap();

        let err = client
            .time_slots(GuestCount::new(2).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
