//! Mock server errors
//!
//! Rendered as `{ "code": ..., "message": ... }` with a matching status.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Invalid request: {0}")]
    /// Bad input (400)
    InvalidRequest(String),

    #[error("Unknown time slot: {0}")]
    /// Slot label not on the schedule (400)
    UnknownSlot(String),

    #[error("Time slot {0} cannot seat this party")]
    /// Not enough seats left (409)
    SlotFull(String),

    #[error("Service unavailable")]
    /// Injected failure (503)
    Unavailable,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

impl MockError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnknownSlot(_) => StatusCode::BAD_REQUEST,
            Self::SlotFull(_) => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownSlot(_) => "unknown_slot",
            Self::SlotFull(_) => "slot_full",
            Self::Unavailable => "unavailable",
        }
    }
}

// 提取器失败也走 MockError，错误体保持 { code, message }
impl From<JsonRejection> for MockError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for MockError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Mock request failed");
        } else {
            tracing::debug!(error = %self, "Mock request rejected");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
