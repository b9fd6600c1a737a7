//! 客户端错误类型

use thiserror::Error;

use crate::wizard::WizardStep;

/// Transport error: the request never produced a usable 2xx JSON answer
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 请求失败（连接、超时、读取响应体）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx 响应体不是期望的 JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Local input checks. The display text is what the banner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid number of guests")]
    InvalidGuestCount,

    #[error("Please fill in all fields")]
    MissingContactFields,
}

/// Error returned by a wizard operation that was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Input rejected locally, no request was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request is still in flight
    #[error("A request is already in progress")]
    Busy,

    /// Operation does not belong to the current step
    #[error("Operation requires step {expected}, wizard is at {actual}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    /// Slot exists but cannot be booked for this party size
    #[error("Time slot {0} is not available")]
    SlotUnavailable(String),

    /// Slot label was not in the fetched list
    #[error("Time slot {0} was not offered")]
    UnknownSlot(String),

    /// Guest count or time missing when the reservation is assembled
    #[error("Reservation draft is incomplete")]
    IncompleteDraft,
}

/// Result type for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;
