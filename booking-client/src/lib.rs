//! Booking Client - restaurant reservation wizard
//!
//! A headless state machine that walks a guest through party size, time
//! slot, contact details and confirmation, plus the HTTP transports and
//! drivers that carry out the two requests it asks for.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod wizard;

pub use client::{BookingApi, HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use client::OneshotHttpClient;
pub use config::ClientConfig;
pub use driver::{BackgroundDriver, BookingSession, execute};
pub use error::{ClientError, ClientResult, ValidationError, WizardError, WizardResult};
pub use wizard::{
    BookingDraft, BookingWizard, Command, Completion, Confirmation, Operation, Outcome, Ticket,
    WizardStep,
};

// 重新导出 shared 类型
pub use shared::{GuestCount, ReservationRequest, TimeSlot};
