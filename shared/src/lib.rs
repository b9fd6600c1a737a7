//! Shared types for the booking workspace
//!
//! Wire DTOs exchanged between `booking-client` and the reservation API
//! (and its in-memory mock).

pub mod booking;
pub mod guests;

// 重新导出
pub use booking::{ReservationCreated, ReservationRequest, TimeSlot};
pub use guests::{GuestCount, GuestCountError};
pub use serde::{Deserialize, Serialize};
