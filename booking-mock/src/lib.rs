//! booking-mock: in-memory stand-in for the reservation API
//!
//! Serves `GET /api/timeslots` and `POST /api/reservations` from a fixed
//! evening schedule with per-slot seat capacity, for demos and tests.

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod state;

pub use api::router;
pub use config::MockConfig;
pub use error::MockError;
pub use state::{MockState, SlotCapacity};
