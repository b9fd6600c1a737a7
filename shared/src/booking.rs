//! Booking DTOs
//!
//! Request/response bodies of the `/timeslots` and `/reservations` endpoints.

use serde::{Deserialize, Serialize};

/// A bookable time label with its availability for a given party size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
}

impl TimeSlot {
    pub fn new(time: impl Into<String>, available: bool) -> Self {
        Self {
            time: time.into(),
            available,
        }
    }

    pub fn available(time: impl Into<String>) -> Self {
        Self::new(time, true)
    }

    pub fn unavailable(time: impl Into<String>) -> Self {
        Self::new(time, false)
    }
}

/// Body of `POST /reservations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub name: String,
    pub phone: String,
    pub guests: u32,
    pub time_slot: String,
}

/// Body returned by the mock server for a stored reservation
///
/// The client keeps whatever JSON the server returns and does not
/// interpret it, so real servers are free to answer with another shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreated {
    pub id: uuid::Uuid,
    pub name: String,
    pub phone: String,
    pub guests: u32,
    pub time_slot: String,
}

impl ReservationCreated {
    pub fn from_request(request: ReservationRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: request.name,
            phone: request.phone,
            guests: request.guests,
            time_slot: request.time_slot,
        }
    }
}
