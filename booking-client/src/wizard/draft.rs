//! Draft and confirmation records

use std::fmt;

use shared::{GuestCount, ReservationRequest};

/// In-progress reservation data, filled in step by step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    guest_count: Option<GuestCount>,
    selected_time: Option<String>,
    contact_name: String,
    contact_phone: String,
}

impl BookingDraft {
    pub fn guest_count(&self) -> Option<GuestCount> {
        self.guest_count
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    /// True when no field has been filled in
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn set_guest_count(&mut self, guests: GuestCount) {
        self.guest_count = Some(guests);
    }

    pub(crate) fn set_selected_time(&mut self, time: impl Into<String>) {
        self.selected_time = Some(time.into());
    }

    pub(crate) fn set_contact(&mut self, name: &str, phone: &str) {
        self.contact_name = name.trim().to_string();
        self.contact_phone = phone.trim().to_string();
    }

    /// Wire body for `POST /reservations`, once every field is present
    pub(crate) fn to_request(&self) -> Option<ReservationRequest> {
        if self.contact_name.is_empty() || self.contact_phone.is_empty() {
            return None;
        }
        Some(ReservationRequest {
            name: self.contact_name.clone(),
            phone: self.contact_phone.clone(),
            guests: self.guest_count?.get(),
            time_slot: self.selected_time.clone()?,
        })
    }
}

/// Summary of an accepted reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub name: String,
    pub guests: GuestCount,
    pub time: String,
    pub phone: String,
    /// Body returned by the server, kept as-is
    pub receipt: serde_json::Value,
}

impl Confirmation {
    /// The "Reservation Details" lines shown on the confirmation screen
    pub fn summary_lines(&self) -> [String; 4] {
        [
            format!("Name: {}", self.name),
            format!("Number of Guests: {}", self.guests),
            format!("Time: {}", self.time),
            format!("Phone: {}", self.phone),
        ]
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary_lines().join("\n"))
    }
}
