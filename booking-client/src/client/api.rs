// booking-client/src/client/api.rs
// 预订 API 接口

use std::sync::Arc;

use async_trait::async_trait;
use shared::{GuestCount, ReservationRequest, TimeSlot};

use crate::ClientResult;

pub(crate) const RESERVATIONS_PATH: &str = "reservations";

pub(crate) fn time_slots_path(guests: GuestCount) -> String {
    format!("timeslots?guests={}", guests)
}

/// The two calls the booking wizard needs from the server.
///
/// Any non-2xx answer is an error; the wizard does not distinguish a
/// refusal from an unreachable server.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET {base}/timeslots?guests={n}`
    async fn time_slots(&self, guests: GuestCount) -> ClientResult<Vec<TimeSlot>>;

    /// `POST {base}/reservations`, returning the server's JSON body untouched
    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> ClientResult<serde_json::Value>;
}

#[async_trait]
impl<A: BookingApi + ?Sized> BookingApi for Arc<A> {
    async fn time_slots(&self, guests: GuestCount) -> ClientResult<Vec<TimeSlot>> {
        (**self).time_slots(guests).await
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> ClientResult<serde_json::Value> {
        (**self).create_reservation(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slots_path_carries_guest_count() {
        let guests = GuestCount::new(4).unwrap();
        assert_eq!(time_slots_path(guests), "timeslots?guests=4");
    }
}
