//! 内存中的预订簿

use std::sync::atomic::{AtomicBool, Ordering};

use shared::{GuestCount, ReservationCreated, ReservationRequest, TimeSlot};
use tokio::sync::RwLock;

use crate::error::MockError;

/// First and last slot of the default evening schedule, in minutes
const SCHEDULE_START: u32 = 17 * 60;
const SCHEDULE_END: u32 = 21 * 60 + 30;
const SCHEDULE_STEP: u32 = 30;

/// Seats per slot in the default schedule
pub const DEFAULT_SEATS_PER_SLOT: u32 = 12;

/// A time slot and the seats still free in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCapacity {
    pub time: String,
    pub seats_left: u32,
}

impl SlotCapacity {
    pub fn new(time: impl Into<String>, seats_left: u32) -> Self {
        Self {
            time: time.into(),
            seats_left,
        }
    }
}

/// Shared state behind the mock router
#[derive(Debug)]
pub struct MockState {
    slots: RwLock<Vec<SlotCapacity>>,
    reservations: RwLock<Vec<ReservationCreated>>,
    fail_time_slots: AtomicBool,
    fail_reservations: AtomicBool,
}

impl MockState {
    pub fn new(slots: Vec<SlotCapacity>) -> Self {
        Self {
            slots: RwLock::new(slots),
            reservations: RwLock::new(Vec::new()),
            fail_time_slots: AtomicBool::new(false),
            fail_reservations: AtomicBool::new(false),
        }
    }

    /// 17:00 to 21:30 every 30 minutes, `seats` seats each
    pub fn schedule(seats: u32) -> Vec<SlotCapacity> {
        (SCHEDULE_START..=SCHEDULE_END)
            .step_by(SCHEDULE_STEP as usize)
            .map(|minutes| {
                SlotCapacity::new(format!("{:02}:{:02}", minutes / 60, minutes % 60), seats)
            })
            .collect()
    }

    /// Force `GET /timeslots` to answer 503
    pub fn fail_time_slots(&self, fail: bool) {
        self.fail_time_slots.store(fail, Ordering::SeqCst);
    }

    /// Force `POST /reservations` to answer 503
    pub fn fail_reservations(&self, fail: bool) {
        self.fail_reservations.store(fail, Ordering::SeqCst);
    }

    /// Every slot, available when it can still seat the whole party
    pub async fn time_slots(&self, guests: GuestCount) -> Result<Vec<TimeSlot>, MockError> {
        if self.fail_time_slots.load(Ordering::SeqCst) {
            return Err(MockError::Unavailable);
        }
        let slots = self.slots.read().await;
        Ok(slots
            .iter()
            .map(|slot| TimeSlot::new(slot.time.clone(), slot.seats_left >= guests.get()))
            .collect())
    }

    /// Books seats for the request
    pub async fn reserve(
        &self,
        request: ReservationRequest,
    ) -> Result<ReservationCreated, MockError> {
        if self.fail_reservations.load(Ordering::SeqCst) {
            return Err(MockError::Unavailable);
        }
        if request.name.trim().is_empty() || request.phone.trim().is_empty() {
            return Err(MockError::InvalidRequest("name and phone are required".into()));
        }
        let guests = GuestCount::new(request.guests)
            .map_err(|e| MockError::InvalidRequest(e.to_string()))?;

        let mut slots = self.slots.write().await;
        let slot = slots
            .iter_mut()
            .find(|slot| slot.time == request.time_slot)
            .ok_or_else(|| MockError::UnknownSlot(request.time_slot.clone()))?;
        if slot.seats_left < guests.get() {
            return Err(MockError::SlotFull(request.time_slot));
        }
        slot.seats_left -= guests.get();
        drop(slots);

        let created = ReservationCreated::from_request(request);
        tracing::info!(
            id = %created.id,
            guests = created.guests,
            time_slot = %created.time_slot,
            "Reservation stored"
        );
        self.reservations.write().await.push(created.clone());
        Ok(created)
    }

    pub async fn reservations(&self) -> Vec<ReservationCreated> {
        self.reservations.read().await.clone()
    }

    pub async fn seats_left(&self, time: &str) -> Option<u32> {
        self.slots
            .read()
            .await
            .iter()
            .find(|slot| slot.time == time)
            .map(|slot| slot.seats_left)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(Self::schedule(DEFAULT_SEATS_PER_SLOT))
    }
}
