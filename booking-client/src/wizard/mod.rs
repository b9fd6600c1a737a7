//! Booking wizard state machine.
//!
//! The wizard never performs I/O. Steps that need the server return a
//! [`Command`]; whoever runs it (see [`crate::driver`]) feeds the result
//! back through [`BookingWizard::apply`].
//!
//! ```text
//! CollectingGuests --submit_guest_count--> (FetchSlots) --ok--> SelectingTime
//! SelectingTime    --select_time---------> CollectingContact
//! CollectingContact--submit_contact------> (SubmitReservation) --ok--> Confirmed
//! any step         --reset---------------> CollectingGuests
//! ```
//!
//! Rules:
//! - At most one request is in flight; other operations return
//!   [`WizardError::Busy`] until it settles. `reset` is always allowed.
//! - Only the completion carrying the in-flight ticket is applied. After a
//!   reset the old ticket is forgotten, so a late answer cannot touch the
//!   new session.
//! - The error banner is cleared whenever a new attempt starts.

mod command;
mod draft;
mod state;

pub use command::{Command, Completion, Operation, Outcome, Ticket};
pub use draft::{BookingDraft, Confirmation};
pub use state::WizardStep;

use shared::{GuestCount, TimeSlot};

use crate::error::{ValidationError, WizardError, WizardResult};

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
    operation: Operation,
}

/// Restaurant booking wizard
#[derive(Debug, Default)]
pub struct BookingWizard {
    step: WizardStep,
    draft: BookingDraft,
    slots: Vec<TimeSlot>,
    error: Option<String>,
    confirmation: Option<Confirmation>,
    in_flight: Option<InFlight>,
    last_ticket: u64,
}

impl BookingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 只读访问 ==========

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Slots from the last successful fetch, in server order
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Banner message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ticket of the request currently awaited
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.map(|f| f.ticket)
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    // ========== Step 1: 人数 ==========

    /// Validates the party size and asks for the matching slots.
    ///
    /// The wizard stays in `CollectingGuests` (loading) until the fetch
    /// settles; it moves to `SelectingTime` only on success.
    pub fn submit_guest_count(&mut self, input: &str) -> WizardResult<Command> {
        self.ensure_idle()?;
        self.ensure_step(WizardStep::CollectingGuests)?;
        self.clear_error();

        let guests: GuestCount = match input.parse() {
            Ok(guests) => guests,
            Err(e) => {
                tracing::debug!(input, error = %e, "Rejected guest count");
                return Err(self.reject(ValidationError::InvalidGuestCount));
            }
        };

        self.draft.set_guest_count(guests);
        self.slots.clear();
        let ticket = self.begin(Operation::FetchSlots);
        tracing::debug!(%ticket, guests = guests.get(), "Fetching time slots");
        Ok(Command::FetchSlots { ticket, guests })
    }

    // ========== Step 2: 时间段 ==========

    /// Picks one of the fetched slots. Unavailable or unknown labels are
    /// refused without touching the step or the banner.
    pub fn select_time(&mut self, time: &str) -> WizardResult<()> {
        self.ensure_idle()?;
        self.ensure_step(WizardStep::SelectingTime)?;

        let slot = self
            .slots
            .iter()
            .find(|slot| slot.time == time)
            .ok_or_else(|| WizardError::UnknownSlot(time.to_string()))?;
        if !slot.available {
            return Err(WizardError::SlotUnavailable(time.to_string()));
        }

        self.clear_error();
        self.draft.set_selected_time(time);
        self.transition(WizardStep::CollectingContact);
        Ok(())
    }

    // ========== Step 3: 联系方式 ==========

    /// Stores name and phone and, when both are present, asks for the
    /// reservation to be submitted.
    pub fn submit_contact(&mut self, name: &str, phone: &str) -> WizardResult<Command> {
        self.ensure_idle()?;
        self.ensure_step(WizardStep::CollectingContact)?;
        self.clear_error();

        self.draft.set_contact(name, phone);
        if self.draft.contact_name().is_empty() || self.draft.contact_phone().is_empty() {
            return Err(self.reject(ValidationError::MissingContactFields));
        }

        let request = self.draft.to_request().ok_or(WizardError::IncompleteDraft)?;
        let ticket = self.begin(Operation::SubmitReservation);
        tracing::debug!(%ticket, time_slot = %request.time_slot, "Submitting reservation");
        Ok(Command::SubmitReservation { ticket, request })
    }

    // ========== Step 4 / 任意步骤 ==========

    /// Starts over: draft, slots, banner and confirmation are cleared and
    /// the in-flight request, if any, is abandoned.
    ///
    /// Returns the abandoned ticket so the driver can cancel it.
    pub fn reset(&mut self) -> Option<Ticket> {
        let abandoned = self.in_flight.take().map(|f| f.ticket);
        if let Some(ticket) = abandoned {
            tracing::debug!(%ticket, "Abandoning in-flight request");
        }
        self.draft = BookingDraft::default();
        self.slots.clear();
        self.error = None;
        self.confirmation = None;
        self.transition(WizardStep::CollectingGuests);
        abandoned
    }

    // ========== 请求结果 ==========

    /// Applies a settled request. Returns `false` when the completion was
    /// stale and ignored.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Some(in_flight) = self.in_flight else {
            tracing::debug!(ticket = %completion.ticket, "Dropping completion, nothing in flight");
            return false;
        };
        if in_flight.ticket != completion.ticket {
            tracing::debug!(
                ticket = %completion.ticket,
                current = %in_flight.ticket,
                "Dropping stale completion"
            );
            return false;
        }
        if in_flight.operation != completion.outcome.operation() {
            tracing::warn!(
                ticket = %completion.ticket,
                expected = ?in_flight.operation,
                got = ?completion.outcome.operation(),
                "Completion does not match the in-flight operation"
            );
            return false;
        }

        self.in_flight = None;
        match completion.outcome {
            Outcome::Slots(Ok(slots)) => {
                tracing::debug!(count = slots.len(), "Time slots received");
                self.slots = slots;
                self.transition(WizardStep::SelectingTime);
            }
            Outcome::Slots(Err(e)) => {
                tracing::warn!(error = %e, "Failed to fetch time slots");
                self.slots.clear();
                self.error = Some(Operation::FetchSlots.failure_message().to_string());
            }
            Outcome::Reservation(Ok(receipt)) => self.confirm(receipt),
            Outcome::Reservation(Err(e)) => {
                tracing::warn!(error = %e, "Failed to make reservation");
                self.error = Some(Operation::SubmitReservation.failure_message().to_string());
            }
        }
        true
    }

    // ========== 内部方法 ==========

    fn confirm(&mut self, receipt: serde_json::Value) {
        let draft = &self.draft;
        let (Some(guests), Some(time)) = (draft.guest_count(), draft.selected_time()) else {
            // submit_contact 只为完整的草稿发出命令
            tracing::warn!("Reservation accepted for an incomplete draft");
            return;
        };
        let confirmation = Confirmation {
            name: draft.contact_name().to_string(),
            guests,
            time: time.to_string(),
            phone: draft.contact_phone().to_string(),
            receipt,
        };
        tracing::info!(
            guests = guests.get(),
            time_slot = %confirmation.time,
            "Reservation confirmed"
        );
        self.confirmation = Some(confirmation);
        self.transition(WizardStep::Confirmed);
    }

    fn begin(&mut self, operation: Operation) -> Ticket {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.in_flight = Some(InFlight { ticket, operation });
        ticket
    }

    fn transition(&mut self, to: WizardStep) {
        if self.step != to {
            tracing::debug!(from = %self.step, %to, "Wizard step");
        }
        self.step = to;
    }

    fn reject(&mut self, error: ValidationError) -> WizardError {
        self.error = Some(error.to_string());
        error.into()
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn ensure_idle(&self) -> WizardResult<()> {
        match self.in_flight {
            Some(_) => Err(WizardError::Busy),
            None => Ok(()),
        }
    }

    fn ensure_step(&self, expected: WizardStep) -> WizardResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}
