//! Requests the wizard asks its driver to perform, and their results

use std::fmt;

use shared::{GuestCount, ReservationRequest, TimeSlot};

use crate::ClientResult;

/// Identity of one in-flight request. Tickets only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the two network calls a ticket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchSlots,
    SubmitReservation,
}

impl Operation {
    /// Banner text when the call fails. The transport detail is not shown.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::FetchSlots => "Error fetching available times. Please try again.",
            Self::SubmitReservation => "Error making reservation. Please try again.",
        }
    }
}

/// A side effect requested by a wizard step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchSlots {
        ticket: Ticket,
        guests: GuestCount,
    },
    SubmitReservation {
        ticket: Ticket,
        request: ReservationRequest,
    },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::FetchSlots { ticket, .. } | Self::SubmitReservation { ticket, .. } => *ticket,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::FetchSlots { .. } => Operation::FetchSlots,
            Self::SubmitReservation { .. } => Operation::SubmitReservation,
        }
    }
}

/// Settled result of a command
#[derive(Debug)]
pub enum Outcome {
    Slots(ClientResult<Vec<TimeSlot>>),
    Reservation(ClientResult<serde_json::Value>),
}

impl Outcome {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Slots(_) => Operation::FetchSlots,
            Self::Reservation(_) => Operation::SubmitReservation,
        }
    }
}

/// An outcome tagged with the ticket of the command that produced it
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}
