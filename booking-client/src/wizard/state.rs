//! Wizard steps

use std::fmt;

/// The step the booking flow is at. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    /// Asking for the party size
    #[default]
    CollectingGuests,
    /// Slots fetched, waiting for the guest to pick one
    SelectingTime,
    /// Asking for name and phone
    CollectingContact,
    /// Reservation accepted by the server
    Confirmed,
}

impl WizardStep {
    /// 1-based position in the flow
    pub fn number(self) -> u8 {
        match self {
            Self::CollectingGuests => 1,
            Self::SelectingTime => 2,
            Self::CollectingContact => 3,
            Self::Confirmed => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::CollectingGuests => "Number of Guests",
            Self::SelectingTime => "Select a Time",
            Self::CollectingContact => "Contact Details",
            Self::Confirmed => "Reservation Confirmed!",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectingGuests => "collecting_guests",
            Self::SelectingTime => "selecting_time",
            Self::CollectingContact => "collecting_contact",
            Self::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}
