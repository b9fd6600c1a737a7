//! Party size

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of guests in a reservation, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestCount(NonZeroU32);

/// Why a party size was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuestCountError {
    #[error("guest count is empty")]
    Empty,
    #[error("guest count is not a whole number: {0}")]
    NotANumber(String),
    #[error("guest count must be greater than zero")]
    Zero,
}

impl GuestCount {
    pub fn new(count: u32) -> Result<Self, GuestCountError> {
        NonZeroU32::new(count).map(Self).ok_or(GuestCountError::Zero)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl FromStr for GuestCount {
    type Err = GuestCountError;

    /// Accepts a base-10 integer greater than zero, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(GuestCountError::Empty);
        }
        // Negative input is rejected here as well: u32 has no sign.
        let count: u32 = trimmed
            .parse()
            .map_err(|_| GuestCountError::NotANumber(trimmed.to_string()))?;
        Self::new(count)
    }
}

impl TryFrom<u32> for GuestCount {
    type Error = GuestCountError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GuestCount> for u32 {
    fn from(value: GuestCount) -> Self {
        value.get()
    }
}

impl fmt::Display for GuestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
