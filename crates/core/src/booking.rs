//! Booking status constants and price computation.
//!
//! A stay is charged per started day: the span between check-in and
//! check-out is divided by one day and rounded up, then multiplied by the
//! listing's nightly price.

use crate::dates::parse_date;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Status assigned to every new booking.
pub const BOOKING_STATUS_PENDING: &str = "pending";

/// Message shown when a stay's dates are unusable.
pub const INVALID_DATES_MESSAGE: &str = "Invalid dates";

/// A validated check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Stay {
    /// Parse both ends of a stay. Fails when either date is unparseable or
    /// when `end` is not strictly after `start`.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        let start = parse_date(start).ok_or(CoreError::InvalidDates)?;
        let end = parse_date(end).ok_or(CoreError::InvalidDates)?;
        Self::new(start, end)
    }

    /// Build a stay from already-parsed timestamps.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::InvalidDates);
        }
        Ok(Self { start, end })
    }

    /// Number of billable days: `ceil((end - start) / 1 day)`. Always >= 1.
    pub fn days(&self) -> i64 {
        let span_ms = (self.end - self.start).num_milliseconds();
        // span_ms > 0 is guaranteed by construction.
        (span_ms + MS_PER_DAY - 1) / MS_PER_DAY
    }

    /// Total price for this stay at the given nightly price.
    pub fn total_price(&self, nightly_price: f64) -> f64 {
        nightly_price * self.days() as f64
    }
}
