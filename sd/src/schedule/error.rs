//! Schedule error types

use thiserror::Error;

/// Errors raised while building an availability table
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid slot entry '{entry}' for {day}: expected HH:MM or 'occupied'")]
    InvalidSlot { day: String, entry: String },

    #[error("Day '{day}' is defined more than once")]
    DuplicateDay { day: String },

    #[error("Day name must not be empty")]
    EmptyDayName,
}
