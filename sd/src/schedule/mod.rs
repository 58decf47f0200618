//! Availability table and slot resolution
//!
//! The [`AvailabilityStore`] is built once at startup (from the built-in table
//! or from the `[schedule]` config section) and shared read-only. The
//! [`SlotResolver`] answers "what is the first free slot on this day?" and is
//! the only thing the `get_next_time` tool talks to.

mod error;
mod resolver;
mod store;

#[cfg(test)]
mod proptests;

pub use error::ScheduleError;
pub use resolver::{Resolution, SlotResolver, normalize_day};
pub use store::{AvailabilityStore, OCCUPIED, SlotEntry};
