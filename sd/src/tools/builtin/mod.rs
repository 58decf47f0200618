//! Built-in tools for the scheduling assistant

mod next_slot;

pub use next_slot::{DAY_OF_WEEK, NextSlotTool};
