//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when no override file is found.

/// System prompt for the scheduling assistant
pub const SCHEDULER: &str = include_str!("../../prompts/scheduler.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "scheduler" => Some(SCHEDULER),
        _ => None,
    }
}
