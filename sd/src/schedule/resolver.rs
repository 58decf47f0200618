//! SlotResolver - first free slot lookup

use std::fmt;
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::debug;

use super::AvailabilityStore;

/// Normalize a day name for lookup: trimmed and lowercased (Unicode-aware)
pub fn normalize_day(day: &str) -> String {
    day.trim().to_lowercase()
}

/// Outcome of resolving a day against the availability table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The earliest non-occupied slot of the day
    FirstAvailable { day: String, time: NaiveTime },

    /// Every slot of the day is taken
    FullyBooked { day: String },

    /// Day missing from the table, or present with no slots
    UnknownDay { day: String },
}

impl Resolution {
    /// Normalized day this resolution is about
    pub fn day(&self) -> &str {
        match self {
            Resolution::FirstAvailable { day, .. } | Resolution::FullyBooked { day } | Resolution::UnknownDay { day } => {
                day
            }
        }
    }

    /// Customer-facing sentence handed back to the model
    pub fn message(&self) -> String {
        match self {
            Resolution::FirstAvailable { day, time } => {
                format!("The first available slot for {} is {}.", day, time.format("%H:%M"))
            }
            Resolution::FullyBooked { day } => {
                format!("{} is fully booked, please choose another day.", day)
            }
            Resolution::UnknownDay { day } => {
                format!("No slots defined for {} or day name invalid.", day)
            }
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Resolves weekday names against a shared, read-only availability table
#[derive(Debug, Clone)]
pub struct SlotResolver {
    store: Arc<AvailabilityStore>,
}

impl SlotResolver {
    pub fn new(store: Arc<AvailabilityStore>) -> Self {
        debug!(day_count = store.len(), "SlotResolver::new: called");
        Self { store }
    }

    /// Find the first free slot for `day`
    ///
    /// Total over all inputs and free of side effects.
    pub fn resolve(&self, day: &str) -> Resolution {
        let day = normalize_day(day);
        debug!(%day, "SlotResolver::resolve: called");

        let slots = match self.store.slots_for(&day) {
            Some(slots) if !slots.is_empty() => slots,
            _ => {
                debug!(%day, "SlotResolver::resolve: unknown or empty day");
                return Resolution::UnknownDay { day };
            }
        };

        match slots.iter().find_map(|slot| slot.time()) {
            Some(time) => {
                debug!(%day, %time, "SlotResolver::resolve: found free slot");
                Resolution::FirstAvailable { day, time }
            }
            None => {
                debug!(%day, "SlotResolver::resolve: fully booked");
                Resolution::FullyBooked { day }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::SlotEntry;

    fn resolver_with(table: Vec<(&str, Vec<SlotEntry>)>) -> SlotResolver {
        SlotResolver::new(Arc::new(AvailabilityStore::new(table).unwrap()))
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_resolve_skips_occupied_slots() {
        let resolver = resolver_with(vec![(
            "wednesday",
            vec![SlotEntry::Free(time(9, 0)), SlotEntry::Occupied, SlotEntry::Free(time(13, 0))],
        )]);

        assert_eq!(
            resolver.resolve("wednesday"),
            Resolution::FirstAvailable {
                day: "wednesday".to_string(),
                time: time(9, 0)
            }
        );
    }

    #[test]
    fn test_resolve_first_free_after_occupied() {
        let resolver = SlotResolver::new(Arc::new(AvailabilityStore::builtin()));

        let resolution = resolver.resolve("tuesday");
        assert_eq!(resolution.message(), "The first available slot for tuesday is 16:00.");
    }

    #[test]
    fn test_resolve_fully_booked() {
        let resolver = resolver_with(vec![("friday", vec![SlotEntry::Occupied, SlotEntry::Occupied])]);

        let resolution = resolver.resolve("friday");
        assert_eq!(
            resolution,
            Resolution::FullyBooked {
                day: "friday".to_string()
            }
        );
        assert_eq!(resolution.message(), "friday is fully booked, please choose another day.");
    }

    #[test]
    fn test_resolve_unknown_day() {
        let resolver = SlotResolver::new(Arc::new(AvailabilityStore::builtin()));

        let resolution = resolver.resolve("someday");
        assert_eq!(
            resolution,
            Resolution::UnknownDay {
                day: "someday".to_string()
            }
        );
        assert_eq!(resolution.message(), "No slots defined for someday or day name invalid.");
    }

    #[test]
    fn test_resolve_empty_day_is_unknown() {
        let resolver = resolver_with(vec![("sunday", vec![])]);

        assert!(matches!(resolver.resolve("sunday"), Resolution::UnknownDay { .. }));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolver = resolver_with(vec![("quinta-feira", vec![SlotEntry::Free(time(15, 0))])]);

        let upper = resolver.resolve("Quinta-Feira");
        let lower = resolver.resolve("quinta-feira");
        assert_eq!(upper, lower);
        assert!(matches!(upper, Resolution::FirstAvailable { .. }));
        assert_eq!(upper.day(), "quinta-feira");
    }

    #[test]
    fn test_resolve_non_ascii_case_folding() {
        let resolver = resolver_with(vec![("terça-feira", vec![SlotEntry::Free(time(16, 0))])]);

        assert!(matches!(resolver.resolve("TERÇA-FEIRA"), Resolution::FirstAvailable { .. }));
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let resolver = SlotResolver::new(Arc::new(AvailabilityStore::builtin()));

        assert_eq!(resolver.resolve("  Monday\n"), resolver.resolve("monday"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = SlotResolver::new(Arc::new(AvailabilityStore::builtin()));

        for day in ["monday", "friday", "someday", ""] {
            assert_eq!(resolver.resolve(day), resolver.resolve(day));
        }
    }

    #[test]
    fn test_display_matches_message() {
        let resolution = Resolution::UnknownDay { day: "x".to_string() };
        assert_eq!(resolution.to_string(), resolution.message());
    }
}
