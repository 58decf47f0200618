//! Property-based tests for slot resolution
//!
//! - The reported slot is always the earliest free entry of the day
//! - A day with only occupied entries is always fully booked
//! - Lookup ignores case
//! - Days outside the table are always unknown

use std::sync::Arc;

use chrono::NaiveTime;
use proptest::prelude::*;

use super::{AvailabilityStore, Resolution, SlotEntry, SlotResolver};

fn arb_slot() -> impl Strategy<Value = SlotEntry> {
    prop_oneof![
        Just(SlotEntry::Occupied),
        (0u32..24, 0u32..60).prop_map(|(h, m)| SlotEntry::Free(NaiveTime::from_hms_opt(h, m, 0).unwrap())),
    ]
}

fn arb_day() -> impl Strategy<Value = String> {
    "[a-z]{3,12}(-[a-z]{4,6})?"
}

fn resolver_for(day: &str, slots: Vec<SlotEntry>) -> SlotResolver {
    SlotResolver::new(Arc::new(AvailabilityStore::new([(day, slots)]).unwrap()))
}

proptest! {
    #[test]
    fn first_available_is_earliest_free_entry(day in arb_day(), slots in prop::collection::vec(arb_slot(), 1..10)) {
        let resolver = resolver_for(&day, slots.clone());
        let expected = slots.iter().find_map(SlotEntry::time);

        match (resolver.resolve(&day), expected) {
            (Resolution::FirstAvailable { time, .. }, Some(first)) => prop_assert_eq!(time, first),
            (Resolution::FullyBooked { .. }, None) => {}
            (other, expected) => prop_assert!(false, "got {:?}, expected first free {:?}", other, expected),
        }
    }

    #[test]
    fn all_occupied_is_fully_booked(day in arb_day(), count in 1usize..8) {
        let resolver = resolver_for(&day, vec![SlotEntry::Occupied; count]);

        let is_fully_booked = matches!(resolver.resolve(&day), Resolution::FullyBooked { .. });
        prop_assert!(is_fully_booked);
    }

    #[test]
    fn lookup_ignores_case(day in arb_day(), slots in prop::collection::vec(arb_slot(), 0..6)) {
        let resolver = resolver_for(&day, slots);

        prop_assert_eq!(resolver.resolve(&day.to_uppercase()), resolver.resolve(&day));
    }

    #[test]
    fn unlisted_days_are_unknown(day in "[0-9]{1,8}") {
        let resolver = SlotResolver::new(Arc::new(AvailabilityStore::builtin()));

        let is_unknown = matches!(resolver.resolve(&day), Resolution::UnknownDay { .. });
        prop_assert!(is_unknown);
    }
}
