//! AvailabilityStore - immutable weekday to slots table

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use tracing::debug;

use super::ScheduleError;
use super::resolver::normalize_day;

/// Sentinel marking a slot that is already taken
pub const OCCUPIED: &str = "occupied";

/// Older spellings of the sentinel still accepted in config files
const LEGACY_SENTINELS: [&str; 2] = ["busy", "ocupado"];

/// Canonical weekday order used when listing days
const WEEKDAY_ORDER: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A single slot in a day, in chronological position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEntry {
    Free(NaiveTime),
    Occupied,
}

impl SlotEntry {
    /// Create a free slot at the given hour and minute
    ///
    /// Returns `None` for an out-of-range time.
    pub fn at(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotEntry::Free)
    }

    pub fn is_free(&self) -> bool {
        matches!(self, SlotEntry::Free(_))
    }

    /// Time of a free slot
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            SlotEntry::Free(time) => Some(*time),
            SlotEntry::Occupied => None,
        }
    }
}

impl fmt::Display for SlotEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotEntry::Free(time) => write!(f, "{}", time.format("%H:%M")),
            SlotEntry::Occupied => write!(f, "{}", OCCUPIED),
        }
    }
}

impl FromStr for SlotEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(OCCUPIED)
            || LEGACY_SENTINELS.iter().any(|legacy| trimmed.eq_ignore_ascii_case(legacy))
        {
            return Ok(SlotEntry::Occupied);
        }

        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(SlotEntry::Free)
            .map_err(|_| trimmed.to_string())
    }
}

/// Read-only mapping from weekday name to its ordered slots
///
/// Keys are normalized (trimmed, lowercase) at construction; lookups through
/// [`AvailabilityStore::slots_for`] are exact, so callers normalize first.
/// The resolver does this for you.
#[derive(Debug, Clone)]
pub struct AvailabilityStore {
    days: HashMap<String, Vec<SlotEntry>>,
}

impl AvailabilityStore {
    /// Build a store from already-parsed entries
    pub fn new<I, K>(table: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (K, Vec<SlotEntry>)>,
        K: AsRef<str>,
    {
        let mut days = HashMap::new();
        for (day, slots) in table {
            let day = normalize_day(day.as_ref());
            if day.is_empty() {
                return Err(ScheduleError::EmptyDayName);
            }
            if days.contains_key(&day) {
                return Err(ScheduleError::DuplicateDay { day });
            }
            days.insert(day, slots);
        }

        debug!(day_count = days.len(), "AvailabilityStore::new: built table");
        Ok(Self { days })
    }

    /// Build a store from the textual form used in config files
    pub fn from_strings(table: &BTreeMap<String, Vec<String>>) -> Result<Self, ScheduleError> {
        debug!(day_count = table.len(), "AvailabilityStore::from_strings: called");
        let mut parsed = Vec::with_capacity(table.len());
        for (day, entries) in table {
            let slots = entries
                .iter()
                .map(|entry| {
                    entry.parse::<SlotEntry>().map_err(|entry| ScheduleError::InvalidSlot {
                        day: day.clone(),
                        entry,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push((day.as_str(), slots));
        }
        Self::new(parsed)
    }

    /// The built-in sample week
    pub fn builtin() -> Self {
        let free = |hour, minute| SlotEntry::at(hour, minute).unwrap_or(SlotEntry::Occupied);
        let busy = SlotEntry::Occupied;

        let days = HashMap::from([
            ("monday".to_string(), vec![free(10, 0), free(11, 0), busy, free(14, 30)]),
            ("tuesday".to_string(), vec![busy, busy, free(16, 0)]),
            ("wednesday".to_string(), vec![free(9, 0), busy, free(13, 0)]),
            ("thursday".to_string(), vec![free(15, 0), free(16, 0)]),
            ("friday".to_string(), vec![busy, busy]),
        ]);

        Self { days }
    }

    /// Slots for an exact (normalized) day name
    pub fn slots_for(&self, day: &str) -> Option<&[SlotEntry]> {
        self.days.get(day).map(Vec::as_slice)
    }

    /// Day names in weekday order; unrecognized names follow alphabetically
    pub fn days(&self) -> Vec<&str> {
        let mut days: Vec<&str> = self.days.keys().map(String::as_str).collect();
        days.sort_by_key(|day| {
            let rank = WEEKDAY_ORDER.iter().position(|d| d == day).unwrap_or(WEEKDAY_ORDER.len());
            (rank, *day)
        });
        days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::builtin()
    }
}
