//! Variation registry: multi-horizon memory of what has already been served.
//!
//! The registry is an explicit, injected dependency of the composer — there
//! is no ambient global state. Concurrency contract: a read-modify-write
//! cycle for the same (year, month) must be serialized by the host (wrap the
//! store in a mutex or scope one registry per user); concurrent writers on
//! the same key lose updates and corrupt the uniqueness guarantees.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::item::MealSlot;

/// Calendar position of one generated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    /// ISO week number, used for week-horizon dedup across calls.
    pub week: u32,
    pub day: u32,
}

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            week: date.iso_week().week(),
            day: date.day(),
        }
    }
}

/// One registered day: its key plus the four slot hashes in
/// [`MealSlot::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub key: DayKey,
    pub hashes: [String; 4],
}

impl DayRecord {
    pub fn hash_for(&self, slot: MealSlot) -> &str {
        let idx = MealSlot::ALL.iter().position(|s| *s == slot).unwrap_or(0);
        &self.hashes[idx]
    }
}

/// Keyed store of served combinations. Grows monotonically within a month;
/// cleared only on genuine pool exhaustion or external month rollover.
pub trait VariationRegistry {
    /// Write the day's record. Overwrites an existing record for the same key.
    fn record_day(&mut self, key: DayKey, hashes: [String; 4]);

    fn combination_used_this_month(&self, slot: MealSlot, hash: &str, month: u32, year: i32) -> bool;

    /// Whether an identical day (all four slot hashes) was already served.
    fn day_used_this_month(&self, hashes: &[String; 4], month: u32, year: i32) -> bool;

    fn clear_month(&mut self, month: u32, year: i32);

    /// All records for a (year, month), for deriving usage sets.
    fn month_records(&self, month: u32, year: i32) -> Vec<DayRecord>;
}

/// Combination hashes used this month for one slot.
pub fn month_hashes_for_slot(
    registry: &dyn VariationRegistry,
    slot: MealSlot,
    month: u32,
    year: i32,
) -> HashSet<String> {
    registry
        .month_records(month, year)
        .iter()
        .map(|r| r.hash_for(slot).to_string())
        .collect()
}

/// Lowercased item names served this month, recovered from the stored
/// hashes (a hash is the sorted names joined with `+`).
pub fn month_item_names(registry: &dyn VariationRegistry, month: u32, year: i32) -> HashSet<String> {
    let mut names = HashSet::new();
    for record in registry.month_records(month, year) {
        for hash in &record.hashes {
            for name in hash.split('+').filter(|n| !n.is_empty()) {
                names.insert(name.to_string());
            }
        }
    }
    names
}

/// Plain in-memory registry. Suitable for per-user scoping; hosts needing
/// shared access must add their own locking (see the trait docs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryRegistry {
    records: Vec<DayRecord>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl VariationRegistry for InMemoryRegistry {
    fn record_day(&mut self, key: DayKey, hashes: [String; 4]) {
        self.records.retain(|r| r.key != key);
        self.records.push(DayRecord { key, hashes });
    }

    fn combination_used_this_month(&self, slot: MealSlot, hash: &str, month: u32, year: i32) -> bool {
        self.records
            .iter()
            .filter(|r| r.key.month == month && r.key.year == year)
            .any(|r| r.hash_for(slot) == hash)
    }

    fn day_used_this_month(&self, hashes: &[String; 4], month: u32, year: i32) -> bool {
        self.records
            .iter()
            .filter(|r| r.key.month == month && r.key.year == year)
            .any(|r| &r.hashes == hashes)
    }

    fn clear_month(&mut self, month: u32, year: i32) {
        self.records.retain(|r| !(r.key.month == month && r.key.year == year));
    }

    fn month_records(&self, month: u32, year: i32) -> Vec<DayRecord> {
        self.records
            .iter()
            .filter(|r| r.key.month == month && r.key.year == year)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(day: u32) -> DayKey {
        DayKey { year: 2026, month: 8, week: 35, day }
    }

    fn hashes(prefix: &str) -> [String; 4] {
        [
            format!("{prefix}-breakfast"),
            format!("{prefix}-lunch"),
            format!("{prefix}-snack"),
            format!("{prefix}-dinner"),
        ]
    }

    #[test]
    fn test_record_and_query_combination() {
        let mut reg = InMemoryRegistry::new();
        reg.record_day(key(1), hashes("mon"));

        assert!(reg.combination_used_this_month(MealSlot::Lunch, "mon-lunch", 8, 2026));
        assert!(!reg.combination_used_this_month(MealSlot::Lunch, "mon-lunch", 9, 2026));
        assert!(!reg.combination_used_this_month(MealSlot::Dinner, "mon-lunch", 8, 2026));
    }

    #[test]
    fn test_day_used_this_month() {
        let mut reg = InMemoryRegistry::new();
        reg.record_day(key(1), hashes("mon"));
        assert!(reg.day_used_this_month(&hashes("mon"), 8, 2026));
        assert!(!reg.day_used_this_month(&hashes("tue"), 8, 2026));
    }

    #[test]
    fn test_rewriting_same_key_overwrites() {
        let mut reg = InMemoryRegistry::new();
        reg.record_day(key(1), hashes("old"));
        reg.record_day(key(1), hashes("new"));
        assert_eq!(reg.len(), 1);
        assert!(!reg.day_used_this_month(&hashes("old"), 8, 2026));
        assert!(reg.day_used_this_month(&hashes("new"), 8, 2026));
    }

    #[test]
    fn test_clear_month_only_touches_that_month() {
        let mut reg = InMemoryRegistry::new();
        reg.record_day(key(1), hashes("aug"));
        reg.record_day(DayKey { year: 2026, month: 9, week: 37, day: 1 }, hashes("sep"));

        reg.clear_month(8, 2026);
        assert!(!reg.combination_used_this_month(MealSlot::Breakfast, "aug-breakfast", 8, 2026));
        assert!(reg.combination_used_this_month(MealSlot::Breakfast, "sep-breakfast", 9, 2026));
    }

    #[test]
    fn test_month_item_names_recovers_names() {
        let mut reg = InMemoryRegistry::new();
        reg.record_day(
            key(1),
            [
                "oatmeal+tea".to_string(),
                "chicken+rice".to_string(),
                "apple".to_string(),
                "soup".to_string(),
            ],
        );
        let names = month_item_names(&reg, 8, 2026);
        assert!(names.contains("oatmeal"));
        assert!(names.contains("rice"));
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_day_key_from_date() {
        let k = DayKey::from_date(NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        assert_eq!(k.year, 2026);
        assert_eq!(k.month, 8);
        assert_eq!(k.day, 26);
    }
}
