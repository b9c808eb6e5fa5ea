//! Plan value objects handed back to the host, plus the failure taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{Item, MealSlot};

/// Stable content identity for a set of items: sorted, lowercased names
/// joined with `+`. String-valued so it survives serialization and stays
/// identical across processes, which a hasher-based key would not.
pub fn combination_hash(items: &[Item]) -> String {
    let mut names: Vec<String> = items.iter().map(|i| i.name.to_lowercase()).collect();
    names.sort();
    names.join("+")
}

/// The items chosen for one slot on one day. Order is irrelevant; the hash
/// is the identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub slot: MealSlot,
    pub items: Vec<Item>,
    pub hash: String,
}

impl Combination {
    pub fn new(slot: MealSlot, items: Vec<Item>) -> Self {
        let hash = combination_hash(&items);
        Self { slot, items, hash }
    }
}

/// One assembled day: four meals and a cooking tip per meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 0..=6, Monday-based.
    pub weekday: usize,
    pub breakfast: Combination,
    pub lunch: Combination,
    pub afternoon_snack: Combination,
    pub dinner: Combination,
    pub tips: [String; 4],
}

impl DayPlan {
    pub fn meals(&self) -> [&Combination; 4] {
        [&self.breakfast, &self.lunch, &self.afternoon_snack, &self.dinner]
    }

    pub fn meal(&self, slot: MealSlot) -> &Combination {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::AfternoonSnack => &self.afternoon_snack,
            MealSlot::Dinner => &self.dinner,
        }
    }

    /// Per-slot hashes in slot order, the registry record for this day.
    pub fn slot_hashes(&self) -> [String; 4] {
        [
            self.breakfast.hash.clone(),
            self.lunch.hash.clone(),
            self.afternoon_snack.hash.clone(),
            self.dinner.hash.clone(),
        ]
    }

    /// No item may appear in two different meals of the same day.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for meal in self.meals() {
            for item in &meal.items {
                if !seen.insert(item.usage_key()) {
                    return Err(format!("item repeated within day: {}", item.name));
                }
            }
        }
        Ok(())
    }
}

/// Seven days plus free-text notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: Vec<DayPlan>,
    pub notes: String,
}

impl WeekPlan {
    /// Per slot, all seven combination hashes must be pairwise distinct.
    pub fn validate(&self) -> Result<(), String> {
        if self.days.len() != 7 {
            return Err(format!("expected 7 days, got {}", self.days.len()));
        }
        for slot in MealSlot::ALL {
            let mut seen = std::collections::HashSet::new();
            for day in &self.days {
                let hash = &day.meal(slot).hash;
                if !seen.insert(hash.clone()) {
                    return Err(format!("{} combination repeated in week: {hash}", slot.label()));
                }
            }
        }
        for day in &self.days {
            day.validate()?;
        }
        Ok(())
    }
}

/// Why a generation call produced no plan. All variants are recoverable by
/// the caller (relax restrictions or retry); none is process-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("no admissible items for {slot} after filtering")]
    EmptyCatalogForSlot { slot: &'static str },

    #[error("no coherent combination found for {slot} within the sampling budget")]
    NoCoherentCombination { slot: &'static str },

    #[error("day {weekday} could not be assembled: {source}")]
    DayAssemblyFailed {
        weekday: usize,
        #[source]
        source: Box<ComposeError>,
    },

    #[error("week generation aborted: {source}")]
    WeekAssemblyFailed {
        #[source]
        source: Box<ComposeError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, slot: MealSlot) -> Item {
        Item::new(name, name, slot)
    }

    #[test]
    fn test_hash_is_order_insensitive() {
        let a = vec![item("rice", MealSlot::Lunch), item("beans", MealSlot::Lunch)];
        let b = vec![item("beans", MealSlot::Lunch), item("rice", MealSlot::Lunch)];
        assert_eq!(combination_hash(&a), combination_hash(&b));
        assert_eq!(combination_hash(&a), "beans+rice");
    }

    #[test]
    fn test_hash_distinguishes_contents() {
        let a = vec![item("rice", MealSlot::Lunch)];
        let b = vec![item("pasta", MealSlot::Lunch)];
        assert_ne!(combination_hash(&a), combination_hash(&b));
    }

    fn day(weekday: usize, names: [&str; 4]) -> DayPlan {
        DayPlan {
            weekday,
            breakfast: Combination::new(MealSlot::Breakfast, vec![item(names[0], MealSlot::Breakfast)]),
            lunch: Combination::new(MealSlot::Lunch, vec![item(names[1], MealSlot::Lunch)]),
            afternoon_snack: Combination::new(
                MealSlot::AfternoonSnack,
                vec![item(names[2], MealSlot::AfternoonSnack)],
            ),
            dinner: Combination::new(MealSlot::Dinner, vec![item(names[3], MealSlot::Dinner)]),
            tips: Default::default(),
        }
    }

    #[test]
    fn test_day_validate_rejects_repeated_item() {
        let d = day(0, ["oatmeal", "oatmeal", "apple", "soup"]);
        assert!(d.validate().is_err());
        let ok = day(0, ["oatmeal", "rice", "apple", "soup"]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_week_validate_rejects_repeated_slot_hash() {
        let mut days = Vec::new();
        for i in 0..7 {
            let names = [
                format!("breakfast {i}"),
                format!("lunch {i}"),
                format!("snack {i}"),
                format!("dinner {i}"),
            ];
            days.push(day(
                i,
                [names[0].as_str(), names[1].as_str(), names[2].as_str(), names[3].as_str()],
            ));
        }
        let week = WeekPlan { days, notes: String::new() };
        assert!(week.validate().is_ok());

        let mut bad = week.clone();
        bad.days[3].lunch = bad.days[0].lunch.clone();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_compose_error_display_chain() {
        let err = ComposeError::WeekAssemblyFailed {
            source: Box::new(ComposeError::DayAssemblyFailed {
                weekday: 2,
                source: Box::new(ComposeError::NoCoherentCombination { slot: "dinner" }),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("week generation aborted"));
        assert!(msg.contains("day 2"));
    }
}
