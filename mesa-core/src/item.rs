//! Catalog item model: the immutable unit everything downstream composes.

use serde::{Deserialize, Serialize};

/// One of the four daily meal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon snack",
            MealSlot::Dinner => "dinner",
        }
    }
}

/// Digestive-condition tag restricting which users an item is admissible for.
///
/// `Any` marks items safe for every condition; specific tags widen the pool
/// for users who share that condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTag {
    Any,
    Reflux,
    IrritableBowel,
    Constipation,
    Dyspepsia,
}

/// An admissible food entry in the static catalog.
///
/// Quantity is a serving string like "120g", "200ml" or "2 slices"; the
/// quantity adjuster rescales it, everything else treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub slot: MealSlot,
    pub conditions: Vec<ConditionTag>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slot: MealSlot) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: "1 unit".to_string(),
            slot,
            conditions: vec![ConditionTag::Any],
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<ConditionTag>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Deduplication key within a day/week: same food at a different serving
    /// size still counts as the same usage.
    pub fn usage_key(&self) -> String {
        format!("{}|{}", self.name.to_lowercase(), self.quantity.to_lowercase())
    }

    /// True if the item is generic or shares at least one requested tag.
    pub fn suits_conditions(&self, requested: &[ConditionTag]) -> bool {
        self.conditions.contains(&ConditionTag::Any)
            || self.conditions.iter().any(|c| requested.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_key_ignores_case() {
        let a = Item::new("i1", "Grilled Chicken", MealSlot::Lunch).with_quantity("120G");
        let b = Item::new("i2", "grilled chicken", MealSlot::Lunch).with_quantity("120g");
        assert_eq!(a.usage_key(), b.usage_key());
    }

    #[test]
    fn test_generic_item_suits_everything() {
        let item = Item::new("i1", "rice", MealSlot::Lunch);
        assert!(item.suits_conditions(&[ConditionTag::Reflux]));
        assert!(item.suits_conditions(&[]));
    }

    #[test]
    fn test_tagged_item_requires_overlap() {
        let item = Item::new("i1", "ginger tea", MealSlot::Breakfast)
            .with_conditions(vec![ConditionTag::Reflux]);
        assert!(item.suits_conditions(&[ConditionTag::Reflux]));
        assert!(!item.suits_conditions(&[ConditionTag::IrritableBowel]));
    }

    #[test]
    fn test_slot_serde_casing() {
        let json = serde_json::to_string(&MealSlot::AfternoonSnack).unwrap();
        assert_eq!(json, "\"afternoon_snack\"");
    }
}
