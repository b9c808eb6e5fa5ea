//! Read-only catalog of admissible food items.

use serde::{Deserialize, Serialize};

use crate::item::{ConditionTag, Item, MealSlot};

/// The static food catalog. Contents are host-supplied and validated
/// upstream; the engine only filters and reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items for a slot whose condition tags intersect the requested tags or
    /// are generic. An empty result propagates upward as "cannot generate".
    pub fn items_for(&self, slot: MealSlot, conditions: &[ConditionTag]) -> Vec<Item> {
        self.items
            .iter()
            .filter(|i| i.slot == slot && i.suits_conditions(conditions))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::new("b1", "oatmeal", MealSlot::Breakfast).with_quantity("40g"),
            Item::new("b2", "chamomile tea", MealSlot::Breakfast)
                .with_conditions(vec![ConditionTag::Reflux]),
            Item::new("l1", "brown rice", MealSlot::Lunch).with_quantity("100g"),
        ])
    }

    #[test]
    fn test_items_for_filters_by_slot() {
        let c = catalog();
        let breakfast = c.items_for(MealSlot::Breakfast, &[]);
        assert_eq!(breakfast.len(), 1);
        assert_eq!(breakfast[0].id, "b1");
    }

    #[test]
    fn test_items_for_includes_matching_condition() {
        let c = catalog();
        let breakfast = c.items_for(MealSlot::Breakfast, &[ConditionTag::Reflux]);
        assert_eq!(breakfast.len(), 2);
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let c = Catalog::default();
        assert!(c.is_empty());
        assert!(c.items_for(MealSlot::Dinner, &[]).is_empty());
    }
}
