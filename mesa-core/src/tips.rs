//! Preparation tips: short cooking guidance derived from item names.

use crate::item::{Item, MealSlot};

const GENERIC_TIP: &str = "Cook over low-medium heat, avoid frying, and use little oil.";

/// (keyword, tip) table per slot, checked in order.
fn slot_table(slot: MealSlot) -> &'static [(&'static str, &'static str)] {
    match slot {
        MealSlot::Breakfast => &[
            ("oat", "Cook the oats over low heat, stirring until creamy."),
            ("tapioca", "Heat a dry non-stick pan and spread the tapioca thinly."),
            ("egg", "Scramble slowly over low heat with minimal fat."),
            ("toast", "Toast lightly; spread while still warm."),
            ("bread", "Warm briefly; avoid heavy spreads."),
            ("tea", "Steep for 3-5 minutes; drink warm, not scalding."),
            ("juice", "Squeeze fresh and serve immediately to keep nutrients."),
            ("smoothie", "Blend with cold liquid; serve right away."),
            ("fruit", "Serve fresh, ripe, and at room temperature."),
        ],
        MealSlot::Lunch => &[
            ("grilled", "Grill over medium heat, turning once; season simply."),
            ("rice", "Rinse the rice and simmer covered until the water is absorbed."),
            ("bean", "Cook the beans until fully soft; season lightly."),
            ("lentil", "Simmer the lentils until tender; skim any foam."),
            ("salad", "Wash and dry the leaves well; dress just before serving."),
            ("fish", "Cook fish gently; it is done when it flakes easily."),
            ("chicken", "Cook chicken through; rest a few minutes before serving."),
            ("steamed", "Steam until just tender so texture and color hold."),
        ],
        MealSlot::AfternoonSnack => &[
            ("yogurt", "Serve chilled; add toppings just before eating."),
            ("fruit", "Serve fresh; cut only right before eating."),
            ("banana", "Choose ripe fruit; mash lightly if preferred."),
            ("nut", "Keep to a small handful; chew slowly."),
            ("tea", "Steep briefly and serve warm."),
            ("toast", "Toast lightly and top simply."),
        ],
        MealSlot::Dinner => &[
            ("soup", "Simmer until soft, serve warm, and avoid strong seasoning."),
            ("cream", "Simmer until soft, serve warm, and avoid strong seasoning."),
            ("broth", "Simmer gently and skim; serve warm."),
            ("omelet", "Cook over low heat; fold when just set."),
            ("egg", "Cook gently over low heat with minimal fat."),
            ("salad", "Use tender leaves at night; dress lightly."),
            ("grilled", "Grill over medium heat with little oil."),
        ],
    }
}

fn tip_for_name(name: &str, slot: MealSlot) -> Option<&'static str> {
    let name = name.to_lowercase();
    slot_table(slot)
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, tip)| *tip)
}

/// A short preparation tip for an assembled meal.
///
/// Looks at the first two items; the first (primary) item wins when their
/// tips disagree. Empty meals get an empty string, unmatched names the
/// generic tip.
pub fn tip(items: &[Item], slot: MealSlot) -> String {
    let mut candidates = items.iter().take(2).filter_map(|i| tip_for_name(&i.name, slot));

    match candidates.next() {
        Some(first) => first.to_string(),
        None => {
            if items.is_empty() {
                String::new()
            } else {
                GENERIC_TIP.to_string()
            }
        }
    }
}
