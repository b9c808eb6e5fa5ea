//! Built-in sample inputs so `mesa generate` is runnable out of the box.

use mesa_core::{Catalog, ConditionTag, Goal, Item, MealSlot, Routine, Sex, UserProfile};

fn slot_items(slot: MealSlot, entries: &[(&str, &str)]) -> Vec<Item> {
    entries
        .iter()
        .map(|(name, quantity)| Item::new(*name, *name, slot).with_quantity(*quantity))
        .collect()
}

pub fn sample_catalog() -> Catalog {
    let mut items = Vec::new();

    items.extend(slot_items(
        MealSlot::Breakfast,
        &[
            ("oatmeal", "40g"),
            ("whole grain toast", "2 slices"),
            ("tapioca with cheese", "1 unit"),
            ("granola", "30g"),
            ("scrambled eggs", "2 units"),
            ("chamomile tea", "200ml"),
            ("orange juice", "200ml"),
            ("skim milk", "200ml"),
            ("papaya smoothie", "250ml"),
            ("banana", "1 unit"),
            ("apple", "1 unit"),
            ("melon", "150g"),
        ],
    ));

    items.extend(slot_items(
        MealSlot::Lunch,
        &[
            ("brown rice", "100g"),
            ("whole wheat pasta", "90g"),
            ("baked potato", "150g"),
            ("couscous", "80g"),
            ("boiled cassava", "120g"),
            ("sweet potato", "130g"),
            ("grilled chicken", "120g"),
            ("grilled fish", "120g"),
            ("baked tilapia", "130g"),
            ("turkey breast", "110g"),
            ("black beans", "80g"),
            ("lentil stew", "100g"),
            ("grilled beef", "110g"),
            ("steamed broccoli", "80g"),
            ("green salad", "1 plate"),
            ("sauteed spinach", "70g"),
            ("roasted carrots", "80g"),
            ("chayote", "80g"),
            ("steamed zucchini", "80g"),
            ("braised kale", "70g"),
        ],
    ));

    items.extend(slot_items(
        MealSlot::AfternoonSnack,
        &[
            ("plain yogurt", "170g"),
            ("banana", "1 unit"),
            ("apple", "1 unit"),
            ("ripe papaya", "150g"),
            ("whole grain toast", "1 slice"),
            ("chamomile tea", "200ml"),
            ("grape juice", "200ml"),
            ("pear", "1 unit"),
        ],
    ));

    items.extend(slot_items(
        MealSlot::Dinner,
        &[
            ("vegetable soup", "300ml"),
            ("pumpkin cream", "300ml"),
            ("chicken broth", "300ml"),
            ("lentil soup", "300ml"),
            ("tomato soup", "300ml"),
            ("grilled chicken", "100g"),
            ("omelet", "2 units"),
            ("green salad", "1 plate"),
            ("steamed zucchini", "100g"),
            ("baked fish", "110g"),
        ],
    ));

    Catalog::new(items)
}

pub fn sample_profile() -> UserProfile {
    UserProfile::new(
        70.0,
        165.0,
        50,
        Sex::Female,
        Routine::Sedentary,
        ConditionTag::Reflux,
        Goal::DigestiveComfort,
    )
    .with_gi_symptoms(vec!["heartburn".to_string()])
    .with_dislikes(vec!["liver".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_covers_all_slots() {
        let catalog = sample_catalog();
        for slot in MealSlot::ALL {
            assert!(!catalog.items_for(slot, &[ConditionTag::Any]).is_empty());
        }
    }

    #[test]
    fn test_sample_inputs_generate_a_week() {
        use mesa_core::{InMemoryRegistry, WeekComposer};

        let composer = WeekComposer::new(sample_catalog()).with_seed(1);
        let mut registry = InMemoryRegistry::new();
        let start = chrono::NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let plan = composer
            .compose_week(&sample_profile(), start, &mut registry)
            .expect("sample inputs must generate");
        plan.validate().expect("plan invariants hold");
    }
}
