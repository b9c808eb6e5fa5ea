//! Restriction filter: per-restriction exclusion predicates plus
//! preference-aware reordering.
//!
//! Each restriction is an independent keyword predicate over the item name;
//! any single match excludes the item (OR semantics). A profile with no
//! restrictions must leave the candidate list untouched.

use crate::item::Item;
use crate::profile::{DietType, UserProfile};

const DAIRY_KEYWORDS: &[&str] = &["milk", "yogurt", "cheese", "butter", "cream", "kefir", "whey"];
const GLUTEN_KEYWORDS: &[&str] = &["bread", "toast", "pasta", "wheat", "couscous", "granola", "oat"];
const NUT_KEYWORDS: &[&str] = &["nut", "peanut", "almond", "cashew", "walnut", "hazelnut"];
const SEAFOOD_KEYWORDS: &[&str] = &["fish", "tilapia", "sardine", "tuna", "shrimp", "seafood"];
const EGG_KEYWORDS: &[&str] = &["egg"];
// "ham" is deliberately absent: it false-positives on "chamomile".
const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "turkey", "meat", "bacon", "sausage",
];
const ANIMAL_KEYWORDS: &[&str] = &["honey", "gelatin"];
const GLUTEN_FREE_MARKERS: &[&str] = &["gluten-free", "gluten free", "tapioca", "rice", "corn"];
const REFLUX_TRIGGERS: &[&str] = &["coffee", "chocolate", "fried", "pepper", "citrus", "orange"];
const IBS_TRIGGERS: &[&str] = &["bean", "lentil", "chickpea", "cabbage", "cauliflower", "onion"];

fn name_contains(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

fn excluded_by_lactose(name: &str) -> bool {
    name_contains(name, DAIRY_KEYWORDS) && !name.contains("lactose-free")
}

fn excluded_by_gluten(name: &str) -> bool {
    name_contains(name, GLUTEN_KEYWORDS) && !name_contains(name, GLUTEN_FREE_MARKERS)
}

fn excluded_by_diet(name: &str, diet: DietType) -> bool {
    match diet {
        DietType::Omnivore => false,
        DietType::Vegetarian => name_contains(name, MEAT_KEYWORDS) || name_contains(name, SEAFOOD_KEYWORDS),
        DietType::Vegan => {
            name_contains(name, MEAT_KEYWORDS)
                || name_contains(name, SEAFOOD_KEYWORDS)
                || name_contains(name, DAIRY_KEYWORDS)
                || name_contains(name, EGG_KEYWORDS)
                || name_contains(name, ANIMAL_KEYWORDS)
        }
    }
}

/// GI symptom reports map to trigger-food exclusions.
fn excluded_by_symptoms(name: &str, symptoms: &[String]) -> bool {
    symptoms.iter().any(|s| {
        let s = s.to_lowercase();
        if s.contains("reflux") || s.contains("heartburn") {
            name_contains(name, REFLUX_TRIGGERS)
        } else if s.contains("bloat") || s.contains("gas") || s.contains("irritable") {
            name_contains(name, IBS_TRIGGERS)
        } else {
            false
        }
    })
}

/// Whether the item survives every active restriction in the profile.
pub fn admissible(item: &Item, profile: &UserProfile) -> bool {
    let name = item.name.to_lowercase();

    if profile.disliked_foods.iter().any(|d| name.contains(&d.to_lowercase())) {
        return false;
    }
    if profile.intolerances.lactose && excluded_by_lactose(&name) {
        return false;
    }
    if profile.intolerances.gluten && excluded_by_gluten(&name) {
        return false;
    }
    if profile.intolerances.nuts && name_contains(&name, NUT_KEYWORDS) {
        return false;
    }
    if profile.intolerances.seafood && name_contains(&name, SEAFOOD_KEYWORDS) {
        return false;
    }
    if profile.intolerances.eggs && name_contains(&name, EGG_KEYWORDS) {
        return false;
    }
    if let Some(diet) = profile.diet {
        if excluded_by_diet(&name, diet) {
            return false;
        }
    }
    if excluded_by_symptoms(&name, &profile.gi_symptoms) {
        return false;
    }

    true
}

/// Drop inadmissible items, preserving order.
pub fn filter_admissible(items: Vec<Item>, profile: &UserProfile) -> Vec<Item> {
    if profile.unrestricted() && profile.disliked_foods.is_empty() {
        return items;
    }
    items.into_iter().filter(|i| admissible(i, profile)).collect()
}

/// Stable partition: liked items first, relative order preserved within both
/// partitions. No likes means no reordering.
pub fn prioritize_preferred(items: Vec<Item>, profile: &UserProfile) -> Vec<Item> {
    if profile.liked_foods.is_empty() {
        return items;
    }

    let likes: Vec<String> = profile.liked_foods.iter().map(|l| l.to_lowercase()).collect();
    let (preferred, rest): (Vec<Item>, Vec<Item>) = items.into_iter().partition(|i| {
        let name = i.name.to_lowercase();
        likes.iter().any(|l| name.contains(l))
    });

    let mut out = preferred;
    out.extend(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ConditionTag, MealSlot};
    use crate::profile::{Goal, Intolerances, Routine, Sex};

    fn profile() -> UserProfile {
        UserProfile::new(
            70.0,
            165.0,
            40,
            Sex::Female,
            Routine::Sedentary,
            ConditionTag::Any,
            Goal::Maintenance,
        )
    }

    fn named(name: &str) -> Item {
        Item::new("t", name, MealSlot::Breakfast)
    }

    #[test]
    fn test_no_restrictions_passes_everything_through() {
        let items = vec![named("whole milk"), named("scrambled eggs")];
        let out = filter_admissible(items.clone(), &profile());
        assert_eq!(out, items);
    }

    #[test]
    fn test_lactose_excludes_dairy_keywords() {
        let p = profile().with_intolerances(Intolerances { lactose: true, ..Default::default() });
        assert!(!admissible(&named("whole milk"), &p));
        assert!(!admissible(&named("plain yogurt"), &p));
        assert!(!admissible(&named("white cheese"), &p));
        assert!(admissible(&named("banana"), &p));
    }

    #[test]
    fn test_lactose_free_marker_is_respected() {
        let p = profile().with_intolerances(Intolerances { lactose: true, ..Default::default() });
        assert!(admissible(&named("lactose-free milk"), &p));
    }

    #[test]
    fn test_gluten_excludes_unless_marked() {
        let p = profile().with_intolerances(Intolerances { gluten: true, ..Default::default() });
        assert!(!admissible(&named("whole wheat bread"), &p));
        assert!(admissible(&named("gluten-free bread"), &p));
        assert!(admissible(&named("rice noodle"), &p));
    }

    #[test]
    fn test_vegan_excludes_all_animal_products() {
        let p = profile().with_diet(DietType::Vegan);
        assert!(!admissible(&named("grilled chicken"), &p));
        assert!(!admissible(&named("scrambled eggs"), &p));
        assert!(!admissible(&named("plain yogurt"), &p));
        assert!(admissible(&named("tofu with vegetables"), &p));
    }

    #[test]
    fn test_vegetarian_allows_dairy_and_eggs() {
        let p = profile().with_diet(DietType::Vegetarian);
        assert!(!admissible(&named("grilled fish"), &p));
        assert!(admissible(&named("scrambled eggs"), &p));
        assert!(admissible(&named("plain yogurt"), &p));
    }

    #[test]
    fn test_dislikes_always_exclude_case_insensitively() {
        let p = profile().with_dislikes(vec!["Papaya".to_string()]);
        assert!(!admissible(&named("papaya smoothie"), &p));
        assert!(admissible(&named("melon"), &p));
    }

    #[test]
    fn test_reflux_symptom_excludes_triggers() {
        let p = profile().with_gi_symptoms(vec!["heartburn after meals".to_string()]);
        assert!(!admissible(&named("black coffee"), &p));
        assert!(!admissible(&named("fried polenta"), &p));
        assert!(admissible(&named("chamomile tea"), &p));
    }

    #[test]
    fn test_prioritize_preferred_is_a_stable_partition() {
        let p = profile().with_likes(vec!["banana".to_string()]);
        let items = vec![named("oatmeal"), named("banana"), named("melon"), named("banana bread")];
        let out = prioritize_preferred(items, &p);
        let names: Vec<&str> = out.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["banana", "banana bread", "oatmeal", "melon"]);
    }

    #[test]
    fn test_prioritize_without_likes_keeps_order() {
        let items = vec![named("oatmeal"), named("banana")];
        let out = prioritize_preferred(items.clone(), &profile());
        assert_eq!(out, items);
    }
}
