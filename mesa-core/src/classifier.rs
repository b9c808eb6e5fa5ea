//! Keyword-driven item classification.
//!
//! Everything here is a pure function of the item name. The catalog carries
//! no nutritional metadata, so category, digestibility, caloric density and
//! suitability are all derived from keyword tables with a fixed precedence.
//! Replacing the substring tables with explicit catalog tags is a known
//! extension point; this module is the only place it would land.

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::profile::{Goal, Routine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Carbohydrate,
    Protein,
    Cereal,
    Fruit,
    Liquid,
    Fat,
    Vegetable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionalProfile {
    Light,
    Complete,
    Functional,
    DigestiveFriendly,
    Indulgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaloricDensity {
    Low,
    Medium,
    High,
}

/// Derived view over an item. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub profile: NutritionalProfile,
    /// 1-10, higher digests easier.
    pub digestibility: i32,
    pub density: CaloricDensity,
    pub weight_loss_suitable: bool,
    pub maintenance_suitable: bool,
    pub comfort_suitable: bool,
    pub active_suitable: bool,
    pub sedentary_suitable: bool,
}

impl Classification {
    /// Suitability flag for a generation goal.
    pub fn suits_goal(&self, goal: Goal) -> bool {
        match goal {
            Goal::WeightLoss => self.weight_loss_suitable,
            Goal::Maintenance => self.maintenance_suitable,
            Goal::DigestiveComfort => self.comfort_suitable,
        }
    }

    /// Suitability flag for an activity routine.
    pub fn suits_routine(&self, routine: Routine) -> bool {
        if routine.is_active() {
            self.active_suitable
        } else {
            self.sedentary_suitable
        }
    }
}

const CARB_KEYWORDS: &[&str] = &[
    "rice", "pasta", "potato", "bread", "toast", "tapioca", "couscous", "noodle", "cassava",
];
const PROTEIN_KEYWORDS: &[&str] = &[
    "chicken", "beef", "fish", "egg", "turkey", "tofu", "meat", "tilapia", "sardine", "tuna",
    "lentil", "bean", "chickpea", "pork", "bacon", "sausage",
];
const CEREAL_KEYWORDS: &[&str] = &["oat", "granola", "cereal", "quinoa", "flake", "muesli"];
const FRUIT_KEYWORDS: &[&str] = &[
    "banana", "apple", "papaya", "melon", "pear", "orange", "strawberry", "mango", "grape",
    "fruit", "berries",
];
const LIQUID_KEYWORDS: &[&str] = &[
    "juice", "tea", "milk", "coffee", "smoothie", "water", "yogurt", "broth",
];
const FAT_KEYWORDS: &[&str] = &["avocado", "olive oil", "butter", "nut", "peanut", "seed", "cheese"];

const EASY_COOKING: &[&str] = &["grilled", "steamed", "baked", "boiled"];
const HEAVY_COOKING: &[&str] = &["fried", "sauteed", "sautéed", "breaded"];
const SOUP_KEYWORDS: &[&str] = &["soup", "cream of", "creamed", "broth", "puree", "purée"];
const SOFT_KEYWORDS: &[&str] = &["cooked", "ripe", "mashed", "stewed"];
const LEAN_PROTEIN_KEYWORDS: &[&str] = &["chicken", "fish", "tilapia", "turkey", "tofu", "egg white"];
const HEAVY_PROTEIN_KEYWORDS: &[&str] = &["beef", "pork", "bacon", "sausage"];
const SALAD_KEYWORDS: &[&str] = &["salad", "leaf", "leaves", "lettuce", "arugula"];
const INDULGENT_KEYWORDS: &[&str] = &["fried", "cake", "cream cheese", "chocolate", "condensed"];
const FUNCTIONAL_KEYWORDS: &[&str] = &["tea", "juice", "yogurt", "kefir", "ginger", "chia"];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

/// Category by fixed keyword precedence; vegetable is the default arm.
fn category_of(name: &str) -> Category {
    if contains_any(name, CARB_KEYWORDS) {
        Category::Carbohydrate
    } else if contains_any(name, PROTEIN_KEYWORDS) {
        Category::Protein
    } else if contains_any(name, CEREAL_KEYWORDS) {
        Category::Cereal
    } else if contains_any(name, FRUIT_KEYWORDS) {
        Category::Fruit
    } else if contains_any(name, LIQUID_KEYWORDS) {
        Category::Liquid
    } else if contains_any(name, FAT_KEYWORDS) {
        Category::Fat
    } else {
        Category::Vegetable
    }
}

fn digestibility_of(name: &str) -> i32 {
    // Recognized easy dishes override the additive scoring.
    if contains_any(name, SOUP_KEYWORDS) {
        return 9;
    }
    if contains_any(name, SOFT_KEYWORDS) {
        return 9;
    }

    let mut score = 7;
    if contains_any(name, EASY_COOKING) {
        score += 1;
    }
    if contains_any(name, HEAVY_COOKING) {
        score -= 1;
    }
    score.clamp(1, 10)
}

fn density_of(name: &str, category: Category) -> CaloricDensity {
    if contains_any(name, SOUP_KEYWORDS)
        || contains_any(name, SALAD_KEYWORDS)
        || category == Category::Fruit
        || category == Category::Vegetable
    {
        return CaloricDensity::Low;
    }
    if category == Category::Protein && contains_any(name, HEAVY_PROTEIN_KEYWORDS) {
        return CaloricDensity::High;
    }
    if category == Category::Carbohydrate || category == Category::Fat {
        return CaloricDensity::High;
    }
    CaloricDensity::Medium
}

fn profile_of(name: &str, digestibility: i32, density: CaloricDensity) -> NutritionalProfile {
    if contains_any(name, INDULGENT_KEYWORDS) {
        NutritionalProfile::Indulgent
    } else if digestibility >= 9 {
        NutritionalProfile::DigestiveFriendly
    } else if contains_any(name, FUNCTIONAL_KEYWORDS) {
        NutritionalProfile::Functional
    } else if density == CaloricDensity::Low {
        NutritionalProfile::Light
    } else {
        NutritionalProfile::Complete
    }
}

/// Whether the item reads as lean protein (used by the lunch/weight-loss rules).
pub fn is_lean_protein(name: &str) -> bool {
    let name = name.to_lowercase();
    contains_any(&name, LEAN_PROTEIN_KEYWORDS) && !contains_any(&name, HEAVY_COOKING)
}

/// Whether the item reads as a soup/cream/broth dish.
pub fn is_soup_like(name: &str) -> bool {
    contains_any(&name.to_lowercase(), SOUP_KEYWORDS)
}

/// Whether the item is a heavy carbohydrate (the dinner weight-loss rule).
pub fn is_heavy_carb(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("rice") || name.contains("pasta")
}

/// Whether the item is a heavy protein (the breakfast anti-pattern rule).
pub fn is_heavy_protein(name: &str) -> bool {
    contains_any(&name.to_lowercase(), HEAVY_PROTEIN_KEYWORDS)
}

/// Classify an item. Total and side-effect-free: every name maps to some
/// classification, unknown names fall into the vegetable/medium defaults.
pub fn classify(item: &Item) -> Classification {
    let name = item.name.to_lowercase();

    let category = category_of(&name);
    let digestibility = digestibility_of(&name);
    let density = density_of(&name, category);
    let profile = profile_of(&name, digestibility, density);

    let weight_loss_suitable =
        density == CaloricDensity::Low || (category == Category::Protein && is_lean_protein(&name));
    let comfort_suitable = digestibility >= 8;
    let maintenance_suitable = profile != NutritionalProfile::Indulgent;
    let active_suitable = matches!(
        category,
        Category::Carbohydrate | Category::Protein | Category::Cereal
    ) || density == CaloricDensity::High;
    let sedentary_suitable = density != CaloricDensity::High;

    Classification {
        category,
        profile,
        digestibility,
        density,
        weight_loss_suitable,
        maintenance_suitable,
        comfort_suitable,
        active_suitable,
        sedentary_suitable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MealSlot;

    fn classify_name(name: &str) -> Classification {
        classify(&Item::new("t", name, MealSlot::Lunch))
    }

    #[test]
    fn test_category_precedence_carb_wins() {
        // "rice" (carb) appears before any protein keyword can match.
        assert_eq!(classify_name("rice with chicken").category, Category::Carbohydrate);
        assert_eq!(classify_name("grilled chicken").category, Category::Protein);
        assert_eq!(classify_name("oatmeal flakes").category, Category::Cereal);
    }

    #[test]
    fn test_unknown_name_defaults_to_vegetable() {
        let c = classify_name("chayote");
        assert_eq!(c.category, Category::Vegetable);
        assert_eq!(c.density, CaloricDensity::Low);
    }

    #[test]
    fn test_digestibility_cooking_bumps() {
        assert_eq!(classify_name("grilled chicken").digestibility, 8);
        assert_eq!(classify_name("fried chicken").digestibility, 6);
        assert_eq!(classify_name("chicken").digestibility, 7);
    }

    #[test]
    fn test_soup_override_beats_cooking_penalty() {
        assert_eq!(classify_name("vegetable soup").digestibility, 9);
        assert_eq!(classify_name("cream of pumpkin").digestibility, 9);
        assert_eq!(classify_name("ripe banana").digestibility, 9);
    }

    #[test]
    fn test_density_buckets() {
        assert_eq!(classify_name("vegetable soup").density, CaloricDensity::Low);
        assert_eq!(classify_name("green salad").density, CaloricDensity::Low);
        assert_eq!(classify_name("white rice").density, CaloricDensity::High);
        assert_eq!(classify_name("grilled beef").density, CaloricDensity::High);
        assert_eq!(classify_name("grilled fish").density, CaloricDensity::Medium);
    }

    #[test]
    fn test_weight_loss_flag() {
        assert!(classify_name("green salad").weight_loss_suitable);
        assert!(classify_name("grilled tilapia").weight_loss_suitable);
        assert!(!classify_name("white rice").weight_loss_suitable);
    }

    #[test]
    fn test_lean_and_heavy_helpers() {
        assert!(is_lean_protein("grilled chicken"));
        assert!(!is_lean_protein("fried chicken"));
        assert!(is_heavy_carb("Pasta Bolognese"));
        assert!(is_heavy_protein("beef stew"));
        assert!(is_soup_like("Cream of carrot"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let item = Item::new("t", "steamed broccoli", MealSlot::Dinner);
        assert_eq!(classify(&item), classify(&item));
    }
}
