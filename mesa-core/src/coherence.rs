//! Coherence evaluator: rule-based 0-100 scoring of a candidate meal.
//!
//! The thresholds and per-rule deductions are empirically tuned values, not
//! derived from a nutritional standard. The two
//! acceptance thresholds and the variety bonuses live in [`ScoringConfig`]
//! so hosts can tune them; the per-rule deductions are module constants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::classifier::{self, Category, Classification, classify};
use crate::item::{Item, MealSlot};
use crate::profile::{Goal, UserProfile};

// Slot-specific deductions.
const BREAKFAST_NO_BASE: i32 = 20;
const BREAKFAST_NO_LIQUID: i32 = 15;
const BREAKFAST_NO_FRUIT_WL: i32 = 10;
const LUNCH_NO_CARB: i32 = 25;
const LUNCH_NO_PROTEIN: i32 = 25;
const LUNCH_NO_VEGETABLE: i32 = 20;
const LUNCH_TOO_SMALL_ACTIVE: i32 = 15;
const LUNCH_NO_LEAN_WL: i32 = 10;
const SNACK_HARD_TO_DIGEST: i32 = 20;
const SNACK_TOO_MANY: i32 = 15;
const DINNER_NO_SOUP_COMFORT: i32 = 25;
const DINNER_HARD_TO_DIGEST: i32 = 20;
const DINNER_HEAVY_CARB_WL: i32 = 15;

// Cross-cutting deductions.
const REPEATED_ITEM_TODAY: i32 = 30;
const GOAL_FIT_SHORTFALL: i32 = 20;
const ROUTINE_FIT_SHORTFALL: i32 = 15;
const ANTI_PATTERN: i32 = 10;

const GOAL_FIT_RATIO: f64 = 0.7;
const ROUTINE_FIT_RATIO: f64 = 0.6;

/// Tunable scoring knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum score for a combination to count as coherent.
    pub valid_threshold: i32,
    /// Floor below which a combination is rejected even as a fallback.
    pub acceptable_threshold: i32,
    /// Bonus per item unused this week.
    pub weekly_variety_bonus: i32,
    /// Bonus per item unused this month.
    pub monthly_variety_bonus: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            valid_threshold: 60,
            acceptable_threshold: 40,
            weekly_variety_bonus: 5,
            monthly_variety_bonus: 15,
        }
    }
}

/// Outcome of evaluating one candidate meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEvaluation {
    pub score: i32,
    pub valid: bool,
    /// What the combination does well.
    pub reasons: Vec<String>,
    /// Which rules it violates.
    pub issues: Vec<String>,
}

fn mean_digestibility(classes: &[Classification]) -> f64 {
    if classes.is_empty() {
        return 0.0;
    }
    let total: i32 = classes.iter().map(|c| c.digestibility).sum();
    f64::from(total) / classes.len() as f64
}

fn has_category(classes: &[Classification], category: Category) -> bool {
    classes.iter().any(|c| c.category == category)
}

fn count_category(classes: &[Classification], category: Category) -> usize {
    classes.iter().filter(|c| c.category == category).count()
}

/// Score a candidate meal for a slot and profile.
///
/// Pure function: identical inputs always produce the identical evaluation.
/// Starts at 100 and subtracts a fixed deduction per violated rule.
pub fn evaluate(
    items: &[Item],
    slot: MealSlot,
    profile: &UserProfile,
    items_used_today: &HashSet<String>,
    config: &ScoringConfig,
) -> MealEvaluation {
    let mut score = 100i32;
    let mut reasons = Vec::new();
    let mut issues = Vec::new();

    let classes: Vec<Classification> = items.iter().map(classify).collect();

    match slot {
        MealSlot::Breakfast => {
            if !has_category(&classes, Category::Cereal) && !has_category(&classes, Category::Carbohydrate) {
                score -= BREAKFAST_NO_BASE;
                issues.push("breakfast lacks a cereal or bread base".to_string());
            }
            if !has_category(&classes, Category::Liquid) {
                score -= BREAKFAST_NO_LIQUID;
                issues.push("breakfast lacks a liquid".to_string());
            }
            if profile.goal == Goal::WeightLoss && !has_category(&classes, Category::Fruit) {
                score -= BREAKFAST_NO_FRUIT_WL;
                issues.push("weight-loss breakfast without fruit".to_string());
            } else if has_category(&classes, Category::Fruit) {
                reasons.push("includes fruit".to_string());
            }
        }
        MealSlot::Lunch => {
            if !has_category(&classes, Category::Carbohydrate) {
                score -= LUNCH_NO_CARB;
                issues.push("lunch lacks a carbohydrate".to_string());
            }
            if !has_category(&classes, Category::Protein) {
                score -= LUNCH_NO_PROTEIN;
                issues.push("lunch lacks a protein".to_string());
            }
            if !has_category(&classes, Category::Vegetable) {
                score -= LUNCH_NO_VEGETABLE;
                issues.push("lunch lacks a vegetable".to_string());
            }
            if profile.routine.is_active() && items.len() < 3 {
                score -= LUNCH_TOO_SMALL_ACTIVE;
                issues.push("lunch too small for an active routine".to_string());
            }
            if profile.goal == Goal::WeightLoss
                && !items.iter().any(|i| classifier::is_lean_protein(&i.name))
            {
                score -= LUNCH_NO_LEAN_WL;
                issues.push("weight-loss lunch without lean protein".to_string());
            }
        }
        MealSlot::AfternoonSnack => {
            if mean_digestibility(&classes) < 7.0 {
                score -= SNACK_HARD_TO_DIGEST;
                issues.push("snack is hard to digest".to_string());
            }
            if items.len() > 2 {
                score -= SNACK_TOO_MANY;
                issues.push("snack has too many items".to_string());
            }
        }
        MealSlot::Dinner => {
            let soup_present = items.iter().any(|i| classifier::is_soup_like(&i.name));
            if profile.wants_digestive_comfort() {
                if soup_present {
                    reasons.push("soup-based dinner eases digestion".to_string());
                } else {
                    score -= DINNER_NO_SOUP_COMFORT;
                    issues.push("comfort-oriented dinner without soup or broth".to_string());
                }
            }
            if mean_digestibility(&classes) < 8.0 {
                score -= DINNER_HARD_TO_DIGEST;
                issues.push("dinner is hard to digest".to_string());
            }
            if profile.goal == Goal::WeightLoss
                && items.iter().any(|i| classifier::is_heavy_carb(&i.name))
            {
                score -= DINNER_HEAVY_CARB_WL;
                issues.push("weight-loss dinner with a heavy carbohydrate".to_string());
            }
        }
    }

    // Cross-cutting rules.
    if items.iter().any(|i| items_used_today.contains(&i.usage_key())) {
        score -= REPEATED_ITEM_TODAY;
        issues.push("repeats an item already served today".to_string());
    }

    if !items.is_empty() {
        let goal_fit = classes.iter().filter(|c| c.suits_goal(profile.goal)).count();
        if (goal_fit as f64) < GOAL_FIT_RATIO * items.len() as f64 {
            score -= GOAL_FIT_SHORTFALL;
            issues.push("most items do not fit the goal".to_string());
        } else {
            reasons.push("aligned with the goal".to_string());
        }

        let routine_fit = classes.iter().filter(|c| c.suits_routine(profile.routine)).count();
        if (routine_fit as f64) < ROUTINE_FIT_RATIO * items.len() as f64 {
            score -= ROUTINE_FIT_SHORTFALL;
            issues.push("most items do not fit the routine".to_string());
        }
    }

    if count_category(&classes, Category::Protein) > 2 {
        score -= ANTI_PATTERN;
        issues.push("more than two proteins together".to_string());
    }
    if count_category(&classes, Category::Carbohydrate) > 1 {
        score -= ANTI_PATTERN;
        issues.push("stacked carbohydrates".to_string());
    }
    if slot == MealSlot::Breakfast && items.iter().any(|i| classifier::is_heavy_protein(&i.name)) {
        score -= ANTI_PATTERN;
        issues.push("heavy protein at breakfast".to_string());
    }

    let score = score.max(0);
    MealEvaluation {
        score,
        valid: score >= config.valid_threshold,
        reasons,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ConditionTag;
    use crate::profile::{Routine, Sex};

    fn profile(goal: Goal, routine: Routine) -> UserProfile {
        UserProfile::new(70.0, 165.0, 40, Sex::Female, routine, ConditionTag::Any, goal)
    }

    fn meal(names: &[&str], slot: MealSlot) -> Vec<Item> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Item::new(format!("i{i}"), *n, slot))
            .collect()
    }

    fn eval(items: &[Item], slot: MealSlot, p: &UserProfile) -> MealEvaluation {
        evaluate(items, slot, p, &HashSet::new(), &ScoringConfig::default())
    }

    #[test]
    fn test_complete_breakfast_is_valid() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["oatmeal", "chamomile tea"], MealSlot::Breakfast);
        let e = eval(&items, MealSlot::Breakfast, &p);
        assert!(e.valid, "score {} issues {:?}", e.score, e.issues);
    }

    #[test]
    fn test_breakfast_missing_base_and_liquid_penalized() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["papaya"], MealSlot::Breakfast);
        let e = eval(&items, MealSlot::Breakfast, &p);
        assert!(e.score <= 100 - BREAKFAST_NO_BASE - BREAKFAST_NO_LIQUID);
        assert!(e.issues.iter().any(|i| i.contains("liquid")));
    }

    #[test]
    fn test_full_lunch_scores_high() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(
            &["brown rice", "grilled chicken", "steamed broccoli"],
            MealSlot::Lunch,
        );
        let e = eval(&items, MealSlot::Lunch, &p);
        assert!(e.valid, "score {} issues {:?}", e.score, e.issues);
    }

    #[test]
    fn test_lunch_missing_categories_fails() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["brown rice"], MealSlot::Lunch);
        let e = eval(&items, MealSlot::Lunch, &p);
        assert!(!e.valid);
        assert!(e.issues.iter().any(|i| i.contains("protein")));
        assert!(e.issues.iter().any(|i| i.contains("vegetable")));
    }

    #[test]
    fn test_active_lunch_needs_three_items() {
        let p = profile(Goal::Maintenance, Routine::VeryActive);
        let small = meal(&["brown rice", "grilled chicken"], MealSlot::Lunch);
        let e = eval(&small, MealSlot::Lunch, &p);
        assert!(e.issues.iter().any(|i| i.contains("active")));
    }

    #[test]
    fn test_comfort_dinner_without_soup_penalized() {
        let mut p = profile(Goal::DigestiveComfort, Routine::Sedentary);
        p.condition = ConditionTag::Reflux;
        let no_soup = meal(&["grilled chicken"], MealSlot::Dinner);
        let soup = meal(&["vegetable soup"], MealSlot::Dinner);
        let e_no = eval(&no_soup, MealSlot::Dinner, &p);
        let e_soup = eval(&soup, MealSlot::Dinner, &p);
        assert!(e_soup.score > e_no.score);
        assert!(e_soup.reasons.iter().any(|r| r.contains("soup")));
    }

    #[test]
    fn test_weight_loss_dinner_rejects_heavy_carbs() {
        let p = profile(Goal::WeightLoss, Routine::Sedentary);
        let items = meal(&["pasta with sauce"], MealSlot::Dinner);
        let e = eval(&items, MealSlot::Dinner, &p);
        assert!(e.issues.iter().any(|i| i.contains("heavy carbohydrate")));
    }

    #[test]
    fn test_repeated_item_today_is_heavily_penalized() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["oatmeal", "chamomile tea"], MealSlot::Breakfast);
        let mut used = HashSet::new();
        used.insert(items[0].usage_key());
        let fresh = evaluate(&items, MealSlot::Breakfast, &p, &HashSet::new(), &ScoringConfig::default());
        let repeated = evaluate(&items, MealSlot::Breakfast, &p, &used, &ScoringConfig::default());
        assert_eq!(fresh.score - repeated.score, REPEATED_ITEM_TODAY);
    }

    #[test]
    fn test_anti_pattern_stacked_carbs() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["white rice", "mashed potato salad"], MealSlot::Lunch);
        let e = eval(&items, MealSlot::Lunch, &p);
        assert!(e.issues.iter().any(|i| i.contains("carbohydrates")));
    }

    #[test]
    fn test_heavy_protein_breakfast_anti_pattern() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["bacon", "toast", "coffee"], MealSlot::Breakfast);
        let e = eval(&items, MealSlot::Breakfast, &p);
        assert!(e.issues.iter().any(|i| i.contains("heavy protein")));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let p = profile(Goal::Maintenance, Routine::Sedentary);
        let items = meal(&["oatmeal", "chamomile tea"], MealSlot::Breakfast);
        let used = HashSet::new();
        let cfg = ScoringConfig::default();
        let a = evaluate(&items, MealSlot::Breakfast, &p, &used, &cfg);
        let b = evaluate(&items, MealSlot::Breakfast, &p, &used, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_never_negative() {
        let p = profile(Goal::WeightLoss, Routine::VeryActive);
        let items = meal(&["bacon"], MealSlot::Lunch);
        let mut used = HashSet::new();
        used.insert(items[0].usage_key());
        let e = evaluate(&items, MealSlot::Lunch, &p, &used, &ScoringConfig::default());
        assert!(e.score >= 0);
    }
}
