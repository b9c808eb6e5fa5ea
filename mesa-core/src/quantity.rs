//! Serving-size scaling from the user's caloric profile.

use std::sync::OnceLock;

use regex::Regex;

use crate::profile::{Goal, Routine, Sex, UserProfile};

/// Reference daily intake the catalog's serving sizes are calibrated to.
const BASELINE_KCAL: f64 = 2000.0;

/// How strongly the caloric gap moves the factor away from 1.0. Serving
/// strings are coarse, so the factor tracks the gap softly rather than
/// linearly.
const GAP_DAMPING: f64 = 0.2;

const FACTOR_MIN: f64 = 0.7;
const FACTOR_MAX: f64 = 1.3;

/// Below this distance from 1.0 the rescale is a no-op.
const NOOP_BAND: f64 = 0.1;

fn activity_factor(routine: Routine) -> f64 {
    match routine {
        Routine::Sedentary => 1.2,
        Routine::Light => 1.375,
        Routine::Moderate => 1.55,
        Routine::Active => 1.725,
        Routine::VeryActive => 1.9,
    }
}

fn goal_adjustment(goal: Goal) -> f64 {
    match goal {
        Goal::WeightLoss => 0.85,
        Goal::DigestiveComfort => 0.95,
        Goal::Maintenance => 1.0,
    }
}

/// Mifflin-St Jeor basal metabolic estimate, kcal/day.
fn basal_metabolic_rate(weight: f64, height: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Scalar serving-size factor for a profile, clamped to [0.7, 1.3].
pub fn adjustment_factor(profile: &UserProfile) -> f64 {
    let bmr = basal_metabolic_rate(profile.weight, profile.height, profile.age, profile.sex);
    let target = bmr * activity_factor(profile.routine) * goal_adjustment(profile.goal);
    let raw = target / BASELINE_KCAL;
    let factor = 1.0 + (raw - 1.0) * GAP_DAMPING;
    factor.clamp(FACTOR_MIN, FACTOR_MAX)
}

/// Units where fractional servings make no sense, as (singular, plural).
const DISCRETE_UNIT_FORMS: &[(&str, &str)] = &[
    ("slice", "slices"),
    ("fatia", "fatias"),
    ("unit", "units"),
    ("unidade", "unidades"),
    ("spoon", "spoons"),
    ("colher", "colheres"),
    ("plate", "plates"),
    ("scoop", "scoops"),
];

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*(.*)$").unwrap())
}

fn is_discrete_unit(unit: &str) -> bool {
    let unit = unit.to_lowercase();
    DISCRETE_UNIT_FORMS
        .iter()
        .any(|(one, _)| unit.starts_with(one) || unit.contains(&format!(" {one}")))
}

/// Unit text agreeing in number with the adjusted count ("1 slice",
/// "3 slices"). Unit text not led by a known form passes through unchanged.
fn unit_for_count(unit: &str, count: i64) -> String {
    let lower = unit.to_lowercase();
    for (one, many) in DISCRETE_UNIT_FORMS {
        let matched = if lower.starts_with(many) {
            many.len()
        } else if lower.starts_with(one) {
            one.len()
        } else {
            continue;
        };
        let form = if count == 1 { *one } else { *many };
        return format!("{form}{}", &unit[matched..]);
    }
    unit.to_string()
}

fn format_continuous(value: f64) -> String {
    // One decimal for small amounts, whole numbers once quantities are
    // clearly measured in grams/milliliters.
    if value >= 10.0 {
        format!("{}", value.round() as i64)
    } else {
        let rounded = (value * 10.0).round() / 10.0;
        if (rounded - rounded.trunc()).abs() < f64::EPSILON {
            format!("{}", rounded.trunc() as i64)
        } else {
            format!("{rounded:.1}")
        }
    }
}

/// Rescale a serving string like "120g" or "2 slices".
///
/// Near-1.0 factors and unparseable strings return the input unchanged;
/// this function never fails.
pub fn adjust_quantity(quantity: &str, factor: f64) -> String {
    if (factor - 1.0).abs() < NOOP_BAND {
        return quantity.to_string();
    }

    let Some(caps) = quantity_regex().captures(quantity) else {
        return quantity.to_string();
    };
    let magnitude: f64 = match caps[1].replace(',', ".").parse() {
        Ok(m) => m,
        Err(_) => return quantity.to_string(),
    };
    let unit = caps[2].to_string();

    if is_discrete_unit(&unit) {
        let count = magnitude.round() as i64;
        let adjusted = if factor >= 1.2 {
            count + 1
        } else if factor <= 0.8 {
            (count - 1).max(1)
        } else {
            count
        };
        if adjusted == count {
            return quantity.to_string();
        }
        return format!("{adjusted} {}", unit_for_count(unit.trim(), adjusted));
    }

    let scaled = format_continuous(magnitude * factor);
    if unit.is_empty() {
        scaled
    } else if unit.chars().next().is_some_and(|c| c.is_alphabetic()) && unit.len() <= 2 {
        // Compact metric suffixes keep their glued form ("120g", "200ml").
        format!("{scaled}{unit}")
    } else {
        format!("{scaled} {}", unit.trim())
    }
}
