//! Combination selector: bounded pseudo-random search for the best
//! non-repeating meal for a slot.
//!
//! Absence of a solution is a first-class `None`, never an error: callers
//! own the fallback policy. The sampling budget is finite so a generation
//! call always terminates.

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::coherence::{ScoringConfig, evaluate};
use crate::item::{Item, MealSlot};
use crate::plan::combination_hash;
use crate::profile::UserProfile;

/// Sampling attempts per selection. The de facto runtime bound of the
/// engine; must stay finite.
pub const MAX_SAMPLES: usize = 150;

/// Usage horizons consulted during selection.
///
/// Day and week sets hold usage keys (name + quantity); the month set holds
/// bare lowercased names, since month history is recovered from registry
/// hashes which only carry names.
#[derive(Debug, Default)]
pub struct SelectionContext {
    pub used_today: HashSet<String>,
    pub used_this_week: HashSet<String>,
    pub used_this_month: HashSet<String>,
    /// Combination hashes to avoid (current week plus month history).
    pub used_combos: HashSet<String>,
}

#[derive(Debug)]
struct ScoredCandidate {
    items: Vec<Item>,
    total: i32,
    valid: bool,
}

fn variety_bonus(items: &[Item], ctx: &SelectionContext, config: &ScoringConfig) -> i32 {
    items
        .iter()
        .map(|i| {
            let mut bonus = 0;
            if !ctx.used_this_week.contains(&i.usage_key()) {
                bonus += config.weekly_variety_bonus;
            }
            if !ctx.used_this_month.contains(&i.name.to_lowercase()) {
                bonus += config.monthly_variety_bonus;
            }
            bonus
        })
        .sum()
}

/// Pick the best combination of `quantity` items for a slot, or `None` when
/// the sampling budget yields nothing scoring at least the acceptable
/// threshold.
pub fn select_combination(
    candidates: &[Item],
    slot: MealSlot,
    profile: &UserProfile,
    quantity: usize,
    ctx: &SelectionContext,
    config: &ScoringConfig,
    rng: &mut StdRng,
) -> Option<Vec<Item>> {
    if quantity == 0 || candidates.len() < quantity {
        return None;
    }

    // Never serve the same item twice in one day.
    let available: Vec<Item> = candidates
        .iter()
        .filter(|i| !ctx.used_today.contains(&i.usage_key()))
        .cloned()
        .collect();
    if available.len() < quantity {
        debug!(slot = slot.label(), "not enough unused-today candidates");
        return None;
    }

    // Prefer the month-fresh subset when it can still fill the meal.
    let fresh: Vec<Item> = available
        .iter()
        .filter(|i| !ctx.used_this_month.contains(&i.name.to_lowercase()))
        .cloned()
        .collect();
    let pool = if fresh.len() >= quantity { fresh } else { available };

    // Bounded sampling, deduplicated by content hash. BTreeMap keeps the
    // candidate order stable so equal scores resolve the same way for the
    // same seed.
    let mut sampled: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    let mut deck = pool.clone();
    for _ in 0..MAX_SAMPLES {
        deck.shuffle(rng);
        let combo: Vec<Item> = deck[..quantity].to_vec();
        sampled.entry(combination_hash(&combo)).or_insert(combo);
    }

    // Drop combinations already served this week/month; if that empties the
    // pool, fall back to the unfiltered set rather than failing outright.
    let unfiltered: Vec<(String, Vec<Item>)> = sampled.into_iter().collect();
    let filtered: Vec<(String, Vec<Item>)> = unfiltered
        .iter()
        .filter(|(hash, _)| !ctx.used_combos.contains(hash))
        .cloned()
        .collect();
    let survivors = if filtered.is_empty() { unfiltered } else { filtered };

    let mut scored: Vec<ScoredCandidate> = survivors
        .into_iter()
        .map(|(_, items)| {
            let eval = evaluate(&items, slot, profile, &ctx.used_today, config);
            let total = eval.score + variety_bonus(&items, ctx, config);
            trace!(slot = slot.label(), total, valid = eval.valid, "scored candidate");
            ScoredCandidate { items, total, valid: eval.valid }
        })
        .collect();

    scored.sort_by(|a, b| b.total.cmp(&a.total));

    if let Some(best) = scored.iter().find(|c| c.valid) {
        return Some(best.items.clone());
    }
    scored
        .into_iter()
        .find(|c| c.total >= config.acceptable_threshold)
        .map(|c| c.items)
}
