//! Day/week composer: drives filtering, selection, deduplication, quantity
//! scaling and tips into a full seven-day plan.
//!
//! Each meal goes through an explicit ladder of strategies: primary
//! selection with full dedup, a registry reset when the monthly pool is
//! genuinely exhausted, then a category-guaranteed pick. Any slot that
//! survives none of them fails the whole week; the engine never returns a
//! partially coherent plan.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::classifier::{self, CaloricDensity, Category, classify};
use crate::coherence::ScoringConfig;
use crate::item::{Item, MealSlot};
use crate::plan::{Combination, ComposeError, DayPlan, WeekPlan, combination_hash};
use crate::profile::{Goal, MealFrequency, UserProfile};
use crate::quantity::{adjust_quantity, adjustment_factor};
use crate::registry::{DayKey, VariationRegistry, month_hashes_for_slot, month_item_names};
use crate::restrictions::{filter_admissible, prioritize_preferred};
use crate::selector::{SelectionContext, select_combination};
use crate::tips::tip;

/// Upper bound on whole-day regenerations when a day duplicates one already
/// served this month. Together with the selector's sampling budget this
/// bounds a generation call's runtime.
pub const MAX_DAY_RETRIES: usize = 100;

/// Which rung of the fallback ladder produced a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionStrategy {
    Primary,
    RegistryReset,
    CategoryGuaranteed,
}

/// Usage accumulated while a week is being assembled.
#[derive(Debug, Default)]
struct WeekState {
    /// name+quantity keys served so far this week.
    used_keys: HashSet<String>,
    /// Lowercased names served so far this week.
    used_names: HashSet<String>,
    /// Per-slot combination hashes, indexed in [`MealSlot::ALL`] order.
    slot_hashes: [HashSet<String>; 4],
}

fn slot_index(slot: MealSlot) -> usize {
    MealSlot::ALL.iter().position(|s| *s == slot).unwrap_or(0)
}

struct DayBuild {
    breakfast: Combination,
    lunch: Combination,
    afternoon_snack: Combination,
    dinner: Combination,
}

impl DayBuild {
    fn hashes(&self) -> [String; 4] {
        [
            self.breakfast.hash.clone(),
            self.lunch.hash.clone(),
            self.afternoon_snack.hash.clone(),
            self.dinner.hash.clone(),
        ]
    }

    fn meals(&self) -> [&Combination; 4] {
        [&self.breakfast, &self.lunch, &self.afternoon_snack, &self.dinner]
    }
}

/// Builds one week of four-meal days against an injected registry.
#[derive(Debug, Clone)]
pub struct WeekComposer {
    catalog: Catalog,
    config: ScoringConfig,
    seed: Option<u64>,
}

impl WeekComposer {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, config: ScoringConfig::default(), seed: None }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the sampling seed for reproducible plans.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate a full week starting at `start` (day 0 of the plan).
    ///
    /// Either all seven days assemble coherently or the call fails as a
    /// whole; no partial plan escapes. Day records and exhaustion clears are
    /// buffered and only written to the registry once all seven days have
    /// assembled, so a failed call leaves the registry untouched.
    pub fn compose_week<R: VariationRegistry>(
        &self,
        profile: &UserProfile,
        start: NaiveDate,
        registry: &mut R,
    ) -> Result<WeekPlan, ComposeError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let factor = adjustment_factor(profile);
        let mut state = WeekState::default();
        let mut days = Vec::with_capacity(7);
        let mut pending: Vec<(DayKey, [String; 4])> = Vec::new();
        let mut cleared: HashSet<(u32, i32)> = HashSet::new();

        for weekday in 0..7 {
            let date = start
                .checked_add_days(Days::new(weekday as u64))
                .unwrap_or(start);
            let key = DayKey::from_date(date);
            let feast = date.weekday() == Weekday::Sun;

            let day = self
                .build_unique_day(
                    profile, weekday, key, feast, &state, registry, &pending, &mut cleared,
                    &mut rng,
                )
                .map_err(|source| ComposeError::WeekAssemblyFailed {
                    source: Box::new(ComposeError::DayAssemblyFailed {
                        weekday,
                        source: Box::new(source),
                    }),
                })?;

            // Commit: bookkeeping first (catalog quantities), then the
            // buffered record, then the host-facing adjusted plan.
            for meal in day.meals() {
                let idx = slot_index(meal.slot);
                state.slot_hashes[idx].insert(meal.hash.clone());
                for item in &meal.items {
                    state.used_keys.insert(item.usage_key());
                    state.used_names.insert(item.name.to_lowercase());
                }
            }
            pending.push((key, day.hashes()));

            days.push(self.finish_day(day, weekday, factor));
            debug!(weekday, date = %date, "day assembled");
        }

        // All seven days assembled; flush the buffered registry mutations.
        for (month, year) in cleared {
            registry.clear_month(month, year);
        }
        for (key, hashes) in pending {
            registry.record_day(key, hashes);
        }

        Ok(WeekPlan {
            days,
            notes: format!(
                "Week starting {start}; servings scaled by {factor:.2} for the profile."
            ),
        })
    }

    /// Build a day, regenerating (bounded) while its exact combination of
    /// meals was already served this month (in the registry or in the
    /// not-yet-flushed buffer).
    #[allow(clippy::too_many_arguments)]
    fn build_unique_day<R: VariationRegistry>(
        &self,
        profile: &UserProfile,
        weekday: usize,
        key: DayKey,
        feast: bool,
        state: &WeekState,
        registry: &R,
        pending: &[(DayKey, [String; 4])],
        cleared: &mut HashSet<(u32, i32)>,
        rng: &mut StdRng,
    ) -> Result<DayBuild, ComposeError> {
        let mut day = self.build_day(profile, key, feast, state, registry, cleared, rng)?;
        let mut retries = 0;
        while day_repeats_this_month(&day.hashes(), key, registry, pending, cleared)
            && retries < MAX_DAY_RETRIES
        {
            retries += 1;
            trace!(weekday, retries, "day already served this month, regenerating");
            day = self.build_day(profile, key, feast, state, registry, cleared, rng)?;
        }
        Ok(day)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_day<R: VariationRegistry>(
        &self,
        profile: &UserProfile,
        key: DayKey,
        feast: bool,
        state: &WeekState,
        registry: &R,
        cleared: &mut HashSet<(u32, i32)>,
        rng: &mut StdRng,
    ) -> Result<DayBuild, ComposeError> {
        let mut used_today: HashSet<String> = HashSet::new();

        let breakfast = self.build_meal(
            MealSlot::Breakfast,
            profile,
            feast,
            &used_today,
            state,
            key,
            registry,
            cleared,
            rng,
        )?;
        for item in &breakfast.items {
            used_today.insert(item.usage_key());
        }

        let lunch = self.build_meal(
            MealSlot::Lunch,
            profile,
            feast,
            &used_today,
            state,
            key,
            registry,
            cleared,
            rng,
        )?;
        for item in &lunch.items {
            used_today.insert(item.usage_key());
        }

        let afternoon_snack = self.build_meal(
            MealSlot::AfternoonSnack,
            profile,
            feast,
            &used_today,
            state,
            key,
            registry,
            cleared,
            rng,
        )?;
        for item in &afternoon_snack.items {
            used_today.insert(item.usage_key());
        }

        let dinner = self.build_meal(
            MealSlot::Dinner,
            profile,
            feast,
            &used_today,
            state,
            key,
            registry,
            cleared,
            rng,
        )?;

        Ok(DayBuild { breakfast, lunch, afternoon_snack, dinner })
    }

    /// Candidate pools for a slot, most preferred first.
    fn pools_for(
        &self,
        slot: MealSlot,
        profile: &UserProfile,
    ) -> Result<Vec<Vec<Item>>, ComposeError> {
        let raw = self.catalog.items_for(slot, &[profile.condition]);
        let admissible = prioritize_preferred(filter_admissible(raw, profile), profile);
        if admissible.is_empty() {
            return Err(ComposeError::EmptyCatalogForSlot { slot: slot.label() });
        }

        if slot == MealSlot::Dinner {
            let mut pools = Vec::new();
            if profile.wants_digestive_comfort() {
                let soups: Vec<Item> = admissible
                    .iter()
                    .filter(|i| classifier::is_soup_like(&i.name))
                    .cloned()
                    .collect();
                if !soups.is_empty() {
                    pools.push(soups);
                }
            }
            // Dinner leans on the easy-digest subset whenever it can fill
            // the meal; the full pool stays as the last resort.
            let easy: Vec<Item> = admissible
                .iter()
                .filter(|i| classify(i).digestibility >= 8)
                .cloned()
                .collect();
            if !easy.is_empty() {
                pools.push(easy);
            }
            pools.push(admissible);
            return Ok(pools);
        }
        Ok(vec![admissible])
    }

    /// Item counts to attempt for a slot, preferred first.
    fn quantities_for(&self, slot: MealSlot, profile: &UserProfile, feast: bool) -> Vec<usize> {
        match slot {
            MealSlot::Breakfast => {
                if profile.goal == Goal::WeightLoss {
                    vec![3, 2]
                } else {
                    vec![2]
                }
            }
            MealSlot::Lunch => {
                if feast || profile.routine.is_active() {
                    vec![4, 3]
                } else {
                    vec![3]
                }
            }
            MealSlot::AfternoonSnack => {
                if profile.routine.is_active()
                    && profile.meal_frequency != Some(MealFrequency::Light)
                {
                    vec![2, 1]
                } else {
                    vec![1]
                }
            }
            MealSlot::Dinner => vec![2, 1],
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_meal<R: VariationRegistry>(
        &self,
        slot: MealSlot,
        profile: &UserProfile,
        feast: bool,
        used_today: &HashSet<String>,
        state: &WeekState,
        key: DayKey,
        registry: &R,
        cleared: &mut HashSet<(u32, i32)>,
        rng: &mut StdRng,
    ) -> Result<Combination, ComposeError> {
        let pools = self.pools_for(slot, profile)?;
        let quantities = self.quantities_for(slot, profile, feast);
        let idx = slot_index(slot);
        let week_hashes = &state.slot_hashes[idx];

        // A month scheduled for clearing contributes no history.
        let month_cleared = cleared.contains(&(key.month, key.year));
        let month_names = if month_cleared {
            HashSet::new()
        } else {
            month_item_names(registry, key.month, key.year)
        };
        let month_hashes = if month_cleared {
            HashSet::new()
        } else {
            month_hashes_for_slot(registry, slot, key.month, key.year)
        };

        // Rung 1: primary selection with the full dedup context. A result
        // whose hash is still in the forbidden set means the selector had to
        // fall back to reuse, which reads as month exhaustion here.
        let forbidden: HashSet<String> = month_hashes.union(week_hashes).cloned().collect();
        let full_ctx = SelectionContext {
            used_today: used_today.clone(),
            used_this_week: state.used_keys.clone(),
            used_this_month: month_names.union(&state.used_names).cloned().collect(),
            used_combos: forbidden.clone(),
        };
        if let Some(items) =
            self.try_rungs(slot, &pools, &quantities, profile, &full_ctx, &forbidden, rng)
        {
            return Ok(Combination::new(slot, items));
        }

        // Rung 2: the month pool is exhausted for this slot. Schedule the
        // month for clearing so repetition can resume, then retry without
        // month history (the week-in-progress constraints still hold). The
        // clear itself is applied when the week commits.
        let reset_ctx = SelectionContext {
            used_today: used_today.clone(),
            used_this_week: state.used_keys.clone(),
            used_this_month: state.used_names.clone(),
            used_combos: week_hashes.clone(),
        };
        if let Some(items) =
            self.try_rungs(slot, &pools, &quantities, profile, &reset_ctx, week_hashes, rng)
        {
            debug!(
                slot = slot.label(),
                strategy = ?SelectionStrategy::RegistryReset,
                "monthly pool exhausted, month clear scheduled"
            );
            cleared.insert((key.month, key.year));
            return Ok(Combination::new(slot, items));
        }

        // Rung 3: assemble an explicit category-guaranteed meal.
        let general_pool = pools.last().map(Vec::as_slice).unwrap_or(&[]);
        if let Some(items) = guaranteed_fallback(slot, general_pool, used_today, week_hashes) {
            debug!(
                slot = slot.label(),
                strategy = ?SelectionStrategy::CategoryGuaranteed,
                "selection fell through to category fallback"
            );
            return Ok(Combination::new(slot, items));
        }

        Err(ComposeError::NoCoherentCombination { slot: slot.label() })
    }

    /// Run the selector over every pool/quantity pair, most preferred first,
    /// rejecting anything whose hash is in the forbidden set.
    #[allow(clippy::too_many_arguments)]
    fn try_rungs(
        &self,
        slot: MealSlot,
        pools: &[Vec<Item>],
        quantities: &[usize],
        profile: &UserProfile,
        ctx: &SelectionContext,
        forbidden: &HashSet<String>,
        rng: &mut StdRng,
    ) -> Option<Vec<Item>> {
        for pool in pools {
            for &quantity in quantities {
                let picked =
                    select_combination(pool, slot, profile, quantity, ctx, &self.config, rng);
                if let Some(items) = picked {
                    if !forbidden.contains(&combination_hash(&items)) {
                        trace!(
                            slot = slot.label(),
                            strategy = ?SelectionStrategy::Primary,
                            quantity,
                            "combination accepted"
                        );
                        return Some(items);
                    }
                }
            }
        }
        None
    }

    /// Rescale servings and attach one tip per meal.
    fn finish_day(&self, day: DayBuild, weekday: usize, factor: f64) -> DayPlan {
        let adjust = |combo: Combination| -> Combination {
            let items: Vec<Item> = combo
                .items
                .into_iter()
                .map(|mut item| {
                    item.quantity = adjust_quantity(&item.quantity, factor);
                    item
                })
                .collect();
            Combination::new(combo.slot, items)
        };

        let breakfast = adjust(day.breakfast);
        let lunch = adjust(day.lunch);
        let afternoon_snack = adjust(day.afternoon_snack);
        let dinner = adjust(day.dinner);

        let tips = [
            tip(&breakfast.items, MealSlot::Breakfast),
            tip(&lunch.items, MealSlot::Lunch),
            tip(&afternoon_snack.items, MealSlot::AfternoonSnack),
            tip(&dinner.items, MealSlot::Dinner),
        ];

        DayPlan { weekday, breakfast, lunch, afternoon_snack, dinner, tips }
    }
}

/// Whether this exact day (all four slot hashes) was already served this
/// month, counting the buffered days of the week in progress and skipping
/// registry months scheduled for clearing.
fn day_repeats_this_month<R: VariationRegistry>(
    hashes: &[String; 4],
    key: DayKey,
    registry: &R,
    pending: &[(DayKey, [String; 4])],
    cleared: &HashSet<(u32, i32)>,
) -> bool {
    let in_registry = !cleared.contains(&(key.month, key.year))
        && registry.day_used_this_month(hashes, key.month, key.year);
    in_registry
        || pending
            .iter()
            .any(|(k, h)| k.month == key.month && k.year == key.year && h == hashes)
}

/// Deterministic category-guaranteed meal, the last rung before failure.
///
/// Walks the pool in its (preference-ordered) sequence and picks the first
/// unused representative per required category; `offset` shifts the picks
/// when the first choice would repeat a weekly hash.
fn guaranteed_fallback(
    slot: MealSlot,
    pool: &[Item],
    used_today: &HashSet<String>,
    week_hashes: &HashSet<String>,
) -> Option<Vec<Item>> {
    let available: Vec<&Item> =
        pool.iter().filter(|i| !used_today.contains(&i.usage_key())).collect();

    for offset in 0..4 {
        let items = match slot {
            MealSlot::Breakfast => pick_categories(
                &available,
                &[
                    &[Category::Cereal, Category::Carbohydrate],
                    &[Category::Liquid],
                ],
                offset,
            ),
            MealSlot::Lunch => pick_categories(
                &available,
                &[
                    &[Category::Carbohydrate],
                    &[Category::Protein],
                    &[Category::Vegetable],
                ],
                offset,
            ),
            MealSlot::AfternoonSnack => {
                pick_categories(&available, &[&[Category::Fruit, Category::Liquid]], offset)
                    .or_else(|| available.get(offset).map(|i| vec![(*i).clone()]))
            }
            MealSlot::Dinner => {
                let soup = available
                    .iter()
                    .filter(|i| classifier::is_soup_like(&i.name))
                    .nth(offset)
                    .map(|i| vec![(*i).clone()]);
                soup.or_else(|| {
                    available
                        .iter()
                        .filter(|i| classify(i).density == CaloricDensity::Low)
                        .nth(offset)
                        .map(|i| vec![(*i).clone()])
                })
                .or_else(|| available.get(offset).map(|i| vec![(*i).clone()]))
            }
        };

        if let Some(items) = items {
            if !week_hashes.contains(&combination_hash(&items)) {
                return Some(items);
            }
        }
    }
    None
}

/// One item per category group, each group's `offset`-th match, no reuse
/// across groups.
fn pick_categories(
    available: &[&Item],
    groups: &[&[Category]],
    offset: usize,
) -> Option<Vec<Item>> {
    let mut picked: Vec<Item> = Vec::with_capacity(groups.len());
    for group in groups {
        let found = available
            .iter()
            .filter(|i| {
                group.contains(&classify(i).category)
                    && !picked.iter().any(|p| p.usage_key() == i.usage_key())
            })
            .nth(offset)
            .or_else(|| {
                available.iter().find(|i| {
                    group.contains(&classify(i).category)
                        && !picked.iter().any(|p| p.usage_key() == i.usage_key())
                })
            })?;
        picked.push((*found).clone());
    }
    Some(picked)
}
