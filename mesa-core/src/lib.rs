//! mesa-core: constrained weekly menu-composition engine.
//!
//! Given a static food catalog and a user profile, assembles seven days of
//! four coherent meals with day/week/month deduplication, restriction
//! safety, and serving sizes scaled to the user's caloric profile. Pure
//! library: synchronous, no I/O, no global state; the variation registry is
//! an injected dependency.

pub mod catalog;
pub mod classifier;
pub mod coherence;
pub mod composer;
pub mod item;
pub mod plan;
pub mod profile;
pub mod quantity;
pub mod registry;
pub mod restrictions;
pub mod selector;
pub mod tips;

pub use catalog::Catalog;
pub use classifier::{CaloricDensity, Category, Classification, NutritionalProfile, classify};
pub use coherence::{MealEvaluation, ScoringConfig, evaluate};
pub use composer::{MAX_DAY_RETRIES, WeekComposer};
pub use item::{ConditionTag, Item, MealSlot};
pub use plan::{Combination, ComposeError, DayPlan, WeekPlan, combination_hash};
pub use profile::{
    DietType, Goal, Intolerances, MealFrequency, Routine, Sex, UserProfile,
};
pub use quantity::{adjust_quantity, adjustment_factor};
pub use registry::{DayKey, DayRecord, InMemoryRegistry, VariationRegistry};
pub use restrictions::{admissible, filter_admissible, prioritize_preferred};
pub use selector::{MAX_SAMPLES, SelectionContext, select_combination};
pub use tips::tip;
