//! User profile: body metrics, routine, goal, and dietary restrictions.
//!
//! Supplied per generation call by the host; the engine never persists it.

use serde::{Deserialize, Serialize};

use crate::item::ConditionTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// Activity routine, coarse buckets used for both the metabolic activity
/// factor and the routine-suitability scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routine {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl Routine {
    pub fn is_active(&self) -> bool {
        matches!(self, Routine::Active | Routine::VeryActive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    DigestiveComfort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
}

/// How many meals the user actually wants to sit down for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealFrequency {
    Standard,
    Light,
}

/// Allergy / intolerance flags. Each flag maps to one independent exclusion
/// predicate in the restriction filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intolerances {
    #[serde(default)]
    pub lactose: bool,
    #[serde(default)]
    pub gluten: bool,
    #[serde(default)]
    pub nuts: bool,
    #[serde(default)]
    pub seafood: bool,
    #[serde(default)]
    pub eggs: bool,
}

impl Intolerances {
    pub fn any(&self) -> bool {
        self.lactose || self.gluten || self.nuts || self.seafood || self.eggs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Kilograms.
    pub weight: f64,
    /// Centimeters.
    pub height: f64,
    pub age: u32,
    pub sex: Sex,
    pub routine: Routine,
    pub condition: ConditionTag,
    pub goal: Goal,

    #[serde(default)]
    pub intolerances: Intolerances,
    #[serde(default)]
    pub diet: Option<DietType>,
    /// Reported GI symptoms (free text, lowercased on use).
    #[serde(default)]
    pub gi_symptoms: Vec<String>,
    /// Case-insensitive substrings; matching items are boosted to the front.
    #[serde(default)]
    pub liked_foods: Vec<String>,
    /// Case-insensitive substrings; matching items are always excluded.
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub meal_frequency: Option<MealFrequency>,
}

impl UserProfile {
    pub fn new(
        weight: f64,
        height: f64,
        age: u32,
        sex: Sex,
        routine: Routine,
        condition: ConditionTag,
        goal: Goal,
    ) -> Self {
        Self {
            weight,
            height,
            age,
            sex,
            routine,
            condition,
            goal,
            intolerances: Intolerances::default(),
            diet: None,
            gi_symptoms: Vec::new(),
            liked_foods: Vec::new(),
            disliked_foods: Vec::new(),
            meal_frequency: None,
        }
    }

    pub fn with_intolerances(mut self, intolerances: Intolerances) -> Self {
        self.intolerances = intolerances;
        self
    }

    pub fn with_diet(mut self, diet: DietType) -> Self {
        self.diet = Some(diet);
        self
    }

    pub fn with_likes(mut self, liked: Vec<String>) -> Self {
        self.liked_foods = liked;
        self
    }

    pub fn with_dislikes(mut self, disliked: Vec<String>) -> Self {
        self.disliked_foods = disliked;
        self
    }

    pub fn with_gi_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.gi_symptoms = symptoms;
        self
    }

    pub fn with_meal_frequency(mut self, frequency: MealFrequency) -> Self {
        self.meal_frequency = Some(frequency);
        self
    }

    /// Whether dinner should lean on the light/soup end of the pool.
    pub fn wants_digestive_comfort(&self) -> bool {
        self.goal == Goal::DigestiveComfort
            || self.condition != ConditionTag::Any
            || !self.gi_symptoms.is_empty()
    }

    /// True when the profile imposes no filtering at all.
    pub fn unrestricted(&self) -> bool {
        !self.intolerances.any()
            && self.diet.is_none()
            && self.gi_symptoms.is_empty()
            && self.disliked_foods.is_empty()
            && self.condition == ConditionTag::Any
    }
}
