// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod athlete;
pub mod body_composition;
pub mod goal;
pub mod integrations;
pub mod nutrition;
pub mod plan;
pub mod strength;

pub use athlete::{ActivityLevel, Athlete, NewAthlete, NutritionProfile, Sex};
pub use body_composition::BodyCompositionEntry;
pub use goal::{
    AthleteGoals, BodyCompFocus, BodyCompositionGoal, DistanceUnit, EnduranceGoal, FitnessLevel,
    Goal, LiftTargets, RaceDistance, Sport, StrengthFocus, StrengthGoal,
};
pub use integrations::{CachedActivity, HevyCredentials, StravaTokens};
pub use nutrition::{DayType, FoodEntry, MacroPercentages, MacroTargets, MacroTotals, NutritionDay};
pub use plan::{DistanceCategory, PhaseName, PlanWeek, TrainingPhase, TrainingPlan};
pub use strength::{
    Exercise, MuscleGroup, StrengthRecommendation, StrengthRoutine, StrengthWeek,
};
