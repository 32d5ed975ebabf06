// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile stored in Firestore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::goal::{AthleteGoals, Goal};

/// Biological sex, used only to pick the BMR formula constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Activity tier used for TDEE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Light exercise 1-2x/week
    Low,
    /// Exercise 3-4x/week
    Moderate,
    /// Exercise 5-6x/week
    #[default]
    High,
    /// Exercise 6-7x/week plus an active job
    VeryHigh,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Low => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::VeryHigh => 1.9,
        }
    }
}

/// Athlete profile document.
///
/// Stored at: `athletes/{user_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    /// Owner (also used as document ID)
    pub user_id: String,
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub body_fat_percentage: Option<f64>,
    #[serde(default)]
    pub resting_heart_rate: Option<u32>,
    #[serde(default)]
    pub max_heart_rate: Option<u32>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goals: AthleteGoals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs to the macro calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl NutritionProfile {
    /// Reject non-positive body metrics.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("weight_kg", self.weight_kg)?;
        positive("height_cm", self.height_cm)?;
        positive("age", f64::from(self.age))?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Fields collected at onboarding.
#[derive(Debug, Clone)]
pub struct NewAthlete {
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub resting_heart_rate: Option<u32>,
    pub max_heart_rate: Option<u32>,
}

impl Athlete {
    /// Create a new athlete with the default maintenance goal.
    ///
    /// Max heart rate falls back to `220 - age`.
    pub fn create(
        user_id: impl Into<String>,
        new: NewAthlete,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let athlete = Self {
            user_id: user_id.into(),
            name: new.name,
            weight_kg: new.weight_kg,
            height_cm: new.height_cm,
            age: new.age,
            sex: new.sex,
            body_fat_percentage: None,
            resting_heart_rate: new.resting_heart_rate,
            max_heart_rate: Some(
                new.max_heart_rate
                    .unwrap_or_else(|| 220u32.saturating_sub(new.age)),
            ),
            activity_level: new.activity_level,
            goals: AthleteGoals::default(),
            created_at: now,
            updated_at: now,
        };
        athlete.validate()?;
        Ok(athlete)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.nutrition_profile().validate()
    }

    pub fn nutrition_profile(&self) -> NutritionProfile {
        NutritionProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            sex: self.sex,
            activity_level: self.activity_level,
        }
    }

    pub fn update_weight(
        &mut self,
        weight_kg: f64,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        positive("weight_kg", weight_kg)?;
        self.weight_kg = weight_kg;
        self.updated_at = now;
        Ok(())
    }

    /// Record a body-composition measurement on the profile.
    pub fn apply_body_composition(
        &mut self,
        weight_kg: f64,
        body_fat_percentage: f64,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.update_weight(weight_kg, now)?;
        self.body_fat_percentage = Some(body_fat_percentage);
        Ok(())
    }

    pub fn set_primary_goal(&mut self, goal: Goal, now: DateTime<Utc>) {
        self.goals.primary = goal;
        self.updated_at = now;
    }

    pub fn set_secondary_goal(&mut self, goal: Option<Goal>, now: DateTime<Utc>) {
        self.goals.secondary = goal;
        self.updated_at = now;
    }
}
