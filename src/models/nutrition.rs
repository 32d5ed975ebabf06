// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food log and macro records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logged food item. Never mutated after creation, only removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Entry ID, unique within the day
    pub id: String,
    /// Source food ID ("manual_..." for hand-entered items)
    pub food_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// All food entries for one user-day.
///
/// Stored at: `food_logs/{user_id}_{date}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionDay {
    pub user_id: String,
    /// "YYYY-MM-DD"
    pub date: String,
    #[serde(default)]
    pub entries: Vec<FoodEntry>,
}

/// Accumulated (or remaining) macros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: Option<f64>,
}

/// Computed daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
    pub fiber: i32,
}

impl fmt::Display for MacroTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kcal | P: {}g | C: {}g | F: {}g",
            self.calories.round(),
            self.protein.round(),
            self.carbs.round(),
            self.fat.round()
        )
    }
}

impl From<MacroTargets> for MacroTotals {
    fn from(t: MacroTargets) -> Self {
        Self {
            calories: f64::from(t.calories),
            protein: f64::from(t.protein),
            carbs: f64::from(t.carbs),
            fat: f64::from(t.fat),
            fiber: Some(f64::from(t.fiber)),
        }
    }
}

/// Share of energy from each macro, in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Training-day classification driving macro targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// 90+ min endurance
    LongRun,
    /// Intervals, tempo
    Quality,
    /// Recovery or easy session
    Easy,
    /// Gym day
    Strength,
    /// Complete rest
    Rest,
    /// Week of the race
    RaceWeek,
    /// Race day
    RaceDay,
    /// High-volume strength day
    HighVolume,
    /// Recovery week
    Deload,
}

impl DayType {
    pub const ALL: [DayType; 9] = [
        DayType::LongRun,
        DayType::Quality,
        DayType::Easy,
        DayType::Strength,
        DayType::Rest,
        DayType::RaceWeek,
        DayType::RaceDay,
        DayType::HighVolume,
        DayType::Deload,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::LongRun => "long_run",
            DayType::Quality => "quality",
            DayType::Easy => "easy",
            DayType::Strength => "strength",
            DayType::Rest => "rest",
            DayType::RaceWeek => "race_week",
            DayType::RaceDay => "race_day",
            DayType::HighVolume => "high_volume",
            DayType::Deload => "deload",
        }
    }

    /// Unknown day types fall back to `easy`, the baseline table row.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(day_type = raw, "Unknown day type, using easy");
            DayType::Easy
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day type: {0}")]
pub struct UnknownDayType(pub String);

impl FromStr for DayType {
    type Err = UnknownDayType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownDayType(s.to_string()))
    }
}
