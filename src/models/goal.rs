// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete goals: endurance, strength and body composition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An athlete objective. Stored with a `type` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Goal {
    Endurance(EnduranceGoal),
    Strength(StrengthGoal),
    BodyComposition(BodyCompositionGoal),
}

impl Goal {
    /// Discriminant as stored ("endurance", "strength", "body_composition").
    pub fn kind(&self) -> &'static str {
        match self {
            Goal::Endurance(_) => "endurance",
            Goal::Strength(_) => "strength",
            Goal::BodyComposition(_) => "body_composition",
        }
    }

    pub fn as_endurance(&self) -> Option<&EnduranceGoal> {
        match self {
            Goal::Endurance(goal) => Some(goal),
            _ => None,
        }
    }

    /// Target date, whichever variant carries it.
    pub fn target_date(&self) -> Option<NaiveDate> {
        match self {
            Goal::Endurance(g) => g.target_date,
            Goal::Strength(g) => g.target_date,
            Goal::BodyComposition(g) => g.target_date,
        }
    }

    /// Default goal assigned at onboarding.
    pub fn maintenance() -> Self {
        Goal::BodyComposition(BodyCompositionGoal {
            focus: BodyCompFocus::Maintenance,
            target_date: None,
            target_weight_kg: None,
            target_body_fat: None,
        })
    }
}

/// Primary goal drives every calculation; the secondary one is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteGoals {
    pub primary: Goal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Goal>,
}

impl Default for AthleteGoals {
    fn default() -> Self {
        Self {
            primary: Goal::maintenance(),
            secondary: None,
        }
    }
}

// ─── Endurance ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnduranceGoal {
    pub sport: Sport,
    pub distance: RaceDistance,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// Target finish time, e.g. "1:45:00"
    #[serde(default)]
    pub target_time: Option<String>,
    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Running,
    Cycling,
    Swimming,
    Triathlon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Km,
    Mi,
    M,
}

const KM_PER_MILE: f64 = 1.609_344;

/// Race distance: an enumerated event or a custom value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDistance {
    #[serde(rename = "5K")]
    FiveK,
    #[serde(rename = "10K")]
    TenK,
    #[serde(rename = "15K")]
    FifteenK,
    #[serde(rename = "21K")]
    HalfMarathon,
    #[serde(rename = "42K")]
    Marathon,
    #[serde(rename = "50K")]
    FiftyK,
    Ultra,
    SprintTriathlon,
    OlympicTriathlon,
    HalfIronman,
    Ironman,
    Custom { value: f64, unit: DistanceUnit },
}

pub const HALF_MARATHON_KM: f64 = 21.0975;
pub const MARATHON_KM: f64 = 42.195;

impl RaceDistance {
    /// Distance in kilometers. Triathlons sum swim + bike + run.
    pub fn km(&self) -> f64 {
        match self {
            RaceDistance::FiveK => 5.0,
            RaceDistance::TenK => 10.0,
            RaceDistance::FifteenK => 15.0,
            RaceDistance::HalfMarathon => HALF_MARATHON_KM,
            RaceDistance::Marathon => MARATHON_KM,
            RaceDistance::FiftyK => 50.0,
            RaceDistance::Ultra => 80.0,
            RaceDistance::SprintTriathlon => 0.75 + 20.0 + 5.0,
            RaceDistance::OlympicTriathlon => 1.5 + 40.0 + 10.0,
            RaceDistance::HalfIronman => 1.9 + 90.0 + HALF_MARATHON_KM,
            RaceDistance::Ironman => 3.8 + 180.0 + MARATHON_KM,
            RaceDistance::Custom { value, unit } => match unit {
                DistanceUnit::Km => *value,
                DistanceUnit::Mi => value * KM_PER_MILE,
                DistanceUnit::M => value / 1000.0,
            },
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            RaceDistance::FiveK => "5K".to_string(),
            RaceDistance::TenK => "10K".to_string(),
            RaceDistance::FifteenK => "15K".to_string(),
            RaceDistance::HalfMarathon => "Half marathon (21.1 km)".to_string(),
            RaceDistance::Marathon => "Marathon (42.2 km)".to_string(),
            RaceDistance::FiftyK => "50K ultra".to_string(),
            RaceDistance::Ultra => "Ultra".to_string(),
            RaceDistance::SprintTriathlon => "Sprint triathlon".to_string(),
            RaceDistance::OlympicTriathlon => "Olympic triathlon".to_string(),
            RaceDistance::HalfIronman => "Half Ironman (70.3)".to_string(),
            RaceDistance::Ironman => "Ironman".to_string(),
            RaceDistance::Custom { value, unit } => {
                let unit = match unit {
                    DistanceUnit::Km => "km",
                    DistanceUnit::Mi => "mi",
                    DistanceUnit::M => "m",
                };
                format!("{} {}", value, unit)
            }
        }
    }
}

// ─── Strength ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthGoal {
    pub focus: StrengthFocus,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub lift_targets: Option<LiftTargets>,
}

/// Target one-rep maxes in kilograms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiftTargets {
    pub squat_kg: Option<f64>,
    pub bench_press_kg: Option<f64>,
    pub deadlift_kg: Option<f64>,
    pub overhead_press_kg: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthFocus {
    Hypertrophy,
    Strength,
    Power,
    Endurance,
    Functional,
    Maintenance,
}

impl StrengthFocus {
    pub const ALL: [StrengthFocus; 6] = [
        StrengthFocus::Hypertrophy,
        StrengthFocus::Strength,
        StrengthFocus::Power,
        StrengthFocus::Endurance,
        StrengthFocus::Functional,
        StrengthFocus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthFocus::Hypertrophy => "hypertrophy",
            StrengthFocus::Strength => "strength",
            StrengthFocus::Power => "power",
            StrengthFocus::Endurance => "endurance",
            StrengthFocus::Functional => "functional",
            StrengthFocus::Maintenance => "maintenance",
        }
    }

    /// Strict parse; `None` for unknown keys.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Unknown keys fall back to maintenance.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(StrengthFocus::Maintenance)
    }
}

// ─── Body Composition ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCompositionGoal {
    pub focus: BodyCompFocus,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    pub target_body_fat: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyCompFocus {
    FatLoss,
    MuscleGain,
    Recomposition,
    Maintenance,
    Performance,
}

impl BodyCompFocus {
    pub const ALL: [BodyCompFocus; 5] = [
        BodyCompFocus::FatLoss,
        BodyCompFocus::MuscleGain,
        BodyCompFocus::Recomposition,
        BodyCompFocus::Maintenance,
        BodyCompFocus::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyCompFocus::FatLoss => "fat_loss",
            BodyCompFocus::MuscleGain => "muscle_gain",
            BodyCompFocus::Recomposition => "recomposition",
            BodyCompFocus::Maintenance => "maintenance",
            BodyCompFocus::Performance => "performance",
        }
    }

    /// Unknown keys fall back to maintenance.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(raw.trim()))
            .unwrap_or(BodyCompFocus::Maintenance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_serializes_with_type_tag() {
        let goal = Goal::Endurance(EnduranceGoal {
            sport: Sport::Running,
            distance: RaceDistance::HalfMarathon,
            target_date: NaiveDate::from_ymd_opt(2026, 4, 12),
            target_time: Some("1:45:00".to_string()),
            fitness_level: None,
        });

        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "endurance");
        assert_eq!(json["distance"], "21K");
        assert_eq!(json["target_date"], "2026-04-12");

        let back: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(back, goal);
    }

    #[test]
    fn test_custom_distance_from_json() {
        let goal: Goal = serde_json::from_str(
            r#"{"type":"endurance","sport":"running","distance":{"custom":{"value":13.1,"unit":"mi"}}}"#,
        )
        .unwrap();

        let km = goal.as_endurance().unwrap().distance.km();
        assert!((km - 21.082_406_4).abs() < 1e-6);
    }

    #[test]
    fn test_triathlon_distances_sum_legs() {
        assert!((RaceDistance::SprintTriathlon.km() - 25.75).abs() < 1e-9);
        assert!((RaceDistance::OlympicTriathlon.km() - 51.5).abs() < 1e-9);
        assert!(RaceDistance::Ironman.km() > 225.0);
    }

    #[test]
    fn test_lenient_focus_parsing() {
        assert_eq!(StrengthFocus::parse_lenient("Power"), StrengthFocus::Power);
        assert_eq!(
            StrengthFocus::parse_lenient("crossfit"),
            StrengthFocus::Maintenance
        );
        assert_eq!(
            BodyCompFocus::parse_lenient("fat_loss"),
            BodyCompFocus::FatLoss
        );
        assert_eq!(
            BodyCompFocus::parse_lenient("bulk"),
            BodyCompFocus::Maintenance
        );
    }

    #[test]
    fn test_default_goals_are_maintenance() {
        let goals = AthleteGoals::default();
        assert_eq!(goals.primary.kind(), "body_composition");
        assert!(goals.secondary.is_none());
    }
}
