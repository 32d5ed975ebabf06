// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodized training plan output.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Training phases, always in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Base,
    Build,
    Peak,
    Taper,
}

impl PhaseName {
    pub const ORDER: [PhaseName; 4] = [
        PhaseName::Base,
        PhaseName::Build,
        PhaseName::Peak,
        PhaseName::Taper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::Base => "base",
            PhaseName::Build => "build",
            PhaseName::Peak => "peak",
            PhaseName::Taper => "taper",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Race distance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum DistanceCategory {
    /// Up to 10 km
    Short,
    /// Up to 25 km
    Medium,
    /// Up to 50 km
    Long,
    Ultra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct TrainingPhase {
    pub name: PhaseName,
    pub weeks: u32,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct PlanWeek {
    /// 1-based
    pub week_number: u32,
    pub phase: PhaseName,
    pub planned_distance_km: f64,
    pub long_run_km: f64,
    pub quality_session: String,
    pub strength_focus: String,
    pub strength_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingPlan {
    pub distance_label: String,
    pub category: DistanceCategory,
    pub baseline_weekly_km: f64,
    pub total_weeks: u32,
    pub phases: Vec<TrainingPhase>,
    pub weeks: Vec<PlanWeek>,
}

impl TrainingPlan {
    /// Week the athlete should be training given the weeks left to race day.
    ///
    /// `None` when the race is further out than the plan is long, or past.
    pub fn current_week(&self, weeks_to_race: u32) -> Option<&PlanWeek> {
        if weeks_to_race == 0 || weeks_to_race > self.total_weeks {
            return None;
        }
        let week_number = self.total_weeks - weeks_to_race + 1;
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Phase containing the given 1-based week.
    pub fn phase_for_week(&self, week_number: u32) -> Option<&TrainingPhase> {
        let mut end = 0;
        for phase in &self.phases {
            end += phase.weeks;
            if week_number >= 1 && week_number <= end {
                return Some(phase);
            }
        }
        None
    }
}
