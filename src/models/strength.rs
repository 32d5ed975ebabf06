// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength catalog records. All catalog data is `'static`.

use serde::Serialize;

use crate::models::goal::StrengthFocus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Core,
    Glutes,
    Legs,
    Upper,
    FullBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub name: &'static str,
    pub sets: u32,
    /// Rep range ("8-10") or hold time ("30s")
    pub reps: &'static str,
    pub rest_seconds: u32,
    pub muscle_group: MuscleGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthRoutine {
    pub name: &'static str,
    pub duration_minutes: u32,
    pub exercises: &'static [Exercise],
}

/// Weekly strength prescription for a training phase.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthWeek {
    pub sessions: u32,
    pub notes: &'static str,
    pub routines: Vec<&'static StrengthRoutine>,
}

/// Strength advice derived from the primary goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthRecommendation {
    pub focus: StrengthFocus,
    pub sessions_per_week: u32,
    pub note: &'static str,
}
