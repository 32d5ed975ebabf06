// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strength program selector.
//!
//! Routines are static catalog data keyed either by endurance training phase
//! (strength work supporting running) or by strength focus. Unknown keys select
//! nothing rather than failing.

use std::fmt::Write;

use crate::models::{
    BodyCompFocus, Exercise, Goal, MuscleGroup, PhaseName, StrengthFocus, StrengthRecommendation,
    StrengthRoutine, StrengthWeek,
};

const fn ex(
    name: &'static str,
    sets: u32,
    reps: &'static str,
    rest_seconds: u32,
    muscle_group: MuscleGroup,
) -> Exercise {
    Exercise {
        name,
        sets,
        reps,
        rest_seconds,
        muscle_group,
    }
}

use MuscleGroup::{Core, FullBody, Glutes, Legs, Upper};

// ─── Phase Catalog ───────────────────────────────────────────

const BASE_LOWER: StrengthRoutine = StrengthRoutine {
    name: "Base: heavy lower body",
    duration_minutes: 50,
    exercises: &[
        ex("Back squat", 4, "5-6", 150, Legs),
        ex("Romanian deadlift", 3, "6-8", 120, Glutes),
        ex("Bulgarian split squat", 3, "8", 90, Legs),
        ex("Single-leg calf raise", 3, "12-15", 60, Legs),
        ex("Pallof press", 3, "10", 60, Core),
    ],
};

const BASE_STABILITY: StrengthRoutine = StrengthRoutine {
    name: "Base: stability and core",
    duration_minutes: 35,
    exercises: &[
        ex("Single-leg glute bridge", 3, "12", 45, Glutes),
        ex("Side plank", 3, "30s", 30, Core),
        ex("Copenhagen plank", 3, "20s", 30, Core),
        ex("Lateral band walk", 3, "15", 45, Glutes),
        ex("Dead bug", 3, "10", 45, Core),
    ],
};

const BUILD_CIRCUIT: StrengthRoutine = StrengthRoutine {
    name: "Build: strength-endurance circuit",
    duration_minutes: 40,
    exercises: &[
        ex("Goblet squat", 3, "12-15", 45, Legs),
        ex("Walking lunge", 3, "20", 45, Legs),
        ex("Step-up", 3, "12", 45, Glutes),
        ex("Push-up", 3, "15", 45, Upper),
        ex("Plank", 3, "45s", 30, Core),
    ],
};

const BUILD_POSTERIOR: StrengthRoutine = StrengthRoutine {
    name: "Build: posterior chain",
    duration_minutes: 40,
    exercises: &[
        ex("Hip thrust", 3, "10-12", 75, Glutes),
        ex("Single-leg Romanian deadlift", 3, "10", 60, Glutes),
        ex("Nordic hamstring curl", 3, "6", 90, Legs),
        ex("Bent-over row", 3, "10", 60, Upper),
    ],
};

const PEAK_MAINTENANCE: StrengthRoutine = StrengthRoutine {
    name: "Peak: maintenance",
    duration_minutes: 30,
    exercises: &[
        ex("Back squat", 2, "5", 120, Legs),
        ex("Hip thrust", 2, "8", 90, Glutes),
        ex("Side plank", 2, "30s", 30, Core),
        ex("Calf raise", 2, "12", 45, Legs),
    ],
};

const TAPER_ACTIVATION: StrengthRoutine = StrengthRoutine {
    name: "Taper: neuromuscular activation",
    duration_minutes: 20,
    exercises: &[
        ex("Pogo jumps", 3, "20s", 60, Legs),
        ex("Box jump", 3, "5", 90, FullBody),
        ex("Glute bridge", 2, "10", 45, Glutes),
        ex("Bird dog", 2, "8", 30, Core),
    ],
};

// ─── Focus Catalog ───────────────────────────────────────────

const HYPERTROPHY_UPPER: StrengthRoutine = StrengthRoutine {
    name: "Hypertrophy: upper body",
    duration_minutes: 60,
    exercises: &[
        ex("Bench press", 4, "8-10", 90, Upper),
        ex("Lat pulldown", 4, "10-12", 75, Upper),
        ex("Incline dumbbell press", 3, "10-12", 75, Upper),
        ex("Seated cable row", 3, "10-12", 75, Upper),
        ex("Lateral raise", 3, "12-15", 45, Upper),
    ],
};

const HYPERTROPHY_LOWER: StrengthRoutine = StrengthRoutine {
    name: "Hypertrophy: lower body",
    duration_minutes: 60,
    exercises: &[
        ex("Back squat", 4, "8-10", 120, Legs),
        ex("Romanian deadlift", 4, "8-10", 90, Glutes),
        ex("Leg press", 3, "10-12", 90, Legs),
        ex("Leg curl", 3, "12", 60, Legs),
        ex("Cable crunch", 3, "12-15", 45, Core),
    ],
};

const HYPERTROPHY_FULL: StrengthRoutine = StrengthRoutine {
    name: "Hypertrophy: full body",
    duration_minutes: 55,
    exercises: &[
        ex("Deadlift", 3, "6-8", 120, FullBody),
        ex("Overhead press", 3, "8-10", 90, Upper),
        ex("Walking lunge", 3, "12", 75, Legs),
        ex("Pull-up", 3, "8-10", 90, Upper),
    ],
};

const STRENGTH_SQUAT: StrengthRoutine = StrengthRoutine {
    name: "Strength: squat and press",
    duration_minutes: 60,
    exercises: &[
        ex("Back squat", 5, "3-5", 180, Legs),
        ex("Overhead press", 5, "3-5", 150, Upper),
        ex("Front squat", 3, "5", 150, Legs),
        ex("Hanging leg raise", 3, "10", 60, Core),
    ],
};

const STRENGTH_PULL: StrengthRoutine = StrengthRoutine {
    name: "Strength: deadlift and bench",
    duration_minutes: 60,
    exercises: &[
        ex("Deadlift", 5, "3-5", 180, FullBody),
        ex("Bench press", 5, "3-5", 150, Upper),
        ex("Weighted pull-up", 3, "5", 120, Upper),
        ex("Ab wheel rollout", 3, "8", 60, Core),
    ],
};

const POWER_EXPLOSIVE: StrengthRoutine = StrengthRoutine {
    name: "Power: explosive lower body",
    duration_minutes: 45,
    exercises: &[
        ex("Box jump", 4, "4", 120, Legs),
        ex("Jump squat", 4, "5", 120, Legs),
        ex("Kettlebell swing", 4, "8", 90, Glutes),
        ex("Broad jump", 3, "4", 120, FullBody),
    ],
};

const POWER_OLYMPIC: StrengthRoutine = StrengthRoutine {
    name: "Power: Olympic lifts",
    duration_minutes: 50,
    exercises: &[
        ex("Power clean", 5, "3", 150, FullBody),
        ex("Push press", 4, "3", 150, Upper),
        ex("Medicine ball slam", 3, "8", 60, Core),
    ],
};

const ENDURANCE_CIRCUIT: StrengthRoutine = StrengthRoutine {
    name: "Muscular endurance: circuit",
    duration_minutes: 40,
    exercises: &[
        ex("Bodyweight squat", 3, "20", 30, Legs),
        ex("Push-up", 3, "15-20", 30, Upper),
        ex("Reverse lunge", 3, "15", 30, Legs),
        ex("Inverted row", 3, "15", 30, Upper),
        ex("Mountain climber", 3, "40s", 30, Core),
    ],
};

const ENDURANCE_HIGH_REP: StrengthRoutine = StrengthRoutine {
    name: "Muscular endurance: high-rep lifts",
    duration_minutes: 45,
    exercises: &[
        ex("Goblet squat", 3, "15-20", 45, Legs),
        ex("Dumbbell bench press", 3, "15-20", 45, Upper),
        ex("Kettlebell swing", 3, "20", 45, Glutes),
        ex("Plank", 3, "60s", 30, Core),
    ],
};

const FUNCTIONAL_MOVEMENT: StrengthRoutine = StrengthRoutine {
    name: "Functional: movement patterns",
    duration_minutes: 45,
    exercises: &[
        ex("Goblet squat", 3, "10", 60, Legs),
        ex("Kettlebell deadlift", 3, "10", 60, Glutes),
        ex("Farmer's carry", 3, "40s", 60, FullBody),
        ex("Half-kneeling press", 3, "8", 60, Upper),
        ex("Pallof press", 3, "10", 45, Core),
    ],
};

const FUNCTIONAL_UNILATERAL: StrengthRoutine = StrengthRoutine {
    name: "Functional: single-leg and core",
    duration_minutes: 40,
    exercises: &[
        ex("Step-up", 3, "10", 60, Legs),
        ex("Single-leg Romanian deadlift", 3, "10", 60, Glutes),
        ex("Suitcase carry", 3, "30s", 45, Core),
        ex("Side plank", 3, "30s", 30, Core),
    ],
};

const MAINTENANCE_FULL: StrengthRoutine = StrengthRoutine {
    name: "Maintenance: full body",
    duration_minutes: 40,
    exercises: &[
        ex("Back squat", 3, "6-8", 120, Legs),
        ex("Bench press", 3, "6-8", 120, Upper),
        ex("Barbell row", 3, "8", 90, Upper),
        ex("Hip thrust", 2, "10", 75, Glutes),
        ex("Plank", 2, "45s", 30, Core),
    ],
};

static BASE_ROUTINES: [&StrengthRoutine; 2] = [&BASE_LOWER, &BASE_STABILITY];
static BUILD_ROUTINES: [&StrengthRoutine; 2] = [&BUILD_CIRCUIT, &BUILD_POSTERIOR];
static PEAK_ROUTINES: [&StrengthRoutine; 1] = [&PEAK_MAINTENANCE];
static TAPER_ROUTINES: [&StrengthRoutine; 1] = [&TAPER_ACTIVATION];

static HYPERTROPHY_ROUTINES: [&StrengthRoutine; 3] =
    [&HYPERTROPHY_UPPER, &HYPERTROPHY_LOWER, &HYPERTROPHY_FULL];
static STRENGTH_ROUTINES: [&StrengthRoutine; 2] = [&STRENGTH_SQUAT, &STRENGTH_PULL];
static POWER_ROUTINES: [&StrengthRoutine; 2] = [&POWER_EXPLOSIVE, &POWER_OLYMPIC];
static ENDURANCE_ROUTINES: [&StrengthRoutine; 2] = [&ENDURANCE_CIRCUIT, &ENDURANCE_HIGH_REP];
static FUNCTIONAL_ROUTINES: [&StrengthRoutine; 2] = [&FUNCTIONAL_MOVEMENT, &FUNCTIONAL_UNILATERAL];
static MAINTENANCE_ROUTINES: [&StrengthRoutine; 1] = [&MAINTENANCE_FULL];

// ─── Selection ───────────────────────────────────────────────

pub fn routines_for_phase(phase: PhaseName) -> &'static [&'static StrengthRoutine] {
    match phase {
        PhaseName::Base => &BASE_ROUTINES,
        PhaseName::Build => &BUILD_ROUTINES,
        PhaseName::Peak => &PEAK_ROUTINES,
        PhaseName::Taper => &TAPER_ROUTINES,
    }
}

/// Lookup by phase key; unknown keys select nothing.
pub fn routines_for_phase_name(raw: &str) -> &'static [&'static StrengthRoutine] {
    match PhaseName::parse(raw) {
        Some(phase) => routines_for_phase(phase),
        None => {
            tracing::debug!(phase = raw, "Unknown training phase, no routines");
            &[]
        }
    }
}

pub fn routines_for_focus(focus: StrengthFocus) -> &'static [&'static StrengthRoutine] {
    match focus {
        StrengthFocus::Hypertrophy => &HYPERTROPHY_ROUTINES,
        StrengthFocus::Strength => &STRENGTH_ROUTINES,
        StrengthFocus::Power => &POWER_ROUTINES,
        StrengthFocus::Endurance => &ENDURANCE_ROUTINES,
        StrengthFocus::Functional => &FUNCTIONAL_ROUTINES,
        StrengthFocus::Maintenance => &MAINTENANCE_ROUTINES,
    }
}

/// Lookup by focus key; unknown keys select nothing.
pub fn routines_for_focus_name(raw: &str) -> &'static [&'static StrengthRoutine] {
    match StrengthFocus::parse(raw) {
        Some(focus) => routines_for_focus(focus),
        None => {
            tracing::debug!(focus = raw, "Unknown strength focus, no routines");
            &[]
        }
    }
}

/// Weekly sessions for a strength-first athlete.
pub fn sessions_for_focus(focus: StrengthFocus) -> u32 {
    match focus {
        StrengthFocus::Hypertrophy | StrengthFocus::Strength => 4,
        StrengthFocus::Power | StrengthFocus::Endurance | StrengthFocus::Functional => 3,
        StrengthFocus::Maintenance => 2,
    }
}

/// Strength work during an endurance phase.
pub fn strength_week(phase: PhaseName) -> StrengthWeek {
    let (sessions, notes) = match phase {
        PhaseName::Base => (
            2,
            "Heavy, low-rep work on non-consecutive days. Keep it away from quality runs.",
        ),
        PhaseName::Build => (
            2,
            "Shift to higher reps and circuits. Schedule on hard days so easy days stay easy.",
        ),
        PhaseName::Peak => (
            1,
            "One short session to hold strength. Drop volume, keep load.",
        ),
        PhaseName::Taper => (
            1,
            "Light activation only, at least 3 days before race day.",
        ),
    };

    StrengthWeek {
        sessions,
        notes,
        routines: routines_for_phase(phase).to_vec(),
    }
}

/// Strength advice for the athlete's primary goal.
pub fn strength_recommendation(goal: &Goal) -> StrengthRecommendation {
    let (focus, sessions_per_week, note) = match goal {
        Goal::Endurance(_) => (
            StrengthFocus::Functional,
            2,
            "Support running economy and injury resilience; never at the expense of key runs.",
        ),
        Goal::Strength(g) => (
            g.focus,
            sessions_for_focus(g.focus),
            "Strength is the priority; progress load week to week.",
        ),
        Goal::BodyComposition(g) => match g.focus {
            BodyCompFocus::FatLoss => (
                StrengthFocus::Hypertrophy,
                3,
                "Lift heavy enough to keep muscle while in a deficit.",
            ),
            BodyCompFocus::MuscleGain => (
                StrengthFocus::Hypertrophy,
                4,
                "Volume drives growth; train each muscle twice a week.",
            ),
            BodyCompFocus::Recomposition => (
                StrengthFocus::Strength,
                3,
                "Progressive overload with high protein.",
            ),
            BodyCompFocus::Maintenance => (
                StrengthFocus::Maintenance,
                2,
                "Two full-body sessions keep what you have.",
            ),
            BodyCompFocus::Performance => (
                StrengthFocus::Power,
                3,
                "Explosive work that carries over to sport.",
            ),
        },
    };

    StrengthRecommendation {
        focus,
        sessions_per_week,
        note,
    }
}

/// Plain-text rendering of a routine.
pub fn format_routine(routine: &StrengthRoutine) -> String {
    let mut out = format!("{} ({} min)\n", routine.name, routine.duration_minutes);
    for (i, e) in routine.exercises.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{}. {}: {} x {} (rest {}s)",
            i + 1,
            e.name,
            e.sets,
            e.reps,
            e.rest_seconds
        );
    }
    out
}
