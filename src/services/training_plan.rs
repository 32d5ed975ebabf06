// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodized training plan generator.
//!
//! A plan is four phases (base, build, peak, taper) whose lengths and volume
//! ranges depend on the race distance category. Weekly volume and long-run
//! distance are interpolated linearly inside each phase.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{
    DistanceCategory, EnduranceGoal, FitnessLevel, PhaseName, PlanWeek, TrainingPhase,
    TrainingPlan,
};

/// Per-phase template: weeks, fractions of baseline, strength sessions.
#[derive(Debug, Clone, Copy)]
struct PhaseTemplate {
    name: PhaseName,
    weeks: u32,
    weekly: (f64, f64),
    long_run: (f64, f64),
    strength_sessions: u32,
}

const fn phase(
    name: PhaseName,
    weeks: u32,
    weekly: (f64, f64),
    long_run: (f64, f64),
    strength_sessions: u32,
) -> PhaseTemplate {
    PhaseTemplate {
        name,
        weeks,
        weekly,
        long_run,
        strength_sessions,
    }
}

use PhaseName::{Base, Build, Peak, Taper};

const SHORT: [PhaseTemplate; 4] = [
    phase(Base, 3, (0.8, 1.0), (0.25, 0.3), 2),
    phase(Build, 3, (1.0, 1.15), (0.3, 0.35), 2),
    phase(Peak, 2, (1.1, 1.2), (0.3, 0.35), 1),
    phase(Taper, 1, (0.6, 0.7), (0.2, 0.25), 1),
];

const MEDIUM: [PhaseTemplate; 4] = [
    phase(Base, 4, (0.8, 1.0), (0.25, 0.3), 2),
    phase(Build, 4, (1.0, 1.2), (0.3, 0.38), 2),
    phase(Peak, 3, (1.15, 1.3), (0.35, 0.42), 1),
    phase(Taper, 2, (0.5, 0.7), (0.2, 0.3), 1),
];

const LONG: [PhaseTemplate; 4] = [
    phase(Base, 6, (0.75, 1.0), (0.3, 0.35), 2),
    phase(Build, 6, (1.0, 1.25), (0.35, 0.42), 2),
    phase(Peak, 4, (1.2, 1.35), (0.4, 0.48), 1),
    phase(Taper, 3, (0.5, 0.75), (0.25, 0.35), 1),
];

const ULTRA: [PhaseTemplate; 4] = [
    phase(Base, 8, (0.75, 1.0), (0.3, 0.38), 2),
    phase(Build, 8, (1.0, 1.3), (0.38, 0.45), 2),
    phase(Peak, 4, (1.25, 1.45), (0.42, 0.5), 1),
    phase(Taper, 3, (0.5, 0.7), (0.3, 0.35), 1),
];

fn templates(category: DistanceCategory) -> &'static [PhaseTemplate; 4] {
    match category {
        DistanceCategory::Short => &SHORT,
        DistanceCategory::Medium => &MEDIUM,
        DistanceCategory::Long => &LONG,
        DistanceCategory::Ultra => &ULTRA,
    }
}

/// Bucket a race distance.
pub fn distance_category(km: f64) -> DistanceCategory {
    if km <= 10.0 {
        DistanceCategory::Short
    } else if km <= 25.0 {
        DistanceCategory::Medium
    } else if km <= 50.0 {
        DistanceCategory::Long
    } else {
        DistanceCategory::Ultra
    }
}

/// Weekly volume multiplier over race distance.
pub fn level_multiplier(level: Option<FitnessLevel>) -> f64 {
    match level {
        Some(FitnessLevel::Beginner) => 1.2,
        Some(FitnessLevel::Intermediate) | None => 1.5,
        Some(FitnessLevel::Advanced) => 1.8,
        Some(FitnessLevel::Elite) => 2.2,
    }
}

pub fn phase_focus(phase: PhaseName) -> &'static str {
    match phase {
        Base => "Aerobic base and durability",
        Build => "Threshold and race-specific volume",
        Peak => "Race-pace sharpening",
        Taper => "Freshen up, keep intensity",
    }
}

/// Strength label for a phase, the same for every distance.
pub fn strength_focus_for_phase(phase: PhaseName) -> &'static str {
    match phase {
        Base => "max strength + stability",
        Build => "strength-endurance",
        Peak => "maintenance",
        Taper => "neuromuscular activation",
    }
}

fn quality_sessions(category: DistanceCategory, phase: PhaseName) -> &'static [&'static str] {
    use DistanceCategory::*;
    match (category, phase) {
        (Short, Base) => &["strides", "hill sprints", "fartlek"],
        (Short, Build) => &["5x1km @ 5K pace", "tempo 20min", "8x400m"],
        (Short, Peak) => &["race-pace 3x2km", "6x800m"],
        (Short, Taper) => &["race-pace openers"],

        (Medium, Base) => &["fartlek", "hill repeats", "progression run"],
        (Medium, Build) => &["tempo 30min", "cruise intervals 4x2km", "6x1km @ 10K pace"],
        (Medium, Peak) => &["half-marathon pace 2x5km", "tempo 40min"],
        (Medium, Taper) => &["race-pace 3km", "strides"],

        (Long, Base) => &["easy + strides", "hill repeats", "progression run"],
        (Long, Build) => &["marathon pace 10km", "tempo 40min", "cruise intervals 5x2km"],
        (Long, Peak) => &["marathon pace 16km", "long intervals 3x5km"],
        (Long, Taper) => &["marathon pace 6km", "strides"],

        (Ultra, Base) => &["hill hiking", "trail fartlek", "progression run"],
        (Ultra, Build) => &["back-to-back long runs", "sustained climbs", "tempo 45min"],
        (Ultra, Peak) => &["race simulation", "back-to-back long runs"],
        (Ultra, Taper) => &["short race-effort", "easy + strides"],
    }
}

fn lerp((start, end): (f64, f64), progress: f64) -> f64 {
    start + (end - start) * progress
}

fn round_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Build a plan for an endurance goal from the athlete's current weekly volume.
pub fn generate_plan(
    goal: &EnduranceGoal,
    current_weekly_km: f64,
) -> Result<TrainingPlan, ValidationError> {
    if !current_weekly_km.is_finite() || current_weekly_km < 0.0 {
        return Err(ValidationError::Negative {
            field: "current_weekly_km",
            value: current_weekly_km,
        });
    }

    let target_km = goal.distance.km();
    let category = distance_category(target_km);
    let baseline = current_weekly_km.max(target_km * level_multiplier(goal.fitness_level));
    let templates = templates(category);

    let phases: Vec<TrainingPhase> = templates
        .iter()
        .map(|t| TrainingPhase {
            name: t.name,
            weeks: t.weeks,
            focus: phase_focus(t.name).to_string(),
        })
        .collect();

    let total_weeks: u32 = templates.iter().map(|t| t.weeks).sum();
    let mut weeks = Vec::with_capacity(total_weeks as usize);
    let mut week_number = 1;

    for t in templates {
        let rotation = quality_sessions(category, t.name);
        for index in 0..t.weeks {
            let progress = f64::from(index) / f64::from(t.weeks);
            weeks.push(PlanWeek {
                week_number,
                phase: t.name,
                planned_distance_km: round_tenth(baseline * lerp(t.weekly, progress)),
                long_run_km: round_tenth(baseline * lerp(t.long_run, progress)),
                quality_session: rotation[index as usize % rotation.len()].to_string(),
                strength_focus: strength_focus_for_phase(t.name).to_string(),
                strength_sessions: t.strength_sessions,
            });
            week_number += 1;
        }
    }

    tracing::debug!(
        distance = %goal.distance.label(),
        ?category,
        baseline,
        total_weeks,
        "Generated training plan"
    );

    Ok(TrainingPlan {
        distance_label: goal.distance.label(),
        category,
        baseline_weekly_km: baseline,
        total_weeks,
        phases,
        weeks,
    })
}

/// Whole weeks left until `target`, rounded up. `None` once the date has passed.
pub fn weeks_to_race(target: NaiveDate, today: NaiveDate) -> Option<u32> {
    let days = (target - today).num_days();
    if days < 0 {
        return None;
    }
    u32::try_from((days + 6) / 7).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RaceDistance, Sport};

    fn goal(distance: RaceDistance, fitness_level: Option<FitnessLevel>) -> EnduranceGoal {
        EnduranceGoal {
            sport: Sport::Running,
            distance,
            target_date: None,
            target_time: None,
            fitness_level,
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(distance_category(5.0), DistanceCategory::Short);
        assert_eq!(distance_category(10.0), DistanceCategory::Short);
        assert_eq!(distance_category(21.0975), DistanceCategory::Medium);
        assert_eq!(distance_category(42.195), DistanceCategory::Long);
        assert_eq!(distance_category(50.0), DistanceCategory::Long);
        assert_eq!(distance_category(80.0), DistanceCategory::Ultra);
    }

    #[test]
    fn test_half_marathon_baseline() {
        let plan = generate_plan(
            &goal(RaceDistance::HalfMarathon, Some(FitnessLevel::Intermediate)),
            30.0,
        )
        .unwrap();

        assert_eq!(plan.category, DistanceCategory::Medium);
        assert!((plan.baseline_weekly_km - 31.646_25).abs() < 1e-9);
        assert_eq!(plan.total_weeks, 13);

        // First week of base starts at the lower bound
        let first = &plan.weeks[0];
        assert_eq!(first.planned_distance_km, 25.3);
        assert_eq!(first.long_run_km, 7.9);
        assert_eq!(first.quality_session, "fartlek");
        assert_eq!(first.strength_focus, "max strength + stability");
    }

    #[test]
    fn test_weeks_are_contiguous_and_match_phases() {
        for distance in [
            RaceDistance::FiveK,
            RaceDistance::HalfMarathon,
            RaceDistance::Marathon,
            RaceDistance::Ultra,
        ] {
            let plan = generate_plan(&goal(distance, None), 40.0).unwrap();
            let phase_total: u32 = plan.phases.iter().map(|p| p.weeks).sum();

            assert_eq!(phase_total, plan.total_weeks);
            assert_eq!(plan.weeks.len() as u32, plan.total_weeks);
            for (i, week) in plan.weeks.iter().enumerate() {
                assert_eq!(week.week_number, i as u32 + 1);
                let phase = plan.phase_for_week(week.week_number).unwrap();
                assert_eq!(phase.name, week.phase);
            }
        }
    }

    fn every_distance() -> Vec<RaceDistance> {
        vec![
            RaceDistance::FiveK,
            RaceDistance::TenK,
            RaceDistance::FifteenK,
            RaceDistance::HalfMarathon,
            RaceDistance::Marathon,
            RaceDistance::FiftyK,
            RaceDistance::Ultra,
            RaceDistance::SprintTriathlon,
            RaceDistance::OlympicTriathlon,
            RaceDistance::HalfIronman,
            RaceDistance::Ironman,
            RaceDistance::Custom {
                value: 30.0,
                unit: crate::models::DistanceUnit::Mi,
            },
        ]
    }

    #[test]
    fn test_generate_plan_is_idempotent() {
        for distance in every_distance() {
            for level in [None, Some(FitnessLevel::Beginner), Some(FitnessLevel::Elite)] {
                let g = goal(distance, level);
                let first = generate_plan(&g, 35.0).unwrap();
                let second = generate_plan(&g, 35.0).unwrap();

                assert_eq!(first, second);
                assert_eq!(
                    serde_json::to_string(&first).unwrap(),
                    serde_json::to_string(&second).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_week_counts_hold_for_every_distance() {
        for distance in every_distance() {
            let plan = generate_plan(&goal(distance, None), 20.0).unwrap();
            let phase_total: u32 = plan.phases.iter().map(|p| p.weeks).sum();
            assert_eq!(phase_total, plan.total_weeks);
            assert_eq!(plan.weeks.len() as u32, plan.total_weeks);
        }
    }

    #[test]
    fn test_progress_never_reaches_upper_bound() {
        let plan = generate_plan(&goal(RaceDistance::TenK, None), 0.0).unwrap();
        let baseline = plan.baseline_weekly_km;
        assert_eq!(baseline, 15.0);

        // Short taper is a single week: progress is 0, volume is the lower bound
        let taper = plan.weeks.last().unwrap();
        assert_eq!(taper.phase, PhaseName::Taper);
        assert_eq!(taper.planned_distance_km, 9.0);

        // Last base week is below the 1.0 upper bound
        let last_base = &plan.weeks[2];
        assert!(last_base.planned_distance_km < baseline);
    }

    #[test]
    fn test_quality_rotation_wraps() {
        let plan = generate_plan(&goal(RaceDistance::Ultra, None), 60.0).unwrap();
        let base: Vec<&str> = plan
            .weeks
            .iter()
            .filter(|w| w.phase == PhaseName::Base)
            .map(|w| w.quality_session.as_str())
            .collect();
        assert_eq!(base.len(), 8);
        assert_eq!(base[0], base[3]);
        assert_eq!(base[1], base[4]);
    }

    #[test]
    fn test_current_volume_above_floor_wins() {
        let plan = generate_plan(&goal(RaceDistance::FiveK, Some(FitnessLevel::Elite)), 80.0)
            .unwrap();
        assert_eq!(plan.baseline_weekly_km, 80.0);
    }

    #[test]
    fn test_rejects_negative_volume() {
        let g = goal(RaceDistance::TenK, None);
        assert!(generate_plan(&g, -5.0).is_err());
        assert!(generate_plan(&g, f64::NAN).is_err());
    }

    #[test]
    fn test_weeks_to_race_rounds_up() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let race = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();

        assert_eq!(weeks_to_race(race(1), today), Some(0));
        assert_eq!(weeks_to_race(race(2), today), Some(1));
        assert_eq!(weeks_to_race(race(8), today), Some(1));
        assert_eq!(weeks_to_race(race(9), today), Some(2));
        assert_eq!(weeks_to_race(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(), today), None);
    }
}
