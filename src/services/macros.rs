// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Macro target calculator.
//!
//! Maps an athlete profile and either a training-day type or a goal to daily
//! calorie, protein, carb and fat targets:
//!
//! - BMR via Mifflin-St Jeor, scaled to TDEE by activity level
//! - protein and carbs in g/kg of body weight from a lookup table
//! - fat fills the remaining energy, floored at 0.8 g/kg
//!
//! Everything here is pure; nothing touches storage.

use serde::Serialize;

use crate::error::ValidationError;
use crate::models::{
    BodyCompFocus, DayType, FoodEntry, Goal, MacroPercentages, MacroTargets, MacroTotals,
    NutritionProfile, Sex, StrengthFocus,
};

/// Daily fiber target in grams.
pub const FIBER_TARGET_G: i32 = 30;

/// Fat never drops below this many grams per kg.
const FAT_FLOOR_G_PER_KG: f64 = 0.8;

/// One row of the macro lookup tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRule {
    pub protein_g_per_kg: f64,
    pub carbs_g_per_kg: f64,
    pub calorie_adjustment: i32,
}

const fn rule(protein_g_per_kg: f64, carbs_g_per_kg: f64, calorie_adjustment: i32) -> MacroRule {
    MacroRule {
        protein_g_per_kg,
        carbs_g_per_kg,
        calorie_adjustment,
    }
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day.
pub fn bmr(profile: &NutritionProfile) -> f64 {
    let base =
        10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure, rounded to whole kcal.
pub fn tdee(profile: &NutritionProfile) -> i32 {
    (bmr(profile) * profile.activity_level.multiplier()).round() as i32
}

pub fn day_type_rule(day_type: DayType) -> MacroRule {
    match day_type {
        DayType::LongRun => rule(1.8, 7.0, 300),
        DayType::Quality => rule(1.8, 5.0, 100),
        DayType::Easy => rule(1.8, 4.0, 0),
        DayType::Strength => rule(2.0, 4.0, 100),
        DayType::HighVolume => rule(2.2, 5.0, 200),
        DayType::Rest => rule(1.8, 3.0, -200),
        DayType::Deload => rule(1.8, 3.0, -100),
        // Carb loading
        DayType::RaceWeek => rule(1.6, 8.0, 200),
        DayType::RaceDay => rule(1.4, 10.0, 500),
    }
}

pub fn goal_rule(goal: &Goal) -> MacroRule {
    match goal {
        Goal::Endurance(_) => rule(1.6, 5.0, 0),
        Goal::Strength(g) => match g.focus {
            StrengthFocus::Hypertrophy => rule(2.0, 4.0, 300),
            StrengthFocus::Strength | StrengthFocus::Power => rule(1.8, 4.0, 100),
            StrengthFocus::Endurance | StrengthFocus::Functional | StrengthFocus::Maintenance => {
                rule(1.8, 3.0, 0)
            }
        },
        Goal::BodyComposition(g) => match g.focus {
            BodyCompFocus::FatLoss => rule(2.2, 2.0, -500),
            BodyCompFocus::MuscleGain => rule(2.0, 5.0, 300),
            BodyCompFocus::Recomposition => rule(2.2, 3.0, -200),
            BodyCompFocus::Maintenance => rule(1.8, 3.0, 0),
            BodyCompFocus::Performance => rule(1.8, 4.0, 0),
        },
    }
}

/// Apply a table row to a profile.
pub fn targets_from_rule(
    profile: &NutritionProfile,
    rule: MacroRule,
) -> Result<MacroTargets, ValidationError> {
    profile.validate()?;

    let weight = profile.weight_kg;
    let protein = (weight * rule.protein_g_per_kg).round();
    let carbs = (weight * rule.carbs_g_per_kg).round();
    let calories = tdee(profile) + rule.calorie_adjustment;

    let fat_kcal = f64::from(calories) - protein * 4.0 - carbs * 4.0;
    let fat = (fat_kcal / 9.0).max(weight * FAT_FLOOR_G_PER_KG).round();

    Ok(MacroTargets {
        calories,
        protein: protein as i32,
        carbs: carbs as i32,
        fat: fat as i32,
        fiber: FIBER_TARGET_G,
    })
}

/// Targets for a specific training day.
pub fn targets_for_day_type(
    profile: &NutritionProfile,
    day_type: DayType,
) -> Result<MacroTargets, ValidationError> {
    targets_from_rule(profile, day_type_rule(day_type))
}

/// Targets for a goal, independent of the day's training.
pub fn targets_for_goal(
    profile: &NutritionProfile,
    goal: &Goal,
) -> Result<MacroTargets, ValidationError> {
    targets_from_rule(profile, goal_rule(goal))
}

// ─── Daily Log Arithmetic ────────────────────────────────────

/// Sum the macros of a day's entries. Missing fiber counts as zero.
pub fn calculate_totals(entries: &[FoodEntry]) -> MacroTotals {
    entries.iter().fold(
        MacroTotals {
            fiber: Some(0.0),
            ..MacroTotals::default()
        },
        |acc, e| MacroTotals {
            calories: acc.calories + e.calories,
            protein: acc.protein + e.protein,
            carbs: acc.carbs + e.carbs,
            fat: acc.fat + e.fat,
            fiber: Some(acc.fiber.unwrap_or(0.0) + e.fiber.unwrap_or(0.0)),
        },
    )
}

/// Targets minus totals. Values go negative when over target.
pub fn calculate_remaining(totals: &MacroTotals, targets: &MacroTargets) -> MacroTotals {
    MacroTotals {
        calories: f64::from(targets.calories) - totals.calories,
        protein: f64::from(targets.protein) - totals.protein,
        carbs: f64::from(targets.carbs) - totals.carbs,
        fat: f64::from(targets.fat) - totals.fat,
        fiber: Some(f64::from(targets.fiber) - totals.fiber.unwrap_or(0.0)),
    }
}

/// Share of energy from each macro.
pub fn calculate_macro_percentages(totals: &MacroTotals) -> MacroPercentages {
    let protein_kcal = totals.protein * 4.0;
    let carbs_kcal = totals.carbs * 4.0;
    let fat_kcal = totals.fat * 9.0;
    let total = protein_kcal + carbs_kcal + fat_kcal;

    if total <= 0.0 {
        return MacroPercentages::default();
    }

    let pct = |kcal: f64| (kcal / total * 100.0).round() as u32;
    MacroPercentages {
        protein: pct(protein_kcal),
        carbs: pct(carbs_kcal),
        fat: pct(fat_kcal),
    }
}

/// What the next meal should emphasize given what is left for the day.
pub fn suggest_meal_focus(remaining: &MacroTotals) -> &'static str {
    let protein_gap = remaining.protein > 30.0;
    let carbs_gap = remaining.carbs > 50.0;

    match (protein_gap, carbs_gap) {
        (true, true) => "Prioritize protein and carbs (e.g. chicken with rice, fish with pasta)",
        (true, false) => "Focus on lean protein (e.g. chicken breast, white fish, egg whites)",
        (false, true) => "Add complex carbs (e.g. oats, rice, potatoes)",
        (false, false) if remaining.calories > 300.0 => "Balanced meal to finish the day's calories",
        (false, false) => "Close to target; a light snack if you are hungry",
    }
}

/// Daily protein target for a training intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProteinIntensity {
    Low,
    #[default]
    Moderate,
    High,
}

pub fn protein_target_for_intensity(weight_kg: f64, intensity: ProteinIntensity) -> i32 {
    let g_per_kg = match intensity {
        ProteinIntensity::Low => 1.6,
        ProteinIntensity::Moderate => 1.8,
        ProteinIntensity::High => 2.2,
    };
    (weight_kg * g_per_kg).round() as i32
}

// ─── Guidance Text ───────────────────────────────────────────

pub fn pre_workout_guidelines(day_type: DayType) -> &'static str {
    match day_type {
        DayType::LongRun => {
            "3-4h before: carb-rich meal, low in fiber and fat\n\
             30-60min before: simple snack (banana, gel, dates)\n\
             Hydration: 500ml water 2h before"
        }
        DayType::Quality => {
            "2-3h before: meal with moderate carbs\n\
             30min before: optional small snack\n\
             Hydration: 400ml water 2h before"
        }
        DayType::Easy => {
            "Fasted is fine for sessions under 60min\n\
             Or train 1-2h after a light snack\n\
             Normal hydration"
        }
        DayType::Strength => {
            "1-2h before: snack with protein and carbs\n\
             e.g. Greek yogurt with fruit, or toast with egg\n\
             Hydration: 300ml water 1h before"
        }
        DayType::HighVolume => {
            "2-3h before: full meal with carbs and protein\n\
             30min before: simple-carb snack\n\
             Hydration: 500ml water 2h before, caffeine optional"
        }
        DayType::RaceDay => {
            "3-4h before: high-carb meal, low in fiber and fat\n\
             e.g. white bread with jam, oats with banana\n\
             30min before: gel or sports drink\n\
             Hydration: 500ml water, then sips until the start"
        }
        DayType::RaceWeek => {
            "Increase carbs gradually\n\
             Cut fiber for the last 2-3 days\n\
             Keep hydration high"
        }
        DayType::Deload => {
            "Eat to appetite, no forcing\n\
             Keep protein high for recovery\n\
             Normal hydration"
        }
        DayType::Rest => "Rest day: eat according to hunger and goals",
    }
}

pub fn post_workout_guidelines(day_type: DayType) -> &'static str {
    match day_type {
        DayType::LongRun => {
            "Within 30min: recovery drink or carb + protein snack\n\
             1-2h after: full meal rich in carbs and protein\n\
             Rehydrate: 1.5L per kg of body weight lost"
        }
        DayType::Quality => {
            "30-60min: snack with 20-30g protein\n\
             Next meal: balanced with an emphasis on protein\n\
             Rehydrate adequately"
        }
        DayType::Easy => {
            "Normal next meal\n\
             Moderate protein (20g minimum)\n\
             Not urgent if a meal is coming soon"
        }
        DayType::Strength => {
            "30min: fast-absorbing protein (30-40g)\n\
             e.g. whey shake, Greek yogurt\n\
             Next meal: protein-rich for muscle synthesis"
        }
        DayType::HighVolume => {
            "Immediately: 40-50g protein + 50-80g carbs\n\
             e.g. shake with whey, banana and oats\n\
             2h after: full high-protein meal\n\
             Prioritize sleep for recovery"
        }
        DayType::RaceDay => {
            "Immediately: recovery drink or snack\n\
             1h after: full meal\n\
             Celebrate, but keep hydrating"
        }
        DayType::RaceWeek | DayType::Deload | DayType::Rest => {
            "Eat according to your normal plan, prioritize protein"
        }
    }
}

/// Advisory nutrition summary for a goal.
pub fn nutrition_summary_for_goal(goal: &Goal) -> &'static str {
    const MAINTENANCE: &str = "Maintenance goal:\n\
        - Protein: 1.8g/kg minimum\n\
        - Carbs: according to daily activity\n\
        - Calories: maintenance\n\
        - Consistency is key";

    match goal {
        Goal::Endurance(_) => {
            "Endurance goal:\n\
             - Protein: 1.6-1.8g/kg to preserve muscle\n\
             - Carbs: the priority, 5-7g/kg depending on volume\n\
             - Fat: at least 0.8g/kg, prefer unsaturated\n\
             - Timing: carbs before, during and after long sessions"
        }
        Goal::Strength(g) => match g.focus {
            StrengthFocus::Hypertrophy => {
                "Hypertrophy goal:\n\
                 - Protein: 2.0-2.2g/kg spread over 4-5 meals\n\
                 - Carbs: 4-5g/kg for energy and recovery\n\
                 - Calorie surplus: +200-300 kcal/day\n\
                 - Timing: protein every 3-4h, carbs around training"
            }
            StrengthFocus::Strength => {
                "Strength goal:\n\
                 - Protein: 1.8-2.0g/kg\n\
                 - Carbs: 3-4g/kg\n\
                 - Calories: maintenance or a slight surplus\n\
                 - Timing: protein after training, moderate carbs"
            }
            _ => MAINTENANCE,
        },
        Goal::BodyComposition(g) => match g.focus {
            BodyCompFocus::FatLoss => {
                "Fat loss goal:\n\
                 - Protein: 2.2g/kg MINIMUM to protect muscle\n\
                 - Carbs: 2-3g/kg, timed around training\n\
                 - Deficit: 400-600 kcal/day, no more aggressive\n\
                 - Priority: protein > vegetables > carbs"
            }
            BodyCompFocus::MuscleGain => {
                "Muscle gain goal:\n\
                 - Protein: 2.0g/kg spread evenly\n\
                 - Carbs: 4-5g/kg for energy\n\
                 - Surplus: +200-300 kcal/day for lean gains\n\
                 - Patience: 0.5-1kg/month is ideal"
            }
            BodyCompFocus::Recomposition => {
                "Recomposition goal:\n\
                 - Protein: 2.2g/kg, top priority\n\
                 - Carbs: cycled with training\n\
                 - Calories: slight deficit or maintenance\n\
                 - Slow but effective"
            }
            BodyCompFocus::Maintenance => {
                "Maintenance goal:\n\
                 - Keep habits consistent\n\
                 - Protein: 1.8g/kg\n\
                 - Adjust to energy and performance"
            }
            BodyCompFocus::Performance => {
                "Performance goal:\n\
                 - Nutrition serves training\n\
                 - Enough carbs to perform\n\
                 - Protein to recover\n\
                 - No unnecessary restrictions"
            }
        },
    }
}

// ─── Meal Templates ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealTemplate {
    pub key: &'static str,
    pub description: &'static str,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

const fn meal(
    key: &'static str,
    description: &'static str,
    calories: u32,
    protein: u32,
    carbs: u32,
    fat: u32,
) -> MealTemplate {
    MealTemplate {
        key,
        description,
        calories,
        protein,
        carbs,
        fat,
    }
}

pub const MEAL_TEMPLATES: &[MealTemplate] = &[
    meal("breakfast_pre_long", "Oats with banana and honey", 450, 12, 85, 8),
    meal("breakfast", "Toast with egg and avocado", 400, 20, 35, 22),
    meal("lunch_post_run", "Chicken with rice and vegetables", 550, 40, 60, 14),
    meal("dinner_recovery", "Salmon with potato and salad", 500, 35, 40, 20),
    meal("snack_protein", "Greek yogurt with walnuts", 250, 20, 12, 14),
    meal("snack_pre_run", "Banana with peanut butter", 200, 5, 30, 8),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, BodyCompositionGoal, StrengthGoal};
    use chrono::Utc;

    fn profile() -> NutritionProfile {
        NutritionProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::High,
        }
    }

    fn entry(calories: f64, protein: f64, carbs: f64, fat: f64, fiber: Option<f64>) -> FoodEntry {
        FoodEntry {
            id: "e".to_string(),
            food_id: "manual_1".to_string(),
            name: "food".to_string(),
            quantity: 1.0,
            unit: "serving".to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_bmr_and_tdee() {
        let p = profile();
        assert!((bmr(&p) - 1648.75).abs() < 1e-9);
        assert_eq!(tdee(&p), 2844);

        let female = NutritionProfile {
            sex: Sex::Female,
            ..p
        };
        assert!((bmr(&female) - 1482.75).abs() < 1e-9);
    }

    #[test]
    fn test_easy_day_targets() {
        let t = targets_for_day_type(&profile(), DayType::Easy).unwrap();
        assert_eq!(
            t,
            MacroTargets {
                calories: 2844,
                protein: 126,
                carbs: 280,
                fat: 136,
                fiber: 30,
            }
        );
    }

    fn profiles() -> Vec<NutritionProfile> {
        vec![
            NutritionProfile {
                weight_kg: 55.0,
                height_cm: 162.0,
                age: 24,
                sex: Sex::Female,
                activity_level: ActivityLevel::Moderate,
            },
            profile(),
            NutritionProfile {
                weight_kg: 92.0,
                height_cm: 188.0,
                age: 45,
                sex: Sex::Male,
                activity_level: ActivityLevel::VeryHigh,
            },
            NutritionProfile {
                weight_kg: 68.5,
                height_cm: 170.0,
                age: 61,
                sex: Sex::Female,
                activity_level: ActivityLevel::Low,
            },
        ]
    }

    fn all_goals() -> Vec<Goal> {
        let mut goals = vec![Goal::Endurance(crate::models::EnduranceGoal {
            sport: crate::models::Sport::Running,
            distance: crate::models::RaceDistance::Marathon,
            target_date: None,
            target_time: None,
            fitness_level: None,
        })];
        goals.extend(StrengthFocus::ALL.iter().map(|&focus| {
            Goal::Strength(StrengthGoal {
                focus,
                target_date: None,
                lift_targets: None,
            })
        }));
        goals.extend(BodyCompFocus::ALL.iter().map(|&focus| {
            Goal::BodyComposition(BodyCompositionGoal {
                focus,
                target_date: None,
                target_weight_kg: None,
                target_body_fat: None,
            })
        }));
        goals
    }

    /// Fat respects its floor, and unless the floor decided it the macros sum to the target.
    fn check_energy(p: &NutritionProfile, t: &MacroTargets) {
        let floor = (p.weight_kg * FAT_FLOOR_G_PER_KG).round() as i32;
        assert!(t.fat >= floor, "fat {} below floor {}", t.fat, floor);

        if t.fat > floor {
            let implied = 9 * t.fat + 4 * t.protein + 4 * t.carbs;
            // Each macro is rounded to whole grams: 4.5 + 2 + 2 kcal at most
            assert!(
                (implied - t.calories).abs() <= 9,
                "implied {} vs target {} for {:?}",
                implied,
                t.calories,
                t
            );
        }
    }

    #[test]
    fn test_energy_adds_up_for_every_day_type() {
        for p in profiles() {
            for day_type in DayType::ALL {
                let t = targets_for_day_type(&p, day_type).unwrap();
                check_energy(&p, &t);
            }
        }
    }

    #[test]
    fn test_energy_adds_up_for_every_goal() {
        for p in profiles() {
            for goal in all_goals() {
                let t = targets_for_goal(&p, &goal).unwrap();
                check_energy(&p, &t);
            }
        }
    }

    #[test]
    fn test_targets_are_idempotent() {
        for p in profiles() {
            for day_type in DayType::ALL {
                assert_eq!(
                    targets_for_day_type(&p, day_type).unwrap(),
                    targets_for_day_type(&p, day_type).unwrap()
                );
            }
            for goal in all_goals() {
                assert_eq!(
                    targets_for_goal(&p, &goal).unwrap(),
                    targets_for_goal(&p, &goal).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_fat_floor_applies() {
        // Race day: carbs alone exceed the energy budget
        let t = targets_for_day_type(&profile(), DayType::RaceDay).unwrap();
        assert_eq!(t.carbs, 700);
        assert_eq!(t.fat, 56);
    }

    #[test]
    fn test_goal_targets() {
        let fat_loss = Goal::BodyComposition(BodyCompositionGoal {
            focus: BodyCompFocus::FatLoss,
            target_date: None,
            target_weight_kg: None,
            target_body_fat: None,
        });
        let t = targets_for_goal(&profile(), &fat_loss).unwrap();
        assert_eq!(t.calories, 2344);
        assert_eq!(t.protein, 154);
        assert_eq!(t.carbs, 140);

        let functional = Goal::Strength(StrengthGoal {
            focus: StrengthFocus::Functional,
            target_date: None,
            lift_targets: None,
        });
        assert_eq!(goal_rule(&functional), rule(1.8, 3.0, 0));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let p = NutritionProfile {
            weight_kg: 0.0,
            ..profile()
        };
        assert!(targets_for_day_type(&p, DayType::Easy).is_err());
    }

    #[test]
    fn test_totals_and_remaining() {
        let entries = vec![
            entry(500.0, 30.0, 60.0, 10.0, Some(5.0)),
            entry(300.0, 20.0, 20.0, 15.0, None),
        ];
        let totals = calculate_totals(&entries);
        assert_eq!(totals.calories, 800.0);
        assert_eq!(totals.fiber, Some(5.0));

        let targets = MacroTargets {
            calories: 700,
            protein: 126,
            carbs: 280,
            fat: 20,
            fiber: 30,
        };
        let remaining = calculate_remaining(&totals, &targets);
        assert_eq!(remaining.calories, -100.0);
        assert_eq!(remaining.protein, 76.0);
        assert_eq!(remaining.fat, -5.0);
        assert_eq!(remaining.fiber, Some(25.0));
    }

    #[test]
    fn test_percentages() {
        assert_eq!(
            calculate_macro_percentages(&MacroTotals::default()),
            MacroPercentages::default()
        );

        let totals = MacroTotals {
            calories: 0.0,
            protein: 100.0,
            carbs: 100.0,
            fat: 400.0 / 9.0,
            fiber: None,
        };
        let pct = calculate_macro_percentages(&totals);
        assert_eq!((pct.protein, pct.carbs, pct.fat), (33, 33, 33));
    }

    #[test]
    fn test_meal_focus_branches() {
        let r = |calories, protein, carbs| MacroTotals {
            calories,
            protein,
            carbs,
            fat: 0.0,
            fiber: None,
        };
        assert!(suggest_meal_focus(&r(900.0, 40.0, 80.0)).contains("protein and carbs"));
        assert!(suggest_meal_focus(&r(900.0, 40.0, 10.0)).contains("lean protein"));
        assert!(suggest_meal_focus(&r(900.0, 10.0, 80.0)).contains("complex carbs"));
        assert!(suggest_meal_focus(&r(400.0, 10.0, 10.0)).contains("Balanced"));
        assert!(suggest_meal_focus(&r(100.0, 10.0, 10.0)).contains("light snack"));
    }

    #[test]
    fn test_protein_intensity() {
        assert_eq!(protein_target_for_intensity(70.0, ProteinIntensity::Low), 112);
        assert_eq!(protein_target_for_intensity(70.0, ProteinIntensity::Moderate), 126);
        assert_eq!(protein_target_for_intensity(70.0, ProteinIntensity::High), 154);
    }
}
