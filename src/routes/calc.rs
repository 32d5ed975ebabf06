// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public calculator routes. Nothing here touches storage.

use crate::error::{AppError, Result};
use crate::models::{
    ActivityLevel, DayType, EnduranceGoal, Goal, MacroTargets, NutritionProfile, PlanWeek, Sex,
    StrengthRoutine, TrainingPlan,
};
use crate::services::macros::{MealTemplate, ProteinIntensity, MEAL_TEMPLATES};
use crate::services::zones::{self, HeartRateZones, PaceZone};
use crate::services::{macros, strength, training_plan};
use crate::time_utils::{format_duration, format_pace, parse_duration};
use crate::AppState;
use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calc/macros", post(calc_macros))
        .route("/calc/plan", post(calc_plan))
        .route("/calc/pace-zones", get(calc_pace_zones))
        .route("/calc/race-time", post(calc_race_time))
        .route("/calc/heart-rate-zones", get(calc_heart_rate_zones))
        .route("/strength/phase/{phase}", get(strength_for_phase))
        .route("/strength/focus/{focus}", get(strength_for_focus))
        .route("/nutrition/guidelines/{day_type}", get(nutrition_guidelines))
        .route("/nutrition/protein", get(protein_target))
        .route("/nutrition/meal-templates", get(meal_templates))
}

// ─── Macros ──────────────────────────────────────────────────

/// Profile plus either a day type or a goal. A day type wins when both are given.
#[derive(Debug, Deserialize, Validate)]
pub struct MacrosRequest {
    #[validate(range(max = 500.0, message = "Weight must be at most 500 kg"))]
    pub weight_kg: f64,
    #[validate(range(max = 300.0, message = "Height must be at most 300 cm"))]
    pub height_cm: f64,
    #[validate(range(max = 120, message = "Age must be at most 120"))]
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub day_type: Option<String>,
    #[serde(default)]
    pub goal: Option<Goal>,
}

#[derive(Debug, Serialize)]
pub struct MacrosResponse {
    pub bmr: f64,
    pub tdee: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_type: Option<DayType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<&'static str>,
    pub targets: MacroTargets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'static str>,
}

async fn calc_macros(Json(req): Json<MacrosRequest>) -> Result<Json<MacrosResponse>> {
    req.validate()?;

    let profile = NutritionProfile {
        weight_kg: req.weight_kg,
        height_cm: req.height_cm,
        age: req.age,
        sex: req.sex,
        activity_level: req.activity_level,
    };

    let response = match (req.day_type.as_deref(), req.goal.as_ref()) {
        (Some(raw), _) => {
            let day_type = DayType::parse_lenient(raw);
            MacrosResponse {
                bmr: macros::bmr(&profile),
                tdee: macros::tdee(&profile),
                day_type: Some(day_type),
                goal_type: None,
                targets: macros::targets_for_day_type(&profile, day_type)?,
                summary: None,
            }
        }
        (None, Some(goal)) => MacrosResponse {
            bmr: macros::bmr(&profile),
            tdee: macros::tdee(&profile),
            day_type: None,
            goal_type: Some(goal.kind()),
            targets: macros::targets_for_goal(&profile, goal)?,
            summary: Some(macros::nutrition_summary_for_goal(goal)),
        },
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either day_type or goal is required".to_string(),
            ))
        }
    };

    Ok(Json(response))
}

// ─── Training Plan ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    pub goal: EnduranceGoal,
    #[serde(default)]
    #[validate(range(max = 1000.0, message = "Weekly volume must be at most 1000 km"))]
    pub current_weekly_km: f64,
    /// Highlights the week to train now
    #[serde(default)]
    pub weeks_to_race: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: TrainingPlan,
    pub current_week: Option<PlanWeek>,
}

async fn calc_plan(Json(req): Json<PlanRequest>) -> Result<Json<PlanResponse>> {
    req.validate()?;

    let plan = training_plan::generate_plan(&req.goal, req.current_weekly_km)?;
    let current_week = req
        .weeks_to_race
        .and_then(|w| plan.current_week(w))
        .cloned();

    Ok(Json(PlanResponse { plan, current_week }))
}

// ─── Zones & Race Prediction ─────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PaceZonesQuery {
    /// Seconds per km, or "m:ss"
    target_pace: String,
}

#[derive(Debug, Serialize)]
pub struct PaceZonesResponse {
    pub target_pace: String,
    pub zones: Vec<PaceZone>,
}

/// Accept either plain seconds or an "m:ss" string.
fn parse_pace(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .or_else(|| parse_duration(raw).map(f64::from))
}

async fn calc_pace_zones(Query(q): Query<PaceZonesQuery>) -> Result<Json<PaceZonesResponse>> {
    let pace = parse_pace(&q.target_pace).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid target_pace: {}", q.target_pace))
    })?;

    let zones = zones::pace_zones(pace)?;

    Ok(Json(PaceZonesResponse {
        target_pace: format_pace(pace),
        zones,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RaceTimeRequest {
    pub known_distance_km: f64,
    /// "h:mm:ss" or "mm:ss"
    #[validate(length(min = 3, max = 10))]
    pub known_time: String,
    pub target_distance_km: f64,
}

#[derive(Debug, Serialize)]
pub struct RaceTimeResponse {
    pub predicted_seconds: f64,
    pub predicted_time: String,
    pub predicted_pace: String,
    pub exponent: f64,
}

async fn calc_race_time(Json(req): Json<RaceTimeRequest>) -> Result<Json<RaceTimeResponse>> {
    req.validate()?;

    let known_seconds = parse_duration(&req.known_time).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid known_time: {}", req.known_time))
    })?;

    let predicted = zones::predict_race_time(
        req.known_distance_km,
        f64::from(known_seconds),
        req.target_distance_km,
    )?;

    Ok(Json(RaceTimeResponse {
        predicted_seconds: predicted.round(),
        predicted_time: format_duration(predicted),
        predicted_pace: format_pace(predicted / req.target_distance_km),
        exponent: zones::riegel_exponent(req.target_distance_km),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct HeartRateQuery {
    #[validate(range(min = 100, max = 250, message = "max_hr must be between 100 and 250"))]
    max_hr: Option<u32>,
    #[validate(range(min = 1, max = 120, message = "age must be between 1 and 120"))]
    age: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HeartRateResponse {
    pub max_hr: u32,
    pub zones: HeartRateZones,
}

async fn calc_heart_rate_zones(Query(q): Query<HeartRateQuery>) -> Result<Json<HeartRateResponse>> {
    q.validate()?;

    let max_hr = match (q.max_hr, q.age) {
        (Some(hr), _) => hr,
        (None, Some(age)) => 220u32.saturating_sub(age),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either max_hr or age is required".to_string(),
            ))
        }
    };

    Ok(Json(HeartRateResponse {
        max_hr,
        zones: zones::heart_rate_zones(max_hr),
    }))
}

// ─── Strength & Nutrition Guidance ───────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RoutineFormat {
    /// "text" for a printable workout card, JSON otherwise
    #[serde(default)]
    format: Option<String>,
}

fn routines_response(
    routines: &'static [&'static StrengthRoutine],
    fmt: &RoutineFormat,
) -> Response {
    match fmt.format.as_deref() {
        Some("text") => routines
            .iter()
            .map(|r| strength::format_routine(r))
            .collect::<Vec<_>>()
            .join("\n")
            .into_response(),
        _ => Json(routines).into_response(),
    }
}

/// Unknown phases return an empty list.
async fn strength_for_phase(
    Path(phase): Path<String>,
    Query(fmt): Query<RoutineFormat>,
) -> Response {
    routines_response(strength::routines_for_phase_name(&phase), &fmt)
}

/// Unknown foci return an empty list.
async fn strength_for_focus(
    Path(focus): Path<String>,
    Query(fmt): Query<RoutineFormat>,
) -> Response {
    routines_response(strength::routines_for_focus_name(&focus), &fmt)
}

#[derive(Debug, Serialize)]
pub struct GuidelinesResponse {
    pub day_type: DayType,
    pub pre_workout: &'static str,
    pub post_workout: &'static str,
}

async fn nutrition_guidelines(Path(raw): Path<String>) -> Json<GuidelinesResponse> {
    let day_type = DayType::parse_lenient(&raw);
    Json(GuidelinesResponse {
        day_type,
        pre_workout: macros::pre_workout_guidelines(day_type),
        post_workout: macros::post_workout_guidelines(day_type),
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProteinQuery {
    #[validate(range(min = 20.0, max = 500.0, message = "weight_kg must be between 20 and 500"))]
    weight_kg: f64,
    #[serde(default)]
    intensity: ProteinIntensity,
}

#[derive(Debug, Serialize)]
pub struct ProteinResponse {
    pub intensity: ProteinIntensity,
    pub protein_g: i32,
}

/// Daily protein for a body weight and training intensity.
async fn protein_target(Query(q): Query<ProteinQuery>) -> Result<Json<ProteinResponse>> {
    q.validate()?;
    Ok(Json(ProteinResponse {
        intensity: q.intensity,
        protein_g: macros::protein_target_for_intensity(q.weight_kg, q.intensity),
    }))
}

async fn meal_templates() -> Json<&'static [MealTemplate]> {
    Json(MEAL_TEMPLATES)
}
