// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    ActivityLevel, Athlete, AthleteGoals, BodyCompositionEntry, DayType, FoodEntry, Goal,
    MacroPercentages, MacroTargets, MacroTotals, NewAthlete, NutritionDay, PlanWeek, Sex,
    StrengthRecommendation, StrengthWeek, TrainingPlan,
};
use crate::services::training_load::{self, TrainingLoad, WeekSummary};
use crate::services::zones::{self, HeartRateZones};
use crate::services::{macros, strength, training_plan};
use crate::time_utils::{date_key, format_utc_rfc3339, parse_date_key};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_HISTORY_DAYS: u32 = 7;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(put_profile))
        .route("/api/profile/weight", put(put_weight))
        .route("/api/goals/primary", put(put_primary_goal))
        .route(
            "/api/goals/secondary",
            put(put_secondary_goal).delete(delete_secondary_goal),
        )
        .route("/api/plan", get(get_plan))
        .route("/api/nutrition/targets", get(get_nutrition_targets))
        .route("/api/nutrition/day/{date}", get(get_nutrition_day))
        .route("/api/nutrition/entries", post(add_food_entry))
        .route(
            "/api/nutrition/day/{date}/entries/{entry_id}",
            delete(remove_food_entry),
        )
        .route("/api/nutrition/history", get(get_nutrition_history))
        .route(
            "/api/body-composition",
            post(add_body_composition).get(list_body_composition),
        )
        .route("/api/zones/heart-rate", get(get_heart_rate_zones))
        .route("/api/strength/recommendation", get(get_strength_recommendation))
        .route("/api/dashboard", get(get_dashboard))
}

async fn load_athlete(state: &AppState, user_id: &str) -> Result<Athlete> {
    state.db.get_athlete(user_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Athlete {} has not completed onboarding", user_id))
    })
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_date_key(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw)))
}

fn max_heart_rate(athlete: &Athlete) -> u32 {
    athlete
        .max_heart_rate
        .unwrap_or_else(|| 220u32.saturating_sub(athlete.age))
}

/// Targets for a day: the day type when given, otherwise the primary goal.
fn targets_for(athlete: &Athlete, day_type: Option<DayType>) -> Result<MacroTargets> {
    let profile = athlete.nutrition_profile();
    let targets = match day_type {
        Some(day_type) => macros::targets_for_day_type(&profile, day_type)?,
        None => macros::targets_for_goal(&profile, &athlete.goals.primary)?,
    };
    Ok(targets)
}

// ─── Profile ─────────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: String,
    /// `None` until onboarding is complete
    pub athlete: Option<Athlete>,
    pub strava_connected: bool,
    pub hevy_connected: bool,
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let (athlete, strava, hevy) = tokio::try_join!(
        state.db.get_athlete(&user.user_id),
        state.db.get_strava_tokens(&user.user_id),
        state.db.get_hevy_credentials(&user.user_id),
    )?;

    Ok(Json(MeResponse {
        user_id: user.user_id,
        athlete,
        strava_connected: strava.is_some(),
        hevy_connected: hevy.is_some(),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
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
    #[validate(range(min = 25, max = 120))]
    pub resting_heart_rate: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 100, max = 250))]
    pub max_heart_rate: Option<u32>,
}

/// Create the profile at onboarding, or update it. Goals survive updates.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Athlete>> {
    req.validate()?;
    let now = Utc::now();

    let new = NewAthlete {
        name: req.name,
        weight_kg: req.weight_kg,
        height_cm: req.height_cm,
        age: req.age,
        sex: req.sex,
        activity_level: req.activity_level,
        resting_heart_rate: req.resting_heart_rate,
        max_heart_rate: req.max_heart_rate,
    };

    let athlete = match state.db.get_athlete(&user.user_id).await? {
        Some(existing) => {
            let mut updated = Athlete::create(&user.user_id, new, now)?;
            updated.goals = existing.goals;
            updated.body_fat_percentage = existing.body_fat_percentage;
            updated.created_at = existing.created_at;
            updated
        }
        None => {
            tracing::info!(user_id = %user.user_id, "Onboarding new athlete");
            Athlete::create(&user.user_id, new, now)?
        }
    };

    state.db.upsert_athlete(&athlete).await?;
    Ok(Json(athlete))
}

#[derive(Debug, Deserialize, Validate)]
pub struct WeightRequest {
    #[validate(range(max = 500.0, message = "Weight must be at most 500 kg"))]
    pub weight_kg: f64,
}

async fn put_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<WeightRequest>,
) -> Result<Json<Athlete>> {
    req.validate()?;

    let mut athlete = load_athlete(&state, &user.user_id).await?;
    athlete.update_weight(req.weight_kg, Utc::now())?;
    state.db.upsert_athlete(&athlete).await?;

    Ok(Json(athlete))
}

// ─── Goals ───────────────────────────────────────────────────

async fn put_primary_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(goal): Json<Goal>,
) -> Result<Json<AthleteGoals>> {
    let mut athlete = load_athlete(&state, &user.user_id).await?;

    tracing::info!(user_id = %user.user_id, goal = goal.kind(), "Setting primary goal");
    athlete.set_primary_goal(goal, Utc::now());
    state.db.upsert_athlete(&athlete).await?;

    Ok(Json(athlete.goals))
}

async fn put_secondary_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(goal): Json<Goal>,
) -> Result<Json<AthleteGoals>> {
    let mut athlete = load_athlete(&state, &user.user_id).await?;
    athlete.set_secondary_goal(Some(goal), Utc::now());
    state.db.upsert_athlete(&athlete).await?;

    Ok(Json(athlete.goals))
}

async fn delete_secondary_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AthleteGoals>> {
    let mut athlete = load_athlete(&state, &user.user_id).await?;
    athlete.set_secondary_goal(None, Utc::now());
    state.db.upsert_athlete(&athlete).await?;

    Ok(Json(athlete.goals))
}

// ─── Training Plan ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PlanQuery {
    /// Falls back to the average of the last four weeks of cached runs
    current_weekly_km: Option<f64>,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub plan: TrainingPlan,
    pub weeks_to_race: Option<u32>,
    pub current_week: Option<PlanWeek>,
}

/// Average weekly running km over the last 28 days of cached activities.
async fn recent_weekly_km(state: &AppState, user_id: &str, now: DateTime<Utc>) -> f64 {
    let since = format_utc_rfc3339(now - Duration::days(28));
    match state.db.cached_activities_since(user_id, &since).await {
        Ok(activities) => training_load::week_summary(&activities).total_distance_km / 4.0,
        Err(e) => {
            tracing::warn!(error = %e, user_id, "Could not load cached activities");
            0.0
        }
    }
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<PlanQuery>,
) -> Result<Json<PlanResponse>> {
    let athlete = load_athlete(&state, &user.user_id).await?;
    let goal = athlete.goals.primary.as_endurance().ok_or_else(|| {
        AppError::BadRequest("A training plan needs an endurance primary goal".to_string())
    })?;

    let now = Utc::now();
    let current_weekly_km = match q.current_weekly_km {
        Some(km) => km,
        None => recent_weekly_km(&state, &user.user_id, now).await,
    };

    let plan = training_plan::generate_plan(goal, current_weekly_km)?;
    let weeks_to_race = goal
        .target_date
        .and_then(|d| training_plan::weeks_to_race(d, now.date_naive()));
    let current_week = weeks_to_race.and_then(|w| plan.current_week(w)).cloned();

    Ok(Json(PlanResponse {
        plan,
        weeks_to_race,
        current_week,
    }))
}

// ─── Nutrition ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DayTypeQuery {
    day_type: Option<String>,
}

#[derive(Serialize)]
pub struct TargetsResponse {
    pub day_type: Option<DayType>,
    pub targets: MacroTargets,
    pub summary: &'static str,
}

async fn get_nutrition_targets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<DayTypeQuery>,
) -> Result<Json<TargetsResponse>> {
    let athlete = load_athlete(&state, &user.user_id).await?;
    let day_type = q.day_type.as_deref().map(DayType::parse_lenient);

    Ok(Json(TargetsResponse {
        day_type,
        targets: targets_for(&athlete, day_type)?,
        summary: macros::nutrition_summary_for_goal(&athlete.goals.primary),
    }))
}

/// A logged day with progress against its targets.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayProgress {
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub day: NutritionDay,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub totals: MacroTotals,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub targets: MacroTargets,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub remaining: MacroTotals,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub percentages: MacroPercentages,
    pub suggestion: String,
}

fn day_progress(day: NutritionDay, targets: MacroTargets) -> DayProgress {
    let totals = macros::calculate_totals(&day.entries);
    let remaining = macros::calculate_remaining(&totals, &targets);
    DayProgress {
        percentages: macros::calculate_macro_percentages(&totals),
        suggestion: macros::suggest_meal_focus(&remaining).to_string(),
        day,
        totals,
        targets,
        remaining,
    }
}

async fn get_nutrition_day(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Query(q): Query<DayTypeQuery>,
) -> Result<Json<DayProgress>> {
    let date = date_key(parse_day(&date)?);
    let athlete = load_athlete(&state, &user.user_id).await?;
    let targets = targets_for(&athlete, q.day_type.as_deref().map(DayType::parse_lenient))?;

    let day = state.db.get_nutrition_day(&user.user_id, &date).await?;
    Ok(Json(day_progress(day, targets)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct FoodEntryRequest {
    /// Defaults to today (UTC)
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub food_id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be positive"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub calories: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carbs: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 500.0))]
    pub fiber: Option<f64>,
}

impl FoodEntryRequest {
    fn into_entry(self, now: DateTime<Utc>) -> FoodEntry {
        let id = format!("{:x}", now.timestamp_micros());
        FoodEntry {
            food_id: self.food_id.unwrap_or_else(|| format!("manual_{}", id)),
            id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            timestamp: now,
        }
    }
}

async fn add_food_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FoodEntryRequest>,
) -> Result<(StatusCode, Json<NutritionDay>)> {
    req.validate()?;

    let now = Utc::now();
    let date = match req.date.as_deref() {
        Some(raw) => date_key(parse_day(raw)?),
        None => date_key(now.date_naive()),
    };

    let entry = req.into_entry(now);
    let day = state
        .db
        .append_food_entry(&user.user_id, &date, &entry)
        .await?;

    tracing::debug!(user_id = %user.user_id, date = %date, entry_id = %entry.id, "Logged food entry");
    Ok((StatusCode::CREATED, Json(day)))
}

async fn remove_food_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, entry_id)): Path<(String, String)>,
) -> Result<Json<NutritionDay>> {
    let date = date_key(parse_day(&date)?);

    state
        .db
        .remove_food_entry(&user.user_id, &date, &entry_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Food entry {} on {}", entry_id, date)))
}

#[derive(Debug, Deserialize, Validate)]
struct HistoryQuery {
    #[validate(range(min = 1, max = 90, message = "days must be between 1 and 90"))]
    days: Option<u32>,
}

#[derive(Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub entries: usize,
    pub totals: MacroTotals,
}

async fn get_nutrition_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryDay>>> {
    q.validate()?;
    let days = q.days.unwrap_or(DEFAULT_HISTORY_DAYS);

    let since = Utc::now().date_naive() - Duration::days(i64::from(days) - 1);
    let history = state
        .db
        .nutrition_history(&user.user_id, &date_key(since))
        .await?;

    Ok(Json(
        history
            .into_iter()
            .map(|day| HistoryDay {
                totals: macros::calculate_totals(&day.entries),
                entries: day.entries.len(),
                date: day.date,
            })
            .collect(),
    ))
}

// ─── Body Composition ────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct BodyCompositionRequest {
    #[validate(range(max = 500.0, message = "Weight must be at most 500 kg"))]
    pub weight_kg: f64,
    #[validate(range(max = 70.0, message = "Body fat must be at most 70%"))]
    pub body_fat_percentage: f64,
}

/// Append a measurement and mirror it onto the profile.
async fn add_body_composition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BodyCompositionRequest>,
) -> Result<(StatusCode, Json<BodyCompositionEntry>)> {
    req.validate()?;
    let now = Utc::now();

    let entry =
        BodyCompositionEntry::calculate(&user.user_id, req.weight_kg, req.body_fat_percentage, now)?;
    let mut athlete = load_athlete(&state, &user.user_id).await?;
    athlete.apply_body_composition(entry.weight_kg, entry.body_fat_percentage, now)?;

    state.db.record_body_composition(&entry, &athlete).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_body_composition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BodyCompositionEntry>>> {
    Ok(Json(state.db.list_body_composition(&user.user_id).await?))
}

// ─── Zones & Strength ────────────────────────────────────────

#[derive(Serialize)]
pub struct HeartRateZonesResponse {
    pub max_hr: u32,
    pub zones: HeartRateZones,
}

async fn get_heart_rate_zones(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HeartRateZonesResponse>> {
    let athlete = load_athlete(&state, &user.user_id).await?;
    let max_hr = max_heart_rate(&athlete);

    Ok(Json(HeartRateZonesResponse {
        max_hr,
        zones: zones::heart_rate_zones(max_hr),
    }))
}

#[derive(Serialize)]
pub struct StrengthResponse {
    pub recommendation: StrengthRecommendation,
    /// Phase-specific week when an endurance plan is in progress
    pub this_week: Option<StrengthWeek>,
}

/// Plan week the athlete is in, if the primary goal is a dated endurance goal.
fn current_plan_week(athlete: &Athlete, today: NaiveDate) -> Option<PlanWeek> {
    let goal = athlete.goals.primary.as_endurance()?;
    let weeks_left = training_plan::weeks_to_race(goal.target_date?, today)?;
    let plan = training_plan::generate_plan(goal, 0.0).ok()?;
    plan.current_week(weeks_left).cloned()
}

async fn get_strength_recommendation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StrengthResponse>> {
    let athlete = load_athlete(&state, &user.user_id).await?;
    let this_week = current_plan_week(&athlete, Utc::now().date_naive())
        .map(|week| strength::strength_week(week.phase));

    Ok(Json(StrengthResponse {
        recommendation: strength::strength_recommendation(&athlete.goals.primary),
        this_week,
    }))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub athlete: Athlete,
    pub today: DayProgress,
    pub week: WeekSummary,
    pub load: TrainingLoad,
    pub suggested_workout: &'static str,
    pub plan_week: Option<PlanWeek>,
    pub latest_body_composition: Option<BodyCompositionEntry>,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let now = Utc::now();
    let today = date_key(now.date_naive());
    let since = format_utc_rfc3339(now - Duration::days(28));

    let (athlete, day, activities, latest_body_composition) = tokio::try_join!(
        load_athlete(&state, &user.user_id),
        state.db.get_nutrition_day(&user.user_id, &today),
        state.db.cached_activities_since(&user.user_id, &since),
        state.db.latest_body_composition(&user.user_id),
    )?;

    let week_start = format_utc_rfc3339(now - Duration::days(7));
    let this_week: Vec<_> = activities
        .iter()
        .filter(|a| a.start_date >= week_start)
        .cloned()
        .collect();

    let week = training_load::week_summary(&this_week);
    let load = training_load::training_load(&activities, max_heart_rate(&athlete), now);

    Ok(Json(DashboardResponse {
        today: day_progress(day, targets_for(&athlete, None)?),
        suggested_workout: training_load::suggest_workout(&week, &load),
        plan_week: current_plan_week(&athlete, now.date_naive()),
        week,
        load,
        latest_body_composition,
        athlete,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnduranceGoal, FitnessLevel, RaceDistance, Sport};

    fn athlete() -> Athlete {
        Athlete::create(
            "u1",
            NewAthlete {
                name: "Ana".to_string(),
                weight_kg: 62.0,
                height_cm: 168.0,
                age: 34,
                sex: Sex::Female,
                activity_level: ActivityLevel::Moderate,
                resting_heart_rate: None,
                max_heart_rate: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_food_entry_ids() {
        let now = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let req: FoodEntryRequest = serde_json::from_value(serde_json::json!({
            "name": "Oats",
            "quantity": 80.0,
            "unit": "g",
            "calories": 300.0,
            "protein": 10.0,
            "carbs": 54.0,
            "fat": 5.0
        }))
        .unwrap();

        let entry = req.into_entry(now);
        assert_eq!(entry.food_id, format!("manual_{}", entry.id));
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.fiber, None);
    }

    #[test]
    fn test_food_entry_rejects_negative_macros() {
        let req: FoodEntryRequest = serde_json::from_value(serde_json::json!({
            "name": "Mystery",
            "quantity": 1.0,
            "unit": "serving",
            "calories": 100.0,
            "protein": -5.0,
            "carbs": 10.0,
            "fat": 1.0
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_current_plan_week_needs_dated_endurance_goal() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut athlete = athlete();
        assert_eq!(current_plan_week(&athlete, today), None);

        // 21K plan is 13 weeks; two weeks out is week 12, the taper
        athlete.set_primary_goal(
            Goal::Endurance(EnduranceGoal {
                sport: Sport::Running,
                distance: RaceDistance::HalfMarathon,
                target_date: Some(today + Duration::days(14)),
                target_time: None,
                fitness_level: Some(FitnessLevel::Intermediate),
            }),
            Utc::now(),
        );

        let week = current_plan_week(&athlete, today).unwrap();
        assert_eq!(week.week_number, 12);
        assert_eq!(week.phase, crate::models::PhaseName::Taper);
    }

    #[test]
    fn test_targets_for_prefers_day_type() {
        let athlete = athlete();
        let rest = targets_for(&athlete, Some(DayType::Rest)).unwrap();
        let goal = targets_for(&athlete, None).unwrap();

        // Maintenance goal has no adjustment; rest days take 200 kcal off
        assert_eq!(goal.calories - rest.calories, 200);
    }
}
