// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava and Hevy routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CachedActivity, HevyCredentials};
use crate::services::hevy::{HevyWorkout, WorkoutStats};
use crate::services::training_load::{self, ActivityAnalysis, TrainingLoad, WeekSummary};
use crate::services::zones::{self, HeartRateZones};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/strava/activities", get(get_strava_activities))
        .route(
            "/api/strava/activities/{activity_id}/zones",
            get(get_activity_zone_time),
        )
        .route("/api/strava/summary", get(get_strava_summary))
        .route("/api/strava", delete(disconnect_strava))
        .route("/api/hevy/key", put(put_hevy_key))
        .route("/api/hevy/workouts", get(get_hevy_workouts))
}

// ─── Strava ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct ActivitiesQuery {
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 200, message = "per_page must be between 1 and 200"))]
    per_page: u32,
}

fn default_per_page() -> u32 {
    30
}

#[derive(Serialize)]
pub struct AnalyzedActivity {
    #[serde(flatten)]
    pub activity: CachedActivity,
    pub analysis: ActivityAnalysis,
}

/// Forget stored tokens once Strava has rejected them.
async fn forget_rejected_strava(state: &AppState, user_id: &str, err: &AppError) {
    if err.is_strava_token_error() {
        tracing::warn!(user_id, error = %err, "Strava rejected stored credentials, disconnecting");
        if let Err(e) = state.strava_service.disconnect(user_id).await {
            tracing::error!(user_id, error = %e, "Failed to remove rejected Strava tokens");
        }
    }
}

/// Fetch recent activities from Strava (refreshing the cache) with analysis.
async fn get_strava_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ActivitiesQuery>,
) -> Result<Json<Vec<AnalyzedActivity>>> {
    q.validate()?;

    let activities = match state
        .strava_service
        .list_activities(&user.user_id, q.per_page)
        .await
    {
        Ok(activities) => activities,
        Err(e) => {
            forget_rejected_strava(&state, &user.user_id, &e).await;
            return Err(e);
        }
    };

    Ok(Json(
        activities
            .into_iter()
            .map(|activity| AnalyzedActivity {
                analysis: training_load::analyze_activity(&activity),
                activity,
            })
            .collect(),
    ))
}

#[derive(Serialize)]
pub struct ZoneTimeResponse {
    pub activity_id: u64,
    pub max_hr: u32,
    pub zones: HeartRateZones,
    /// Seconds in z1..z5, from lap averages
    pub seconds_in_zone: [u32; 5],
}

/// Time spent in each heart-rate zone for one activity.
async fn get_activity_zone_time(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ZoneTimeResponse>> {
    let (athlete, laps) = tokio::join!(
        state.db.get_athlete(&user.user_id),
        state.strava_service.list_laps(&user.user_id, activity_id),
    );
    let laps = match laps {
        Ok(laps) => laps,
        Err(e) => {
            forget_rejected_strava(&state, &user.user_id, &e).await;
            return Err(e);
        }
    };

    let max_hr = athlete?
        .and_then(|a| a.max_heart_rate)
        .unwrap_or(DEFAULT_MAX_HR);
    let zones = zones::heart_rate_zones(max_hr);

    Ok(Json(ZoneTimeResponse {
        activity_id,
        max_hr,
        seconds_in_zone: training_load::heart_rate_zone_time(&laps, &zones),
        zones,
    }))
}

#[derive(Serialize)]
pub struct StravaSummaryResponse {
    pub week: WeekSummary,
    pub load: TrainingLoad,
    pub suggested_workout: &'static str,
}

/// Weekly summary and training load from cached activities.
async fn get_strava_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StravaSummaryResponse>> {
    let now = Utc::now();
    let since = format_utc_rfc3339(now - Duration::days(28));
    let week_start = format_utc_rfc3339(now - Duration::days(7));

    let (athlete, activities) = tokio::try_join!(
        state.db.get_athlete(&user.user_id),
        state.db.cached_activities_since(&user.user_id, &since),
    )?;

    let max_hr = athlete
        .and_then(|a| a.max_heart_rate)
        .unwrap_or(DEFAULT_MAX_HR);

    let recent: Vec<CachedActivity> = activities
        .iter()
        .filter(|a| a.start_date >= week_start)
        .cloned()
        .collect();
    let week = training_load::week_summary(&recent);
    let load = training_load::training_load(&activities, max_hr, now);

    Ok(Json(StravaSummaryResponse {
        suggested_workout: training_load::suggest_workout(&week, &load),
        week,
        load,
    }))
}

/// Used before onboarding records a max heart rate.
const DEFAULT_MAX_HR: u32 = 190;

async fn disconnect_strava(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    state.strava_service.disconnect(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "Strava disconnected");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Hevy ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct HevyKeyRequest {
    #[validate(length(min = 8, max = 128, message = "API key must be 8-128 characters"))]
    pub api_key: String,
}

/// Store a Hevy API key after checking it against the API.
async fn put_hevy_key(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<HevyKeyRequest>,
) -> Result<StatusCode> {
    req.validate()?;
    let api_key = req.api_key.trim().to_string();

    state
        .hevy_client
        .list_workouts(&api_key, 1, 1)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = %user.user_id, error = %e, "Hevy key check failed");
            e
        })?;

    let credentials = HevyCredentials {
        api_key,
        updated_at: format_utc_rfc3339(Utc::now()),
    };
    state
        .db
        .set_hevy_credentials(&user.user_id, &credentials)
        .await?;

    tracing::info!(user_id = %user.user_id, "Hevy connected");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct WorkoutsQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    5
}

#[derive(Serialize)]
pub struct WorkoutWithStats {
    #[serde(flatten)]
    pub workout: HevyWorkout,
    pub stats: WorkoutStats,
}

#[derive(Serialize)]
pub struct WorkoutsResponse {
    pub page: u32,
    pub page_count: u32,
    pub workouts: Vec<WorkoutWithStats>,
}

async fn get_hevy_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<WorkoutsQuery>,
) -> Result<Json<WorkoutsResponse>> {
    let credentials = state
        .db
        .get_hevy_credentials(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Hevy is not connected".to_string()))?;

    let page = state
        .hevy_client
        .list_workouts(&credentials.api_key, q.page, q.page_size)
        .await?;

    Ok(Json(WorkoutsResponse {
        page: page.page,
        page_count: page.page_count,
        workouts: page
            .workouts
            .into_iter()
            .map(|workout| WorkoutWithStats {
                stats: workout.stats(),
                workout,
            })
            .collect(),
    }))
}
