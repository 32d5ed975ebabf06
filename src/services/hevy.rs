// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hevy API client for strength-training logs.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const HEVY_API_BASE: &str = "https://api.hevyapp.com/v1";

/// Largest page the Hevy API accepts.
pub const MAX_PAGE_SIZE: u32 = 10;

/// Hevy API client.
#[derive(Clone)]
pub struct HevyClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for HevyClient {
    fn default() -> Self {
        Self::new(HEVY_API_BASE.to_string())
    }
}

impl HevyClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// List workouts, newest first.
    pub async fn list_workouts(
        &self,
        api_key: &str,
        page: u32,
        page_size: u32,
    ) -> Result<WorkoutPage, AppError> {
        let url = format!("{}/workouts", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("api-key", api_key)
            .query(&[
                ("page", page.max(1).to_string()),
                ("pageSize", page_size.clamp(1, MAX_PAGE_SIZE).to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::HevyApi(format!("Request failed: {}", e)))?;

        check_response_json(response).await
    }
}

async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Hevy rate limit hit (429)");
            return Err(AppError::HevyApi(AppError::RATE_LIMITED.to_string()));
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::HevyApi("Hevy API key rejected".to_string()));
        }

        return Err(AppError::HevyApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::HevyApi(format!("JSON parse error: {}", e)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPage {
    pub page: u32,
    pub page_count: u32,
    #[serde(default)]
    pub workouts: Vec<HevyWorkout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyWorkout {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub exercises: Vec<HevyExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyExercise {
    pub exercise_template_id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<HevySet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevySet {
    /// normal, warmup, dropset or failure
    #[serde(rename = "type")]
    pub set_type: String,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub rpe: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_sets: u32,
    /// Sum of weight x reps over working sets, kg
    pub total_volume: u32,
    pub exercise_count: u32,
    pub duration_minutes: i64,
}

impl HevyWorkout {
    /// Working-set totals. Warm-up sets are excluded.
    pub fn stats(&self) -> WorkoutStats {
        let working = self
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.set_type != "warmup");

        let mut total_sets = 0;
        let mut volume = 0.0;
        for set in working {
            total_sets += 1;
            if let (Some(w), Some(r)) = (set.weight_kg, set.reps) {
                volume += w * f64::from(r);
            }
        }

        let duration_minutes = match (
            DateTime::parse_from_rfc3339(&self.start_time),
            DateTime::parse_from_rfc3339(&self.end_time),
        ) {
            (Ok(start), Ok(end)) => ((end - start).num_seconds() as f64 / 60.0).round() as i64,
            _ => 0,
        };

        WorkoutStats {
            total_sets,
            total_volume: volume.round() as u32,
            exercise_count: self.exercises.len() as u32,
            duration_minutes,
        }
    }
}
