// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity analysis over already-fetched Strava data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CachedActivity;
use crate::services::zones::HeartRateZones;

/// Sport types counted as runs.
const RUN_TYPES: [&str; 3] = ["Run", "TrailRun", "VirtualRun"];

/// Assumed effort when an activity has no heart-rate data.
const DEFAULT_HR_FRACTION: f64 = 0.65;

pub fn is_run(activity: &CachedActivity) -> bool {
    RUN_TYPES.contains(&activity.sport_type.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Easy,
    Moderate,
    Hard,
    Race,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityAnalysis {
    pub pace_sec_per_km: f64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub elevation_gain: f64,
    pub heart_rate_avg: Option<f64>,
    pub intensity: Intensity,
}

pub fn analyze_activity(activity: &CachedActivity) -> ActivityAnalysis {
    let distance_km = activity.distance_meters / 1000.0;
    let moving = f64::from(activity.moving_time_secs);
    let pace_sec_per_km = if distance_km > 0.0 {
        moving / distance_km
    } else {
        0.0
    };

    let intensity = match activity.suffer_score {
        Some(s) if s > 150.0 => Intensity::Race,
        Some(s) if s > 100.0 => Intensity::Hard,
        Some(s) if s > 50.0 => Intensity::Moderate,
        _ => Intensity::Easy,
    };

    ActivityAnalysis {
        pace_sec_per_km,
        distance_km,
        duration_minutes: moving / 60.0,
        elevation_gain: activity.total_elevation_gain,
        heart_rate_avg: activity.average_heartrate,
        intensity,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekSummary {
    /// Start of the earliest run in the set
    pub week_start: Option<String>,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub runs: u32,
    pub avg_pace_sec_per_km: f64,
    pub avg_heart_rate: Option<u32>,
    pub longest_run_km: f64,
}

pub fn week_summary(activities: &[CachedActivity]) -> WeekSummary {
    let runs: Vec<&CachedActivity> = activities.iter().filter(|a| is_run(a)).collect();
    if runs.is_empty() {
        return WeekSummary::default();
    }

    let total_meters: f64 = runs.iter().map(|a| a.distance_meters).sum();
    let total_secs: f64 = runs.iter().map(|a| f64::from(a.moving_time_secs)).sum();
    let longest = runs
        .iter()
        .map(|a| a.distance_meters)
        .fold(0.0_f64, f64::max);

    let hrs: Vec<f64> = runs.iter().filter_map(|a| a.average_heartrate).collect();
    let avg_heart_rate = if hrs.is_empty() {
        None
    } else {
        Some((hrs.iter().sum::<f64>() / hrs.len() as f64).round() as u32)
    };

    let total_km = total_meters / 1000.0;
    WeekSummary {
        week_start: runs.iter().map(|a| a.start_date.clone()).min(),
        total_distance_km: total_km,
        total_time_minutes: total_secs / 60.0,
        runs: runs.len() as u32,
        avg_pace_sec_per_km: if total_km > 0.0 { total_secs / total_km } else { 0.0 },
        avg_heart_rate,
        longest_run_km: longest / 1000.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Optimal,
    High,
    Overreaching,
    Detraining,
}

/// Acute:chronic workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingLoad {
    /// TRIMP over the last 7 days
    pub acute: f64,
    /// Weekly average TRIMP over the last 28 days
    pub chronic: f64,
    pub ratio: f64,
    pub status: LoadStatus,
}

/// Banister-style TRIMP for one activity.
pub fn trimp(activity: &CachedActivity, max_hr: f64) -> f64 {
    let hr = activity
        .average_heartrate
        .unwrap_or(max_hr * DEFAULT_HR_FRACTION);
    let ratio = hr / max_hr;
    let minutes = f64::from(activity.moving_time_secs) / 60.0;
    minutes * ratio * (0.64 * (1.92 * ratio).exp())
}

pub fn training_load(
    activities: &[CachedActivity],
    max_hr: u32,
    now: DateTime<Utc>,
) -> TrainingLoad {
    let max_hr = f64::from(max_hr.max(1));
    let acute_start = now - Duration::days(7);
    let chronic_start = now - Duration::days(28);

    let mut acute = 0.0;
    let mut chronic_sum = 0.0;
    for activity in activities.iter().filter(|a| is_run(a)) {
        let Ok(start) = DateTime::parse_from_rfc3339(&activity.start_date) else {
            tracing::debug!(
                activity_id = activity.activity_id,
                "Skipping activity with unparseable start date"
            );
            continue;
        };
        let start = start.with_timezone(&Utc);
        let score = trimp(activity, max_hr);
        if start >= acute_start {
            acute += score;
        }
        if start >= chronic_start {
            chronic_sum += score;
        }
    }

    let chronic = chronic_sum / 4.0;
    let ratio = if chronic > 0.0 { acute / chronic } else { 0.0 };
    let status = if (0.8..=1.3).contains(&ratio) {
        LoadStatus::Optimal
    } else if ratio > 1.3 && ratio <= 1.5 {
        LoadStatus::High
    } else if ratio > 1.5 {
        LoadStatus::Overreaching
    } else {
        LoadStatus::Detraining
    };

    TrainingLoad {
        acute,
        chronic,
        ratio,
        status,
    }
}

/// A lap as reported by Strava.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Lap {
    pub average_heartrate: Option<f64>,
    pub elapsed_time: u32,
}

/// Seconds spent in each zone (z1..z5). Laps without heart rate are skipped.
pub fn heart_rate_zone_time(laps: &[Lap], zones: &HeartRateZones) -> [u32; 5] {
    let mut time = [0u32; 5];
    let bounds = zones.as_array();

    for lap in laps {
        let Some(hr) = lap.average_heartrate else {
            continue;
        };
        let zone = bounds[..4]
            .iter()
            .position(|z| hr <= f64::from(z.max))
            .unwrap_or(4);
        time[zone] += lap.elapsed_time;
    }
    time
}

/// Next-workout hint from recent volume and load.
pub fn suggest_workout(summary: &WeekSummary, load: &TrainingLoad) -> &'static str {
    match load.status {
        LoadStatus::Overreaching => "Rest day or a very easy run (active recovery)",
        LoadStatus::Detraining => "Base run: build volume gradually",
        _ if summary.runs < 3 => "Easy run to keep consistency",
        _ if summary.longest_run_km < summary.total_distance_km * 0.3 => {
            "Long run: extend your long run gradually"
        }
        _ => "Quality session (intervals, tempo or fartlek)",
    }
}
