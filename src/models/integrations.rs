// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Third-party credentials and cached activity data.

use serde::{Deserialize, Serialize};

/// Strava OAuth tokens, stored as issued.
///
/// Stored at: `strava_tokens/{user_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires (RFC3339)
    pub expires_at: String,
    /// Granted OAuth scopes
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Hevy API key.
///
/// Stored at: `hevy_credentials/{user_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyCredentials {
    pub api_key: String,
    pub updated_at: String,
}

/// Strava activity as cached in Firestore.
///
/// Stored at: `strava_activities/{activity_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedActivity {
    pub activity_id: u64,
    pub user_id: String,
    pub name: String,
    pub sport_type: String,
    /// Start time (RFC3339)
    pub start_date: String,
    pub distance_meters: f64,
    pub moving_time_secs: u32,
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub suffer_score: Option<f64>,
    pub cached_at: String,
}
