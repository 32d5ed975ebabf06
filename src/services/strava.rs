// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities.
//!
//! Handles:
//! - Recent activity listing
//! - Token refresh when expired
//! - Rate limit and credential error classification

use crate::error::AppError;
use crate::services::training_load::Lap;
use serde::Deserialize;

const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Largest page Strava returns.
pub const MAX_PER_PAGE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: STRAVA_API_BASE.to_string(),
            client_id,
            client_secret,
        }
    }

    /// List the athlete's most recent activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", per_page.clamp(1, MAX_PER_PAGE).to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Request failed: {}", e)))?;

        check_response_json(response).await
    }

    /// Laps of one activity.
    pub async fn list_laps(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Vec<Lap>, AppError> {
        let url = format!("{}/activities/{}/laps", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Request failed: {}", e)))?;

        check_response_json(response).await
    }

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<StravaAthlete, AppError> {
        let url = format!("{}/athlete", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Request failed: {}", e)))?;

        check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(STRAVA_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Request failed: token refresh: {}", e)))?;

        check_response_json(response).await
    }

    /// Exchange an authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<StravaTokenExchangeResponse, AppError> {
        let response = self
            .http
            .post(STRAVA_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Request failed: token exchange: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::StravaApi(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse token response: {}", e)))
    }
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::StravaApi(AppError::RATE_LIMITED.to_string()));
        }

        // Unauthorized - token may be expired or revoked
        if status.as_u16() == 401 {
            return Err(AppError::StravaApi(
                AppError::STRAVA_TOKEN_ERROR.to_string(),
            ));
        }

        return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Summary activity for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub name: String,
    pub sport_type: String,
    pub start_date: String,
    pub distance: f64,
    pub moving_time: u32,
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub suffer_score: Option<f64>,
}

impl StravaActivitySummary {
    pub fn into_cached(self, user_id: &str, now: &str) -> CachedActivity {
        CachedActivity {
            activity_id: self.id,
            user_id: user_id.to_string(),
            name: self.name,
            sport_type: self.sport_type,
            start_date: self.start_date,
            distance_meters: self.distance,
            moving_time_secs: self.moving_time,
            total_elevation_gain: self.total_elevation_gain,
            average_heartrate: self.average_heartrate,
            suffer_score: self.suffer_score,
            cached_at: now.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

use crate::db::FirestoreDb;
use crate::models::{CachedActivity, StravaTokens};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Cached access token with expiry information.
#[derive(Clone)]
pub struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Shared token cache type for use in AppState.
pub type TokenCache = Arc<DashMap<String, CachedToken>>;

/// Shared refresh locks type for use in AppState.
pub type RefreshLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// High-level Strava service that manages token lifecycle and API calls.
///
/// - Token retrieval from Firestore
/// - Automatic refresh 5 minutes before expiry
/// - In-memory token caching
/// - Per-user locking so concurrent requests refresh once
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: FirestoreDb,
    token_cache: TokenCache,
    refresh_locks: RefreshLocks,
}

impl StravaService {
    pub fn new(
        client_id: String,
        client_secret: String,
        db: FirestoreDb,
        token_cache: TokenCache,
        refresh_locks: RefreshLocks,
    ) -> Self {
        Self {
            client: StravaClient::new(client_id, client_secret),
            db,
            token_cache,
            refresh_locks,
        }
    }

    fn cached_if_fresh(&self, user_id: &str, now: DateTime<Utc>) -> Option<String> {
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
        self.token_cache
            .get(user_id)
            .filter(|cached| now + margin < cached.expires_at)
            .map(|cached| cached.access_token.clone())
    }

    fn cache_token(&self, user_id: &str, access_token: &str, expires_at: DateTime<Utc>) {
        self.token_cache.insert(
            user_id.to_string(),
            CachedToken {
                access_token: access_token.to_string(),
                expires_at,
            },
        );
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a valid (non-expired) access token for the given user.
    ///
    /// 1. Check in-memory cache
    /// 2. Acquire per-user lock, then re-check the cache
    /// 3. Load tokens from Firestore; use them if still valid
    /// 4. Otherwise refresh with Strava and store the new pair
    /// 5. On `invalid_grant`, another instance already refreshed: reload
    pub async fn get_valid_access_token(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        if let Some(token) = self.cached_if_fresh(user_id, now) {
            return Ok(token);
        }

        let lock = self
            .refresh_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another task may have refreshed while we were waiting
        if let Some(token) = self.cached_if_fresh(user_id, now) {
            return Ok(token);
        }

        let tokens = self.load_tokens(user_id).await?;
        let expires_at = parse_expiry(&tokens.expires_at)?;

        if now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < expires_at {
            self.cache_token(user_id, &tokens.access_token, expires_at);
            return Ok(tokens.access_token);
        }

        tracing::info!(user_id, "Access token expired, refreshing");

        let refreshed = match self.client.refresh_token(&tokens.refresh_token).await {
            Ok(t) => t,
            Err(AppError::StravaApi(ref msg)) if msg.contains("invalid_grant") => {
                tracing::info!(
                    user_id,
                    "Refresh token race detected - another instance won, fetching their tokens"
                );
                return self.fetch_and_cache_from_db(user_id).await;
            }
            Err(e) => return Err(e),
        };

        let new_expires_at = DateTime::from_timestamp(refreshed.expires_at, 0).unwrap_or(now);
        let updated = StravaTokens {
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token,
            expires_at: format_utc_rfc3339(new_expires_at),
            scopes: tokens.scopes,
        };
        self.db.set_strava_tokens(user_id, &updated).await?;
        self.cache_token(user_id, &refreshed.access_token, new_expires_at);

        tracing::info!(user_id, "Token refreshed and cached");
        Ok(refreshed.access_token)
    }

    async fn load_tokens(&self, user_id: &str) -> Result<StravaTokens, AppError> {
        self.db
            .get_strava_tokens(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Strava tokens for user {}", user_id)))
    }

    /// Reload tokens written by the instance that won a refresh race.
    async fn fetch_and_cache_from_db(&self, user_id: &str) -> Result<String, AppError> {
        let tokens = self.load_tokens(user_id).await?;
        let expires_at = parse_expiry(&tokens.expires_at)?;
        self.cache_token(user_id, &tokens.access_token, expires_at);
        Ok(tokens.access_token)
    }

    /// Drop a user's cached token and stored credentials.
    pub async fn disconnect(&self, user_id: &str) -> Result<(), AppError> {
        self.token_cache.remove(user_id);
        self.db.delete_strava_tokens(user_id).await
    }

    // ─── OAuth Callback Handling ─────────────────────────────────────────────

    /// Exchange the code for tokens and store them.
    ///
    /// The user ID is the Strava athlete ID.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<OAuthResult, AppError> {
        let response = self.client.exchange_code(code).await?;
        let user_id = response.athlete.id.to_string();

        let expires_at = DateTime::from_timestamp(response.expires_at, 0).unwrap_or_else(Utc::now);
        let tokens = StravaTokens {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token,
            expires_at: format_utc_rfc3339(expires_at),
            scopes: vec!["activity:read_all".to_string()],
        };

        self.db.set_strava_tokens(&user_id, &tokens).await?;
        self.cache_token(&user_id, &response.access_token, expires_at);

        tracing::info!(
            user_id = %user_id,
            firstname = %response.athlete.firstname,
            "OAuth callback handled, tokens stored"
        );

        Ok(OAuthResult {
            user_id,
            firstname: response.athlete.firstname,
            lastname: response.athlete.lastname,
        })
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch recent activities and cache them in Firestore.
    ///
    /// A failed cache write is logged; the fetched activities are still returned.
    pub async fn list_activities(
        &self,
        user_id: &str,
        per_page: u32,
    ) -> Result<Vec<CachedActivity>, AppError> {
        let access_token = self.get_valid_access_token(user_id).await?;
        let summaries = self.client.list_activities(&access_token, per_page).await?;

        let now = format_utc_rfc3339(Utc::now());
        let activities: Vec<CachedActivity> = summaries
            .into_iter()
            .map(|s| s.into_cached(user_id, &now))
            .collect();

        if let Err(e) = self.db.cache_strava_activities(&activities).await {
            tracing::warn!(error = %e, user_id, "Failed to cache Strava activities");
        }

        Ok(activities)
    }

    pub async fn get_athlete(&self, user_id: &str) -> Result<StravaAthlete, AppError> {
        let access_token = self.get_valid_access_token(user_id).await?;
        self.client.get_athlete(&access_token).await
    }

    pub async fn list_laps(&self, user_id: &str, activity_id: u64) -> Result<Vec<Lap>, AppError> {
        let access_token = self.get_valid_access_token(user_id).await?;
        self.client.list_laps(&access_token, activity_id).await
    }
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to parse expiry: {}", e)))
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
struct StravaTokenExchangeResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
    athlete: StravaAthlete,
}

/// Athlete info from Strava.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaAthlete {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Result of handling OAuth callback.
#[derive(Debug, Clone)]
pub struct OAuthResult {
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_into_cached() {
        let summary: StravaActivitySummary = serde_json::from_value(serde_json::json!({
            "id": 12345,
            "name": "Morning Run",
            "sport_type": "Run",
            "start_date": "2026-03-01T07:00:00Z",
            "distance": 10000.0,
            "moving_time": 3000,
            "average_heartrate": 148.2
        }))
        .unwrap();

        let cached = summary.into_cached("42", "2026-03-01T08:00:00Z");
        assert_eq!(cached.activity_id, 12345);
        assert_eq!(cached.user_id, "42");
        assert_eq!(cached.moving_time_secs, 3000);
        assert_eq!(cached.total_elevation_gain, 0.0);
        assert_eq!(cached.suffer_score, None);
    }

    #[test]
    fn test_parse_expiry() {
        assert!(parse_expiry("2026-03-01T07:00:00Z").is_ok());
        assert!(parse_expiry("tomorrow").is_err());
    }

    #[tokio::test]
    async fn test_cached_token_served_without_db() {
        let service = StravaService::new(
            "id".to_string(),
            "secret".to_string(),
            FirestoreDb::new_mock(),
            Arc::new(DashMap::new()),
            Arc::new(DashMap::new()),
        );
        service.cache_token("7", "cached", Utc::now() + Duration::hours(1));

        // Mock database errors on every call, so this only passes via the cache
        let token = service.get_valid_access_token("7").await.unwrap();
        assert_eq!(token, "cached");

        // Expiring inside the refresh margin falls through to storage
        service.cache_token("8", "stale", Utc::now() + Duration::minutes(2));
        assert!(service.get_valid_access_token("8").await.is_err());
    }
}
