// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST). They skip otherwise.

use chrono::{Duration, TimeZone, Utc};
use coach::db::FirestoreDb;
use coach::error::AppError;
use coach::models::{
    ActivityLevel, Athlete, BodyCompositionEntry, CachedActivity, FoodEntry, Goal,
    HevyCredentials, NewAthlete, Sex, StravaTokens,
};

mod common;
use common::test_db;

/// Unique user ID for test isolation.
fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}", nanos)
}

fn test_athlete(user_id: &str) -> Athlete {
    Athlete::create(
        user_id,
        NewAthlete {
            name: "Test Athlete".to_string(),
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::High,
            resting_heart_rate: Some(50),
            max_heart_rate: None,
        },
        Utc::now(),
    )
    .unwrap()
}

fn food(id: &str, calories: f64) -> FoodEntry {
    FoodEntry {
        id: id.to_string(),
        food_id: format!("manual_{}", id),
        name: "Rice".to_string(),
        quantity: 100.0,
        unit: "g".to_string(),
        calories,
        protein: 3.0,
        carbs: 28.0,
        fat: 0.5,
        fiber: None,
        timestamp: Utc::now(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OFFLINE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_offline_db_returns_database_errors() {
    let db = FirestoreDb::new_mock();

    let err = db.get_athlete("u1").await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let err = db.get_nutrition_day("u1", "2026-03-01").await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_mock_writes_fail_from_spawned_tasks() {
    let db = FirestoreDb::new_mock();
    let athlete = test_athlete("u1");
    let entry = BodyCompositionEntry::calculate("u1", 70.0, 18.0, Utc::now()).unwrap();
    let activities = vec![CachedActivity {
        activity_id: 1,
        user_id: "u1".to_string(),
        name: "Morning Run".to_string(),
        sport_type: "Run".to_string(),
        start_date: "2026-02-01T07:00:00Z".to_string(),
        distance_meters: 8000.0,
        moving_time_secs: 2400,
        total_elevation_gain: 40.0,
        average_heartrate: None,
        suffer_score: None,
        cached_at: "2026-02-01T09:00:00Z".to_string(),
    }];

    // Handlers run these futures on the multi-threaded runtime
    let cache = tokio::spawn({
        let db = db.clone();
        async move { db.cache_strava_activities(&activities).await }
    });
    let record = tokio::spawn(async move { db.record_body_composition(&entry, &athlete).await });

    assert!(matches!(cache.await.unwrap(), Err(AppError::Database(_))));
    assert!(matches!(record.await.unwrap(), Err(AppError::Database(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// ATHLETES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_athlete_round_trip_keeps_goals() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    assert!(db.get_athlete(&user_id).await.unwrap().is_none());

    let mut athlete = test_athlete(&user_id);
    athlete.set_secondary_goal(Some(Goal::maintenance()), Utc::now());
    db.upsert_athlete(&athlete).await.unwrap();

    let fetched = db.get_athlete(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Test Athlete");
    assert_eq!(fetched.max_heart_rate, Some(190));
    assert_eq!(fetched.goals, athlete.goals);
}

// ═══════════════════════════════════════════════════════════════════════════
// FOOD LOGS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_food_log_append_and_remove() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let date = "2026-03-01";

    let empty = db.get_nutrition_day(&user_id, date).await.unwrap();
    assert!(empty.entries.is_empty());
    assert_eq!(empty.date, date);

    db.append_food_entry(&user_id, date, &food("a", 130.0))
        .await
        .unwrap();
    let day = db
        .append_food_entry(&user_id, date, &food("b", 260.0))
        .await
        .unwrap();
    assert_eq!(day.entries.len(), 2);

    let removed = db.remove_food_entry(&user_id, date, "a").await.unwrap();
    assert_eq!(removed.unwrap().entries.len(), 1);

    let missing = db.remove_food_entry(&user_id, date, "zzz").await.unwrap();
    assert!(missing.is_none());

    let stored = db.get_nutrition_day(&user_id, date).await.unwrap();
    assert_eq!(stored.entries.len(), 1);
    assert_eq!(stored.entries[0].id, "b");
}

#[tokio::test]
async fn test_nutrition_history_is_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    for date in ["2026-02-20", "2026-03-01", "2026-02-27"] {
        db.append_food_entry(&user_id, date, &food(date, 100.0))
            .await
            .unwrap();
    }

    let history = db.nutrition_history(&user_id, "2026-02-25").await.unwrap();
    let dates: Vec<&str> = history.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-03-01", "2026-02-27"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// BODY COMPOSITION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_body_composition_history_is_chronological() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let first = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    let mut athlete = test_athlete(&user_id);

    for (offset, weight) in [(2, 70.5), (0, 72.0), (1, 71.0)] {
        let at = first + Duration::days(offset);
        let entry = BodyCompositionEntry::calculate(&user_id, weight, 18.0, at).unwrap();
        athlete
            .apply_body_composition(entry.weight_kg, entry.body_fat_percentage, at)
            .unwrap();
        db.record_body_composition(&entry, &athlete).await.unwrap();
    }

    // Profile follows the last write
    let stored = db.get_athlete(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.weight_kg, 71.0);
    assert_eq!(stored.body_fat_percentage, Some(18.0));

    let history = db.list_body_composition(&user_id).await.unwrap();
    let weights: Vec<f64> = history.iter().map(|e| e.weight_kg).collect();
    assert_eq!(weights, vec![72.0, 71.0, 70.5]);

    let latest = db.latest_body_composition(&user_id).await.unwrap().unwrap();
    assert_eq!(latest.weight_kg, 70.5);
}

// ═══════════════════════════════════════════════════════════════════════════
// CREDENTIALS & ACTIVITY CACHE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_strava_tokens_and_hevy_credentials() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let tokens = StravaTokens {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: "2026-03-01T12:00:00Z".to_string(),
        scopes: vec!["activity:read_all".to_string()],
    };
    db.set_strava_tokens(&user_id, &tokens).await.unwrap();
    let fetched = db.get_strava_tokens(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.refresh_token, "refresh");

    db.delete_strava_tokens(&user_id).await.unwrap();
    assert!(db.get_strava_tokens(&user_id).await.unwrap().is_none());

    let credentials = HevyCredentials {
        api_key: "hevy-key-123".to_string(),
        updated_at: "2026-03-01T12:00:00Z".to_string(),
    };
    db.set_hevy_credentials(&user_id, &credentials)
        .await
        .unwrap();
    let fetched = db.get_hevy_credentials(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.api_key, "hevy-key-123");
}

#[tokio::test]
async fn test_cached_activities_since() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let base_id = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;

    let activities: Vec<CachedActivity> = ["2026-02-01T07:00:00Z", "2026-02-20T07:00:00Z", "2026-02-25T07:00:00Z"]
        .iter()
        .enumerate()
        .map(|(i, start)| CachedActivity {
            activity_id: base_id + i as u64,
            user_id: user_id.clone(),
            name: format!("Run {}", i),
            sport_type: "Run".to_string(),
            start_date: start.to_string(),
            distance_meters: 8000.0,
            moving_time_secs: 2400,
            total_elevation_gain: 40.0,
            average_heartrate: Some(150.0),
            suffer_score: None,
            cached_at: "2026-02-26T00:00:00Z".to_string(),
        })
        .collect();

    db.cache_strava_activities(&activities).await.unwrap();

    let recent = db
        .cached_activities_since(&user_id, "2026-02-10T00:00:00Z")
        .await
        .unwrap();
    let starts: Vec<&str> = recent.iter().map(|a| a.start_date.as_str()).collect();
    assert_eq!(starts, vec!["2026-02-25T07:00:00Z", "2026-02-20T07:00:00Z"]);
}
