// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public calculator endpoint tests.
//!
//! The calculators never touch the database, so these run against the
//! offline app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn call(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (app, _) = common::create_test_app();

    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn profile() -> Value {
    json!({
        "weight_kg": 70.0,
        "height_cm": 175.0,
        "age": 30,
        "sex": "male",
        "activity_level": "high"
    })
}

fn with(mut base: Value, key: &str, value: Value) -> Value {
    base[key] = value;
    base
}

// ─── Macros ──────────────────────────────────────────────────

#[tokio::test]
async fn test_macros_for_easy_day() {
    let (status, body) = call(
        "POST",
        "/calc/macros",
        Some(with(profile(), "day_type", json!("easy"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmr"], 1648.75);
    assert_eq!(body["tdee"], 2844);
    assert_eq!(body["day_type"], "easy");
    assert_eq!(
        body["targets"],
        json!({ "calories": 2844, "protein": 126, "carbs": 280, "fat": 136, "fiber": 30 })
    );
}

#[tokio::test]
async fn test_macros_for_endurance_goal() {
    let goal = json!({ "type": "endurance", "sport": "running", "distance": "21K" });
    let (status, body) = call("POST", "/calc/macros", Some(with(profile(), "goal", goal))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal_type"], "endurance");
    assert_eq!(body["targets"]["protein"], 112);
    assert_eq!(body["targets"]["carbs"], 350);
    assert_eq!(body["targets"]["fat"], 111);
    assert!(body["summary"].is_string());
}

#[tokio::test]
async fn test_macros_unknown_day_type_uses_easy() {
    let (status, body) = call(
        "POST",
        "/calc/macros",
        Some(with(profile(), "day_type", json!("hill_sprints"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day_type"], "easy");
}

#[tokio::test]
async fn test_macros_requires_day_type_or_goal() {
    let (status, body) = call("POST", "/calc/macros", Some(profile())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_macros_rejects_non_positive_weight() {
    let request = with(with(profile(), "weight_kg", json!(0.0)), "day_type", json!("rest"));
    let (status, body) = call("POST", "/calc/macros", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_macros_rejects_implausible_height() {
    let request = with(with(profile(), "height_cm", json!(900.0)), "day_type", json!("rest"));
    let (status, _) = call("POST", "/calc/macros", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Plan ────────────────────────────────────────────────────

#[tokio::test]
async fn test_half_marathon_plan() {
    let request = json!({
        "goal": { "sport": "running", "distance": "21K", "fitness_level": "intermediate" },
        "current_weekly_km": 30.0,
        "weeks_to_race": 13
    });
    let (status, body) = call("POST", "/calc/plan", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["total_weeks"], 13);
    assert_eq!(body["plan"]["weeks"].as_array().unwrap().len(), 13);
    assert_eq!(body["plan"]["phases"].as_array().unwrap().len(), 4);
    assert_eq!(body["current_week"]["week_number"], 1);
    assert_eq!(body["current_week"]["planned_distance_km"], 25.3);
}

#[tokio::test]
async fn test_plan_without_race_date_has_no_current_week() {
    let request = json!({ "goal": { "sport": "running", "distance": "10K" } });
    let (status, body) = call("POST", "/calc/plan", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["baseline_weekly_km"], 15.0);
    assert!(body["current_week"].is_null());
}

#[tokio::test]
async fn test_plan_rejects_negative_volume() {
    let request = json!({
        "goal": { "sport": "running", "distance": "5K" },
        "current_weekly_km": -1.0
    });
    let (status, _) = call("POST", "/calc/plan", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Zones & Race Time ───────────────────────────────────────

#[tokio::test]
async fn test_pace_zones_from_clock_string() {
    let (status, body) = call("GET", "/calc/pace-zones?target_pace=5:00", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_pace"], "5:00/km");

    let zones = body["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 6);
    assert_eq!(zones[0]["name"], "recovery");
    assert_eq!(zones[5]["name"], "interval");
}

#[tokio::test]
async fn test_pace_zones_rejects_bad_input() {
    let (status, _) = call("GET", "/calc/pace-zones?target_pace=quick", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call("GET", "/calc/pace-zones?target_pace=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Clock values too large for seconds are malformed, not wrapped
    let (status, _) = call("GET", "/calc/pace-zones?target_pace=99999999:00", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_race_time_prediction() {
    let request = json!({
        "known_distance_km": 10.0,
        "known_time": "50:00",
        "target_distance_km": 21.0975
    });
    let (status, body) = call("POST", "/calc/race-time", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exponent"], 1.06);

    let predicted = body["predicted_seconds"].as_f64().unwrap();
    let expected = (3000.0 * 2.10975_f64.powf(1.06)).round();
    assert_eq!(predicted, expected);
    assert!(body["predicted_time"].as_str().unwrap().starts_with("1:"));
}

#[tokio::test]
async fn test_race_time_rejects_unparseable_time() {
    let request = json!({
        "known_distance_km": 10.0,
        "known_time": "50 min",
        "target_distance_km": 5.0
    });
    let (status, _) = call("POST", "/calc/race-time", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_heart_rate_zones() {
    let (status, body) = call("GET", "/calc/heart-rate-zones?max_hr=190", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zones"]["z1"], json!({ "min": 95, "max": 114 }));
    assert_eq!(body["zones"]["z5"], json!({ "min": 171, "max": 190 }));

    // Estimated from age when no max is given
    let (_, by_age) = call("GET", "/calc/heart-rate-zones?age=30", None).await;
    assert_eq!(by_age["max_hr"], 190);

    let (status, _) = call("GET", "/calc/heart-rate-zones", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call("GET", "/calc/heart-rate-zones?max_hr=300", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Strength & Guidance ─────────────────────────────────────

#[tokio::test]
async fn test_strength_by_phase_and_focus() {
    let (status, base) = call("GET", "/strength/phase/base", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(base.as_array().unwrap().len(), 2);

    let (_, hypertrophy) = call("GET", "/strength/focus/hypertrophy", None).await;
    assert_eq!(hypertrophy.as_array().unwrap().len(), 3);
    assert!(hypertrophy[0]["exercises"].as_array().unwrap().len() > 0);
}

#[tokio::test]
async fn test_strength_routines_as_text() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/strength/phase/base?format=text")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Base: heavy lower body ("));
    assert!(text.contains("1. Back squat: 4 x 5-6 (rest 150s)"));
    assert!(text.contains("Base: stability and core ("));
}

#[tokio::test]
async fn test_unknown_strength_keys_return_empty_list() {
    let (status, body) = call("GET", "/strength/phase/offseason", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = call("GET", "/strength/focus/calisthenics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_nutrition_guidelines() {
    let (status, body) = call("GET", "/nutrition/guidelines/long_run", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day_type"], "long_run");
    assert!(body["pre_workout"].as_str().unwrap().contains("carb"));

    let (_, fallback) = call("GET", "/nutrition/guidelines/yoga", None).await;
    assert_eq!(fallback["day_type"], "easy");
}

#[tokio::test]
async fn test_protein_target_by_intensity() {
    let (status, body) = call("GET", "/nutrition/protein?weight_kg=70&intensity=high", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intensity"], "high");
    assert_eq!(body["protein_g"], 154);

    let (_, moderate) = call("GET", "/nutrition/protein?weight_kg=70", None).await;
    assert_eq!(moderate["intensity"], "moderate");
    assert_eq!(moderate["protein_g"], 126);

    let (status, _) = call("GET", "/nutrition/protein?weight_kg=5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_meal_templates() {
    let (status, body) = call("GET", "/nutrition/meal-templates", None).await;
    assert_eq!(status, StatusCode::OK);

    let meals = body.as_array().unwrap();
    assert_eq!(meals.len(), 6);
    assert_eq!(meals[0]["key"], "breakfast_pre_long");
    assert_eq!(meals[0]["calories"], 450);
}
