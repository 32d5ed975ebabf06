// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach: plan and targets calculator for endurance athletes
//!
//! This crate provides the backend API that turns an athlete's profile and
//! goals into daily macro targets, a periodized training plan and a strength
//! program, backed by Firestore with optional Strava and Hevy data.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{HevyClient, StravaService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub strava_service: StravaService,
    pub hevy_client: HevyClient,
}
