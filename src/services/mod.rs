// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.
//!
//! The calculators (`macros`, `training_plan`, `zones`, `strength`,
//! `training_load`) are pure; `strava` and `hevy` talk to third parties.

pub mod hevy;
pub mod macros;
pub mod strava;
pub mod strength;
pub mod training_load;
pub mod training_plan;
pub mod zones;

pub use hevy::HevyClient;
pub use strava::{OAuthResult, RefreshLocks, StravaService, TokenCache};
