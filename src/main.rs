// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach API Server
//!
//! Computes macro targets, training plans and strength programs for
//! athletes, with Strava and Hevy integrations.

use coach::{
    config::Config,
    db::FirestoreDb,
    services::{HevyClient, StravaService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Coach API");

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Shared across all requests within this instance
    let token_cache = Arc::new(dashmap::DashMap::new());
    let refresh_locks = Arc::new(dashmap::DashMap::new());

    let strava_service = StravaService::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        db.clone(),
        token_cache,
        refresh_locks,
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        strava_service,
        hevy_client: HevyClient::default(),
    });

    let app = coach::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let crate_level: Directive = "coach=debug".parse()?;
    let default_level: Directive = "info".parse()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(crate_level)
                .add_directive(default_level),
        )
        .with(format)
        .init();

    Ok(())
}
