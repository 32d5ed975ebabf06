// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Athletes (profile and goals)
//! - Food logs (one document per user-day)
//! - Body composition history
//! - Strava tokens, Hevy credentials and cached Strava activities

use crate::db::{collections, food_log_id};
use crate::error::AppError;
use crate::models::{
    Athlete, BodyCompositionEntry, CachedActivity, FoodEntry, HevyCredentials, NutritionDay,
    StravaTokens,
};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Athlete Operations ──────────────────────────────────────

    pub async fn get_athlete(&self, user_id: &str) -> Result<Option<Athlete>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ATHLETES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace an athlete profile.
    pub async fn upsert_athlete(&self, athlete: &Athlete) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ATHLETES)
            .document_id(&athlete.user_id)
            .object(athlete)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Food Log Operations ─────────────────────────────────────

    /// Get a user's log for one day, empty if nothing was logged.
    pub async fn get_nutrition_day(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<NutritionDay, AppError> {
        let day: Option<NutritionDay> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_LOGS)
            .obj()
            .one(&food_log_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(day.unwrap_or_else(|| NutritionDay {
            user_id: user_id.to_string(),
            date: date.to_string(),
            entries: Vec::new(),
        }))
    }

    /// Append an entry to a day's log.
    ///
    /// Read-modify-write inside a transaction so concurrent appends are not lost.
    pub async fn append_food_entry(
        &self,
        user_id: &str,
        date: &str,
        entry: &FoodEntry,
    ) -> Result<NutritionDay, AppError> {
        let client = self.get_client()?;
        let doc_id = food_log_id(user_id, date);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut day = self.get_nutrition_day(user_id, date).await?;
        day.entries.push(entry.clone());

        client
            .fluent()
            .update()
            .in_col(collections::FOOD_LOGS)
            .document_id(&doc_id)
            .object(&day)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add food log to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(
            user_id,
            date,
            entries = day.entries.len(),
            "Food entry appended"
        );

        Ok(day)
    }

    /// Remove an entry by ID. Returns `None` when the entry does not exist.
    pub async fn remove_food_entry(
        &self,
        user_id: &str,
        date: &str,
        entry_id: &str,
    ) -> Result<Option<NutritionDay>, AppError> {
        let client = self.get_client()?;
        let doc_id = food_log_id(user_id, date);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut day = self.get_nutrition_day(user_id, date).await?;
        let before = day.entries.len();
        day.entries.retain(|e| e.id != entry_id);

        if day.entries.len() == before {
            let _ = transaction.rollback().await;
            return Ok(None);
        }

        client
            .fluent()
            .update()
            .in_col(collections::FOOD_LOGS)
            .document_id(&doc_id)
            .object(&day)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add food log to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(Some(day))
    }

    /// Logged days on or after `since` ("YYYY-MM-DD"), newest first.
    pub async fn nutrition_history(
        &self,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<NutritionDay>, AppError> {
        let user_id = user_id.to_string();
        let since = since.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(since.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Body Composition Operations ─────────────────────────────

    /// Append a measurement and store the athlete it was applied to.
    ///
    /// Both writes commit in one transaction so the history and the
    /// profile weight never disagree.
    pub async fn record_body_composition(
        &self,
        entry: &BodyCompositionEntry,
        athlete: &Athlete,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::BODY_COMPOSITION)
            .document_id(entry.document_id())
            .object(entry)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add measurement to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::ATHLETES)
            .document_id(&athlete.user_id)
            .object(athlete)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add athlete to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(
            user_id = %athlete.user_id,
            weight_kg = entry.weight_kg,
            "Body composition recorded"
        );
        Ok(())
    }

    /// Full history, oldest first.
    pub async fn list_body_composition(
        &self,
        user_id: &str,
    ) -> Result<Vec<BodyCompositionEntry>, AppError> {
        let mut entries: Vec<BodyCompositionEntry> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::BODY_COMPOSITION)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Sorted here to avoid needing a composite index
        entries.sort_by_key(|e| e.recorded_at);
        Ok(entries)
    }

    pub async fn latest_body_composition(
        &self,
        user_id: &str,
    ) -> Result<Option<BodyCompositionEntry>, AppError> {
        Ok(self.list_body_composition(user_id).await?.pop())
    }

    // ─── Strava Token Operations ─────────────────────────────────

    pub async fn get_strava_tokens(&self, user_id: &str) -> Result<Option<StravaTokens>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::STRAVA_TOKENS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_strava_tokens(
        &self,
        user_id: &str,
        tokens: &StravaTokens,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::STRAVA_TOKENS)
            .document_id(user_id)
            .object(tokens)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_strava_tokens(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::STRAVA_TOKENS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Hevy Credential Operations ──────────────────────────────

    pub async fn get_hevy_credentials(
        &self,
        user_id: &str,
    ) -> Result<Option<HevyCredentials>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::HEVY_CREDENTIALS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_hevy_credentials(
        &self,
        user_id: &str,
        credentials: &HevyCredentials,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::HEVY_CREDENTIALS)
            .document_id(user_id)
            .object(credentials)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Strava Activity Cache ───────────────────────────────────

    /// Store fetched activities.
    ///
    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    pub async fn cache_strava_activities(
        &self,
        activities: &[CachedActivity],
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        stream::iter(activities.to_vec())
            .map(|activity| async move {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::STRAVA_ACTIVITIES)
                    .document_id(activity.activity_id.to_string())
                    .object(&activity)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        tracing::debug!(count = activities.len(), "Cached Strava activities");
        Ok(())
    }

    /// Cached activities starting on or after `since` (RFC3339), newest first.
    pub async fn cached_activities_since(
        &self,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<CachedActivity>, AppError> {
        let user_id = user_id.to_string();
        let since = since.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::STRAVA_ACTIVITIES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("start_date").greater_than_or_equal(since.clone()),
                ])
            })
            .order_by([(
                "start_date",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
