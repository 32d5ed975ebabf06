//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const ATHLETES: &str = "athletes";
    /// One document per user-day, keyed `{user_id}_{date}`
    pub const FOOD_LOGS: &str = "food_logs";
    /// Append-only, keyed `{user_id}_{millis}`
    pub const BODY_COMPOSITION: &str = "body_composition";
    pub const STRAVA_TOKENS: &str = "strava_tokens";
    pub const HEVY_CREDENTIALS: &str = "hevy_credentials";
    /// Fetched Strava activities (keyed by activity_id)
    pub const STRAVA_ACTIVITIES: &str = "strava_activities";
}

/// Document ID for a user's food log on a given day.
pub fn food_log_id(user_id: &str, date: &str) -> String {
    format!("{}_{}", user_id, date)
}
