// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body composition history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One body-composition measurement. Append-only.
///
/// Stored at: `body_composition/{user_id}_{millis}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCompositionEntry {
    pub user_id: String,
    pub weight_kg: f64,
    pub body_fat_percentage: f64,
    pub lean_mass_kg: f64,
    pub fat_mass_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

impl BodyCompositionEntry {
    /// Derive lean and fat mass from weight and body-fat percentage.
    pub fn calculate(
        user_id: impl Into<String>,
        weight_kg: f64,
        body_fat_percentage: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(ValidationError::NonPositive {
                field: "weight_kg",
                value: weight_kg,
            });
        }
        if !(body_fat_percentage.is_finite() && body_fat_percentage >= 0.0) {
            return Err(ValidationError::Negative {
                field: "body_fat_percentage",
                value: body_fat_percentage,
            });
        }

        let fat_mass_kg = weight_kg * (body_fat_percentage / 100.0);
        Ok(Self {
            user_id: user_id.into(),
            weight_kg,
            body_fat_percentage,
            lean_mass_kg: weight_kg - fat_mass_kg,
            fat_mass_kg,
            recorded_at,
        })
    }

    /// Firestore document ID for this entry.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.user_id, self.recorded_at.timestamp_millis())
    }
}
