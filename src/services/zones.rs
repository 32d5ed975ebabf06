// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heart-rate zones, pace zones and race-time prediction.

use serde::Serialize;

use crate::error::ValidationError;
use crate::models::goal::MARATHON_KM;
use crate::time_utils::format_pace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartRateRange {
    pub min: u32,
    pub max: u32,
}

/// Five zones as fractions of max heart rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartRateZones {
    /// Recovery
    pub z1: HeartRateRange,
    /// Aerobic
    pub z2: HeartRateRange,
    /// Tempo
    pub z3: HeartRateRange,
    /// Threshold
    pub z4: HeartRateRange,
    /// VO2max
    pub z5: HeartRateRange,
}

impl HeartRateZones {
    pub fn as_array(&self) -> [HeartRateRange; 5] {
        [self.z1, self.z2, self.z3, self.z4, self.z5]
    }
}

pub fn heart_rate_zones(max_hr: u32) -> HeartRateZones {
    let at = |fraction: f64| (f64::from(max_hr) * fraction).round() as u32;
    let range = |lo: f64, hi: f64| HeartRateRange {
        min: at(lo),
        max: at(hi),
    };

    HeartRateZones {
        z1: range(0.5, 0.6),
        z2: range(0.6, 0.7),
        z3: range(0.7, 0.8),
        z4: range(0.8, 0.9),
        z5: HeartRateRange {
            min: at(0.9),
            max: max_hr,
        },
    }
}

/// A pace band in seconds per km. `min` is the faster bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceZone {
    pub name: &'static str,
    pub min_sec_per_km: f64,
    pub max_sec_per_km: f64,
    /// "m:ss-m:ss/km"
    pub display: String,
}

/// Multipliers over target pace, slowest zone first.
const PACE_ZONES: [(&str, f64, f64); 6] = [
    ("recovery", 1.25, 1.40),
    ("easy", 1.12, 1.25),
    ("steady", 1.04, 1.12),
    ("race", 0.97, 1.04),
    ("threshold", 0.90, 0.97),
    ("interval", 0.82, 0.90),
];

pub fn pace_zones(target_pace_sec_per_km: f64) -> Result<Vec<PaceZone>, ValidationError> {
    if !(target_pace_sec_per_km.is_finite() && target_pace_sec_per_km > 0.0) {
        return Err(ValidationError::NonPositive {
            field: "target_pace",
            value: target_pace_sec_per_km,
        });
    }

    Ok(PACE_ZONES
        .iter()
        .map(|&(name, fast, slow)| {
            let min = target_pace_sec_per_km * fast;
            let max = target_pace_sec_per_km * slow;
            let slow_label = format_pace(max);
            PaceZone {
                name,
                min_sec_per_km: min,
                max_sec_per_km: max,
                display: format!(
                    "{}-{}",
                    format_pace(min).trim_end_matches("/km"),
                    slow_label
                ),
            }
        })
        .collect())
}

/// Riegel exponent for the target distance.
pub fn riegel_exponent(target_km: f64) -> f64 {
    if target_km <= 10.0 {
        1.04
    } else if target_km > MARATHON_KM {
        1.08
    } else {
        1.06
    }
}

/// Predict a finish time (seconds) at `target_km` from a known performance.
pub fn predict_race_time(
    known_km: f64,
    known_seconds: f64,
    target_km: f64,
) -> Result<f64, ValidationError> {
    for (field, value) in [
        ("known_km", known_km),
        ("known_seconds", known_seconds),
        ("target_km", target_km),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::NonPositive { field, value });
        }
    }

    Ok(known_seconds * (target_km / known_km).powf(riegel_exponent(target_km)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_zones_190() {
        let zones = heart_rate_zones(190);
        let bounds: Vec<(u32, u32)> = zones.as_array().iter().map(|r| (r.min, r.max)).collect();
        assert_eq!(
            bounds,
            vec![(95, 114), (114, 133), (133, 152), (152, 171), (171, 190)]
        );
    }

    #[test]
    fn test_z5_max_is_max_hr() {
        assert_eq!(heart_rate_zones(187).z5.max, 187);
    }

    #[test]
    fn test_pace_zones() {
        let zones = pace_zones(300.0).unwrap();
        assert_eq!(zones.len(), 6);
        assert_eq!(zones[0].name, "recovery");
        assert!((zones[0].min_sec_per_km - 375.0).abs() < 1e-9);
        assert!((zones[0].max_sec_per_km - 420.0).abs() < 1e-9);
        assert_eq!(zones[0].display, "6:15-7:00/km");
        assert_eq!(zones[5].name, "interval");
        assert!(zones.iter().all(|z| z.min_sec_per_km < z.max_sec_per_km));

        assert!(pace_zones(0.0).is_err());
    }

    #[test]
    fn test_riegel_exponent_bands() {
        assert_eq!(riegel_exponent(5.0), 1.04);
        assert_eq!(riegel_exponent(10.0), 1.04);
        assert_eq!(riegel_exponent(21.0975), 1.06);
        assert_eq!(riegel_exponent(42.195), 1.06);
        assert_eq!(riegel_exponent(50.0), 1.08);
    }

    #[test]
    fn test_predict_race_time() {
        // 10K in 50:00 -> half marathon
        let t = predict_race_time(10.0, 3000.0, 21.0975).unwrap();
        let expected = 3000.0 * 2.109_75_f64.powf(1.06);
        assert!((t - expected).abs() < 1e-6);
        assert!(t > 6300.0 && t < 6700.0);

        assert!(predict_race_time(0.0, 3000.0, 21.0975).is_err());
    }
}
