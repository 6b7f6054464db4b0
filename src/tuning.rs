//! Data-driven game balance
//!
//! `Tuning::default()` is the shipped balance. Play-test builds can load an
//! alternative from JSON; every loaded tuning is validated before a session
//! accepts it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when loading or validating a tuning.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("star threshold {0} must lie in (0, 1]")]
    StarThreshold(f64),
    #[error("bad item chance {max} can exceed star threshold {threshold}")]
    BadChanceAboveThreshold { max: f64, threshold: f64 },
    #[error("fruit speed tiers must have strictly increasing limits")]
    UnorderedSpeedTiers,
    #[error("super fruit weights must not all be zero")]
    ZeroSuperWeights,
    #[error("super fruit weights sum past {}", u32::MAX)]
    SuperWeightsOverflow,
}

/// Linear difficulty ramp over score progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    /// Score at which the ramp stops
    pub progress_cap: u32,
    pub spawn_interval_max_ms: u64,
    pub spawn_interval_min_ms: u64,
    /// Interval shrink per point of progress
    pub spawn_interval_per_point_ms: u64,
    pub bad_chance_min: f64,
    pub bad_chance_max: f64,
    /// Progress needed to add 1.0 to the bad item chance
    pub bad_chance_divisor: f64,
    pub lifetime_max_ms: u64,
    pub lifetime_min_ms: u64,
    pub lifetime_per_point_ms: u64,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            progress_cap: 300,
            spawn_interval_max_ms: 1200,
            spawn_interval_min_ms: 600,
            spawn_interval_per_point_ms: 2,
            bad_chance_min: 0.25,
            bad_chance_max: 0.50,
            bad_chance_divisor: 1200.0,
            lifetime_max_ms: 6000,
            lifetime_min_ms: 3000,
            lifetime_per_point_ms: 10,
        }
    }
}

/// A reaction-time tier for fruit: caught in under `under_ms` earns `points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedTier {
    pub under_ms: u64,
    pub points: i32,
}

/// Complete gameplay balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyCurve,
    /// Reaching this score wins the run
    pub win_score: u32,
    pub super_duration_ms: u64,
    pub super_spawn_interval_ms: u64,
    /// Rolls at or above this value spawn a star; below it fruit and bad
    /// items share the space
    pub star_threshold: f64,
    pub bomb_points: i32,
    pub skull_points: i32,
    /// Fastest tier first
    pub speed_tiers: [SpeedTier; 3],
    /// Points for slow fruit, and for fruit without a spawn time
    pub slow_fruit_points: i32,
    /// Super mode pool weights: apple, banana, cherry, grape
    pub super_fruit_weights: [u32; 4],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: DifficultyCurve::default(),
            win_score: 300,
            super_duration_ms: 5000,
            super_spawn_interval_ms: 400,
            star_threshold: 0.85,
            bomb_points: -20,
            skull_points: -15,
            speed_tiers: [
                SpeedTier { under_ms: 500, points: 50 },
                SpeedTier { under_ms: 1000, points: 25 },
                SpeedTier { under_ms: 2000, points: 10 },
            ],
            slow_fruit_points: 5,
            // Three copies of every fruit plus one extra apple
            super_fruit_weights: [4, 3, 3, 3],
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning from JSON. Missing fields keep their
    /// shipped defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every range is ordered and every cadence is positive
    pub fn validate(&self) -> Result<(), TuningError> {
        let d = &self.difficulty;

        check_range(
            "spawn_interval_ms",
            d.spawn_interval_min_ms as f64,
            d.spawn_interval_max_ms as f64,
        )?;
        check_range("bad_chance", d.bad_chance_min, d.bad_chance_max)?;
        check_range(
            "lifetime_ms",
            d.lifetime_min_ms as f64,
            d.lifetime_max_ms as f64,
        )?;

        if d.spawn_interval_min_ms == 0 {
            return Err(TuningError::NotPositive {
                field: "spawn_interval_min_ms",
            });
        }
        if self.super_spawn_interval_ms == 0 {
            return Err(TuningError::NotPositive {
                field: "super_spawn_interval_ms",
            });
        }
        if self.super_duration_ms == 0 {
            return Err(TuningError::NotPositive {
                field: "super_duration_ms",
            });
        }
        if self.win_score == 0 {
            return Err(TuningError::NotPositive { field: "win_score" });
        }
        if !(d.bad_chance_divisor > 0.0) {
            return Err(TuningError::NotPositive {
                field: "bad_chance_divisor",
            });
        }

        if !(self.star_threshold > 0.0 && self.star_threshold <= 1.0) {
            return Err(TuningError::StarThreshold(self.star_threshold));
        }
        if d.bad_chance_max > self.star_threshold {
            return Err(TuningError::BadChanceAboveThreshold {
                max: d.bad_chance_max,
                threshold: self.star_threshold,
            });
        }

        if self
            .speed_tiers
            .windows(2)
            .any(|w| w[0].under_ms >= w[1].under_ms)
        {
            return Err(TuningError::UnorderedSpeedTiers);
        }

        if self.super_fruit_weights.iter().all(|&w| w == 0) {
            return Err(TuningError::ZeroSuperWeights);
        }
        if self
            .super_fruit_weights
            .iter()
            .try_fold(0u32, |sum, &w| sum.checked_add(w))
            .is_none()
        {
            return Err(TuningError::SuperWeightsOverflow);
        }

        Ok(())
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), TuningError> {
    if min > max {
        Err(TuningError::InvertedRange { field, min, max })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "win_score": 500 }"#).unwrap();
        assert_eq!(tuning.win_score, 500);
        assert_eq!(tuning.bomb_points, -20);
        assert_eq!(tuning.difficulty.spawn_interval_max_ms, 1200);
    }

    #[test]
    fn test_nested_partial_json() {
        let tuning =
            Tuning::from_json(r#"{ "difficulty": { "lifetime_min_ms": 2000 } }"#).unwrap();
        assert_eq!(tuning.difficulty.lifetime_min_ms, 2000);
        assert_eq!(tuning.difficulty.lifetime_max_ms, 6000);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = Tuning::from_json(
            r#"{ "difficulty": { "spawn_interval_min_ms": 2000, "spawn_interval_max_ms": 1000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvertedRange {
                field: "spawn_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_cadence() {
        let mut tuning = Tuning::default();
        tuning.super_spawn_interval_ms = 0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_chance_above_star_threshold() {
        let mut tuning = Tuning::default();
        tuning.difficulty.bad_chance_max = 0.9;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::BadChanceAboveThreshold { .. })
        ));
    }

    #[test]
    fn test_rejects_unordered_tiers() {
        let mut tuning = Tuning::default();
        tuning.speed_tiers[1].under_ms = 400;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::UnorderedSpeedTiers)
        ));
    }

    #[test]
    fn test_rejects_empty_super_pool() {
        let mut tuning = Tuning::default();
        tuning.super_fruit_weights = [0; 4];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ZeroSuperWeights)
        ));
    }

    #[test]
    fn test_rejects_overflowing_super_pool() {
        let err = Tuning::from_json(r#"{ "super_fruit_weights": [4294967295, 1, 0, 0] }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::SuperWeightsOverflow));
    }

    #[test]
    fn test_huge_per_point_rates_are_accepted() {
        let tuning = Tuning::from_json(
            r#"{ "difficulty": { "spawn_interval_per_point_ms": 18446744073709551615, "lifetime_per_point_ms": 18446744073709551615 } }"#,
        )
        .unwrap();
        assert_eq!(tuning.difficulty.spawn_interval_per_point_ms, u64::MAX);
    }

    #[test]
    fn test_error_message() {
        let err = TuningError::NotPositive { field: "win_score" };
        assert_eq!(err.to_string(), "win_score must be positive");
    }
}
