//! Score-driven difficulty ramp
//!
//! Pure function of `min(score, progress_cap)`; recomputed after every
//! scoring event.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyCurve;

/// Spawn and expiry parameters for the current score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub spawn_interval_ms: u64,
    pub bad_item_chance: f64,
    pub item_lifetime_ms: u64,
}

impl Difficulty {
    pub fn for_score(score: u32, curve: &DifficultyCurve) -> Self {
        let progress = u64::from(score.min(curve.progress_cap));

        let spawn_interval_ms = curve
            .spawn_interval_max_ms
            .saturating_sub(progress.saturating_mul(curve.spawn_interval_per_point_ms))
            .clamp(curve.spawn_interval_min_ms, curve.spawn_interval_max_ms);

        let bad_item_chance = (curve.bad_chance_min + progress as f64 / curve.bad_chance_divisor)
            .clamp(curve.bad_chance_min, curve.bad_chance_max);

        let item_lifetime_ms = curve
            .lifetime_max_ms
            .saturating_sub(progress.saturating_mul(curve.lifetime_per_point_ms))
            .clamp(curve.lifetime_min_ms, curve.lifetime_max_ms);

        Self {
            spawn_interval_ms,
            bad_item_chance,
            item_lifetime_ms,
        }
    }
}
