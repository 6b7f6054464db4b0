//! Item category selection and placement

use glam::Vec2;
use rand::Rng;

use super::state::{ItemClass, ItemKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Map a uniform roll in `[0, 1)` to an item class.
///
/// Fruit takes `[0, star_threshold - bad_chance)`, bad items the rest of
/// `[0, star_threshold)`, and stars everything above. The star share stays
/// fixed while bad items eat into the fruit share as difficulty rises.
pub fn classify_roll(roll: f64, bad_chance: f64, star_threshold: f64) -> ItemClass {
    if roll < star_threshold - bad_chance {
        ItemClass::Fruit
    } else if roll < star_threshold {
        ItemClass::Bad
    } else {
        ItemClass::Power
    }
}

/// Pick an item kind for normal play
pub fn choose_normal<R: Rng>(rng: &mut R, bad_chance: f64, tuning: &Tuning) -> ItemKind {
    let roll: f64 = rng.random();
    match classify_roll(roll, bad_chance, tuning.star_threshold) {
        ItemClass::Fruit => ItemKind::FRUITS[rng.random_range(0..ItemKind::FRUITS.len())],
        ItemClass::Bad => ItemKind::BAD[rng.random_range(0..ItemKind::BAD.len())],
        ItemClass::Power => ItemKind::Star,
    }
}

/// Pick a fruit from the weighted super mode pool
pub fn choose_super<R: Rng>(rng: &mut R, tuning: &Tuning) -> ItemKind {
    let weights = &tuning.super_fruit_weights;
    let total: u64 = weights.iter().copied().map(u64::from).sum();
    debug_assert!(total > 0, "validated tuning has a non-empty super pool");
    weighted_fruit(rng.random_range(0..total.max(1)), weights)
}

/// Resolve a ticket in `[0, sum(weights))` to the fruit that owns it
pub fn weighted_fruit(mut ticket: u64, weights: &[u32; 4]) -> ItemKind {
    for (kind, weight) in ItemKind::FRUITS.iter().zip(weights.map(u64::from)) {
        if ticket < weight {
            return *kind;
        }
        ticket -= weight;
    }
    ItemKind::FRUITS[0]
}

/// Random position inside the spawn area, on whole pixels
pub fn spawn_position<R: Rng>(rng: &mut R) -> Vec2 {
    let x = rng.random_range(SPAWN_MARGIN_X as i32..=(WORLD_WIDTH - SPAWN_MARGIN_X) as i32);
    let y = rng.random_range(
        SPAWN_MARGIN_TOP as i32..=(WORLD_HEIGHT - SPAWN_MARGIN_BOTTOM) as i32,
    );
    Vec2::new(x as f32, y as f32)
}

/// Fixed points carried by bad items
pub fn fixed_points(kind: ItemKind, tuning: &Tuning) -> Option<i32> {
    match kind {
        ItemKind::Bomb => Some(tuning.bomb_points),
        ItemKind::Skull => Some(tuning.skull_points),
        _ => None,
    }
}
