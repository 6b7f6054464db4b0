//! Fruit Rush - an arcade catcher game
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (difficulty, spawning, scoring, modes)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (125 Hz)
    pub const SIM_DT_MS: u64 = 8;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions (portrait, scaled to fit by the page)
    pub const WORLD_WIDTH: f32 = 720.0;
    pub const WORLD_HEIGHT: f32 = 1280.0;

    /// Player starts centered, 120px above the bottom edge
    pub const PLAYER_START_Y_OFFSET: f32 = 120.0;
    /// Contact radius of the player body
    pub const PLAYER_RADIUS: f32 = 40.0;
    /// Player center never gets closer than this to an edge
    pub const PLAYER_EDGE_MARGIN: f32 = 32.0;
    /// Fraction of the remaining distance to the target covered per second
    pub const PLAYER_FOLLOW_SPEED: f32 = 8.0;

    /// Item contact radii
    pub const ITEM_RADIUS: f32 = 28.0;
    pub const STAR_RADIUS: f32 = 34.0;

    /// Spawn area: x in [margin, W - margin], y in [top, H - bottom]
    pub const SPAWN_MARGIN_X: f32 = 50.0;
    pub const SPAWN_MARGIN_TOP: f32 = 100.0;
    pub const SPAWN_MARGIN_BOTTOM: f32 = 200.0;

    /// Items further than this outside the play area are reaped
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 60.0;

    /// Cosmetic float (display only, never used for contact)
    pub const BOB_AMPLITUDE: f32 = 15.0;
    pub const BOB_PERIOD_MS: f32 = 1500.0;
}

/// Clamp a point into the rectangle `[margin, w - margin] x [margin, h - margin]`
#[inline]
pub fn clamp_to_area(p: Vec2, w: f32, h: f32, margin: f32) -> Vec2 {
    Vec2::new(p.x.clamp(margin, w - margin), p.y.clamp(margin, h - margin))
}
