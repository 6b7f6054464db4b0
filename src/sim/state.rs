//! Core simulation types: items, the player, modes and outbound events

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::clamp_to_area;
use crate::consts::*;

new_key_type! {
    /// Stable handle to a live item. Stale handles resolve to nothing.
    pub struct ItemId;
}

/// Broad item class used by spawn selection and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemClass {
    Fruit,
    Bad,
    Power,
}

/// Every kind of item that can appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Apple,
    Banana,
    Cherry,
    Grape,
    Bomb,
    Skull,
    Star,
}

impl ItemKind {
    /// Fruit in pool order; the first entry is the one favoured in super mode
    pub const FRUITS: [ItemKind; 4] = [
        ItemKind::Apple,
        ItemKind::Banana,
        ItemKind::Cherry,
        ItemKind::Grape,
    ];
    pub const BAD: [ItemKind; 2] = [ItemKind::Bomb, ItemKind::Skull];

    pub fn class(self) -> ItemClass {
        match self {
            ItemKind::Apple | ItemKind::Banana | ItemKind::Cherry | ItemKind::Grape => {
                ItemClass::Fruit
            }
            ItemKind::Bomb | ItemKind::Skull => ItemClass::Bad,
            ItemKind::Star => ItemClass::Power,
        }
    }

    pub fn is_bad(self) -> bool {
        self.class() == ItemClass::Bad
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Apple => "apple",
            ItemKind::Banana => "banana",
            ItemKind::Cherry => "cherry",
            ItemKind::Grape => "grape",
            ItemKind::Bomb => "bomb",
            ItemKind::Skull => "skull",
            ItemKind::Star => "star",
        }
    }

    /// Contact radius
    pub fn radius(self) -> f32 {
        match self {
            ItemKind::Star => STAR_RADIUS,
            _ => ITEM_RADIUS,
        }
    }
}

/// A spawned item awaiting collection or expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Session time of creation. Fruit without one score the slow value.
    pub spawned_at_ms: Option<u64>,
    /// Fixed score for bad items; fruit is scored at collection, stars score nothing
    pub fixed_points: Option<i32>,
    /// Lifetime captured at spawn; later difficulty changes do not touch it
    pub lifetime_ms: u64,
    pub pos: Vec2,
    /// Drift velocity in px/s. Spawned items hover in place; only callers
    /// going through `Session::item_mut` set this.
    pub vel: Vec2,
    /// Phase offset for the cosmetic float, in radians
    pub bob_phase: f32,
}

impl Item {
    pub fn age_ms(&self, now_ms: u64) -> Option<u64> {
        self.spawned_at_ms.map(|t| now_ms.saturating_sub(t))
    }

    /// Position to draw at, including the cosmetic float
    pub fn display_pos(&self, now_ms: u64) -> Vec2 {
        let t = now_ms as f32 / BOB_PERIOD_MS * std::f32::consts::TAU + self.bob_phase;
        self.pos + Vec2::new(0.0, t.sin() * BOB_AMPLITUDE)
    }
}

/// The player-controlled catcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub target: Vec2,
    pub radius: f32,
    /// Cleared when the run is won
    pub input_enabled: bool,
}

impl Default for Player {
    fn default() -> Self {
        let start = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - PLAYER_START_Y_OFFSET);
        Self {
            pos: start,
            target: start,
            radius: PLAYER_RADIUS,
            input_enabled: true,
        }
    }
}

impl Player {
    /// Point the player at a new target (ignored once input is disabled)
    pub fn set_target(&mut self, target: Vec2) {
        if self.input_enabled {
            self.target = target;
        }
    }

    /// Ease toward the target, covering `PLAYER_FOLLOW_SPEED` of the gap per second
    pub fn follow(&mut self, dt_secs: f32) {
        let delta = self.target - self.pos;
        self.pos += delta * PLAYER_FOLLOW_SPEED * dt_secs;
        self.pos = clamp_to_area(self.pos, WORLD_WIDTH, WORLD_HEIGHT, PLAYER_EDGE_MARGIN);
    }
}

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    /// Fruit-only, fast spawning
    Super,
    /// Terminal
    Won,
}

/// Reaction label attached to a collection popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualifier {
    Divine,
    Great,
    Good,
    /// Star pickup
    Super,
    None,
}

impl Qualifier {
    pub fn label(self) -> &'static str {
        match self {
            Qualifier::Divine => "DIVINE!",
            Qualifier::Great => "GREAT!",
            Qualifier::Good => "GOOD!",
            Qualifier::Super => "SUPER!",
            Qualifier::None => "",
        }
    }
}

/// Why an item left play without being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    Lifetime,
    OutOfBounds,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged {
        score: u32,
    },
    SuperMode {
        active: bool,
        duration_ms: Option<u64>,
    },
    Won,
    Collected {
        pos: Vec2,
        points: i32,
        kind: ItemKind,
        qualifier: Qualifier,
    },
    ItemSpawned {
        id: ItemId,
        kind: ItemKind,
        pos: Vec2,
    },
    ItemExpired {
        id: ItemId,
        reason: ExpiryReason,
    },
}
