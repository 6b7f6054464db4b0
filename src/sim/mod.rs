//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Session clock in whole milliseconds, advanced only by `tick`
//! - Seeded RNG only
//! - Stable iteration order (arena slot order, timers by due time)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod scoring;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{circles_overlap, out_of_bounds};
pub use difficulty::Difficulty;
pub use scoring::{Outcome, apply_points, fruit_points, score_item};
pub use session::Session;
pub use state::{
    ExpiryReason, GameEvent, Item, ItemClass, ItemId, ItemKind, Mode, Player, Qualifier,
};
pub use tick::{TickInput, tick};
pub use timer::{TimerId, TimerKind, Timers};
