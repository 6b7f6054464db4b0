//! One game session: score, mode, live items and the timers that drive them
//!
//! All mutation happens through `Session` methods called from a single
//! logical thread (the frame tick and the timers it dispatches).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use slotmap::{SecondaryMap, SlotMap};

use super::collision::{circles_overlap, out_of_bounds};
use super::difficulty::Difficulty;
use super::scoring::{Outcome, apply_points, score_item};
use super::spawn::{choose_normal, choose_super, fixed_points, spawn_position};
use super::state::{ExpiryReason, GameEvent, Item, ItemId, ItemKind, Mode, Player};
use super::timer::{Fired, TimerId, TimerKind, Timers};
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

#[derive(Debug)]
pub struct Session {
    seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    now_ms: u64,
    score: u32,
    mode: Mode,
    difficulty: Difficulty,
    items: SlotMap<ItemId, Item>,
    expiry_timers: SecondaryMap<ItemId, TimerId>,
    timers: Timers,
    spawn_timer: Option<TimerId>,
    super_timer: Option<TimerId>,
    player: Player,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a session with the shipped balance
    pub fn new(seed: u64) -> Self {
        Self::start(seed, Tuning::default())
    }

    /// Start a session with a custom balance
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::start(seed, tuning))
    }

    fn start(seed: u64, tuning: Tuning) -> Self {
        let difficulty = Difficulty::for_score(0, &tuning.difficulty);
        let mut timers = Timers::new();
        let spawn_timer = timers.schedule_repeating(0, difficulty.spawn_interval_ms, TimerKind::Spawn);

        log::info!(
            "Session started with seed {} (spawn every {}ms)",
            seed,
            difficulty.spawn_interval_ms
        );

        Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0,
            score: 0,
            mode: Mode::Normal,
            difficulty,
            items: SlotMap::with_key(),
            expiry_timers: SecondaryMap::new(),
            timers,
            spawn_timer: Some(spawn_timer),
            super_timer: None,
            player: Player::default(),
            events: vec![GameEvent::ScoreChanged { score: 0 }],
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_super(&self) -> bool {
        self.mode == Mode::Super
    }

    pub fn is_won(&self) -> bool {
        self.mode == Mode::Won
    }

    /// Parameters from the most recent score change
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Period of the running spawn timer (`None` once won)
    pub fn spawn_cadence_ms(&self) -> Option<u64> {
        self.spawn_timer.and_then(|id| self.timers.period_ms(id))
    }

    /// Time left in super mode
    pub fn super_remaining_ms(&self) -> Option<u64> {
        self.super_timer
            .and_then(|id| self.timers.remaining_ms(id, self.now_ms))
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// The only way items move: set `pos` or `vel` here (knockback, wind)
    /// and the tick integrates and reaps them. Scoring reads only kind and
    /// spawn time.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Take pending notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move the session clock forward
    pub fn advance_clock(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
    }

    /// Dispatch every timer due at the current time, in due order
    pub fn run_due_timers(&mut self) {
        while !self.is_won() {
            let Some(fired) = self.timers.pop_due(self.now_ms) else {
                break;
            };
            self.dispatch(fired);
        }
    }

    fn dispatch(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::Spawn => {
                if self.spawn_timer == Some(fired.id) {
                    self.spawn_random(fired.at_ms);
                }
            }
            TimerKind::SuperModeEnd => {
                if self.super_timer == Some(fired.id) {
                    self.end_super();
                }
            }
            TimerKind::ItemExpiry(item_id) => {
                if self.expiry_timers.get(item_id) == Some(&fired.id) {
                    self.expire_item(item_id, ExpiryReason::Lifetime);
                }
            }
        }
    }

    fn spawn_random(&mut self, at_ms: u64) -> Option<ItemId> {
        let kind = if self.is_super() {
            choose_super(&mut self.rng, &self.tuning)
        } else {
            choose_normal(&mut self.rng, self.difficulty.bad_item_chance, &self.tuning)
        };
        let pos = spawn_position(&mut self.rng);
        self.insert_item_at(kind, pos, at_ms)
    }

    /// Place an item of a given kind now. Returns `None` once the run is won.
    pub fn spawn_item(&mut self, kind: ItemKind, pos: Vec2) -> Option<ItemId> {
        self.insert_item_at(kind, pos, self.now_ms)
    }

    fn insert_item_at(&mut self, kind: ItemKind, pos: Vec2, at_ms: u64) -> Option<ItemId> {
        if self.is_won() {
            return None;
        }

        let lifetime_ms = self.difficulty.item_lifetime_ms;
        let bob_phase = self.rng.random_range(0.0..std::f32::consts::TAU);
        let id = self.items.insert(Item {
            kind,
            spawned_at_ms: Some(at_ms),
            fixed_points: fixed_points(kind, &self.tuning),
            lifetime_ms,
            pos,
            vel: Vec2::ZERO,
            bob_phase,
        });

        let expiry = self
            .timers
            .schedule_once(at_ms, lifetime_ms, TimerKind::ItemExpiry(id));
        self.expiry_timers.insert(id, expiry);

        log::debug!("Spawned {} at ({}, {})", kind.as_str(), pos.x, pos.y);
        self.events.push(GameEvent::ItemSpawned { id, kind, pos });
        Some(id)
    }

    /// Remove an item that is being discarded
    fn take_item(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(id)?;
        if let Some(timer) = self.expiry_timers.remove(id) {
            self.timers.cancel(timer);
        }
        Some(item)
    }

    /// Drop an item without scoring it. Returns false if it was already gone.
    pub fn expire_item(&mut self, id: ItemId, reason: ExpiryReason) -> bool {
        match self.take_item(id) {
            Some(item) => {
                log::debug!("{} expired ({:?})", item.kind.as_str(), reason);
                self.events.push(GameEvent::ItemExpired { id, reason });
                true
            }
            None => false,
        }
    }

    /// Integrate velocities set through `item_mut`
    pub fn move_items(&mut self, dt_secs: f32) {
        for item in self.items.values_mut() {
            item.pos += item.vel * dt_secs;
        }
    }

    /// Drop every item that has left the play area
    pub fn reap_out_of_bounds(&mut self) -> usize {
        let gone: Vec<ItemId> = self
            .items
            .iter()
            .filter(|(_, item)| {
                out_of_bounds(item.pos, WORLD_WIDTH, WORLD_HEIGHT, OUT_OF_BOUNDS_MARGIN)
            })
            .map(|(id, _)| id)
            .collect();

        for &id in &gone {
            self.expire_item(id, ExpiryReason::OutOfBounds);
        }
        gone.len()
    }

    /// Collect every item touching the player
    pub fn collect_overlapping(&mut self) -> Vec<Outcome> {
        let player = &self.player;
        let touching: Vec<ItemId> = self
            .items
            .iter()
            .filter(|(_, item)| {
                circles_overlap(player.pos, player.radius, item.pos, item.kind.radius())
            })
            .map(|(id, _)| id)
            .collect();

        touching.into_iter().filter_map(|id| self.collect(id)).collect()
    }

    /// Score a contact with an item. Contacts with items that are already
    /// gone (collected, expired, or cleared by a win) are ignored.
    pub fn collect(&mut self, id: ItemId) -> Option<Outcome> {
        if self.is_won() {
            return None;
        }
        let item = self.take_item(id)?;
        let outcome = score_item(&item, self.now_ms, &self.tuning);

        log::debug!(
            "Collected {} for {} ({:?})",
            item.kind.as_str(),
            outcome.points,
            outcome.qualifier
        );

        let mut won = false;
        if outcome.triggers_super {
            self.activate_super();
        } else {
            self.score = apply_points(self.score, outcome.points);
            self.update_difficulty();
            self.events.push(GameEvent::ScoreChanged { score: self.score });
            won = self.score >= self.tuning.win_score;
        }

        self.events.push(GameEvent::Collected {
            pos: item.pos,
            points: outcome.points,
            kind: item.kind,
            qualifier: outcome.qualifier,
        });

        if won {
            self.win();
        }

        Some(outcome)
    }

    fn update_difficulty(&mut self) {
        self.difficulty = Difficulty::for_score(self.score, &self.tuning.difficulty);
        if self.mode != Mode::Normal {
            return;
        }
        if let Some(id) = self.spawn_timer {
            self.timers
                .set_period(id, self.now_ms, self.difficulty.spawn_interval_ms);
        }
    }

    /// Replace the spawn timer with one on a new cadence
    fn restart_spawning(&mut self, period_ms: u64) {
        if let Some(old) = self.spawn_timer.take() {
            self.timers.cancel(old);
        }
        self.spawn_timer = Some(
            self.timers
                .schedule_repeating(self.now_ms, period_ms, TimerKind::Spawn),
        );
    }

    /// Enter super mode, or restart its countdown if already active
    fn activate_super(&mut self) {
        if let Some(old) = self.super_timer.take() {
            self.timers.cancel(old);
        }

        let duration = self.tuning.super_duration_ms;
        log::info!(
            "Super mode {} for {}ms",
            if self.is_super() { "extended" } else { "started" },
            duration
        );

        self.mode = Mode::Super;
        self.restart_spawning(self.tuning.super_spawn_interval_ms);
        self.super_timer = Some(
            self.timers
                .schedule_once(self.now_ms, duration, TimerKind::SuperModeEnd),
        );
        self.events.push(GameEvent::SuperMode {
            active: true,
            duration_ms: Some(duration),
        });
    }

    fn end_super(&mut self) {
        self.super_timer = None;
        self.mode = Mode::Normal;
        self.restart_spawning(self.difficulty.spawn_interval_ms);
        log::info!(
            "Super mode ended, spawning every {}ms",
            self.difficulty.spawn_interval_ms
        );
        self.events.push(GameEvent::SuperMode {
            active: false,
            duration_ms: None,
        });
    }

    fn win(&mut self) {
        self.mode = Mode::Won;
        self.timers.clear();
        self.spawn_timer = None;
        self.super_timer = None;
        self.items.clear();
        self.expiry_timers.clear();
        self.player.input_enabled = false;
        log::info!("Run won with {} points at {}ms", self.score, self.now_ms);
        self.events.push(GameEvent::Won);
    }
}
