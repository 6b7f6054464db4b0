//! Fixed timestep simulation tick
//!
//! Advances the session clock, moves the player, fires due timers, then
//! resolves bounds and contacts, in that order.

use glam::Vec2;

use super::session::Session;
use super::state::Player;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position in world coordinates
    pub target: Option<Vec2>,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by `dt_ms`
pub fn tick(session: &mut Session, input: &TickInput, dt_ms: u64) {
    let dt_secs = dt_ms as f32 / 1000.0;

    session.advance_clock(dt_ms);

    let target = if input.idle_mode {
        autopilot_target(session)
    } else {
        input.target
    };
    if let Some(target) = target {
        session.player_mut().set_target(target);
    }
    session.player_mut().follow(dt_secs);

    if session.is_won() {
        return;
    }

    session.move_items(dt_secs);
    // Expiry runs first: an item that expires this tick cannot also be caught
    session.run_due_timers();
    session.reap_out_of_bounds();
    session.collect_overlapping();
}

/// Pick something worth catching: the nearest star or fruit, skipping bad
/// items. Heads back to the start line when nothing is in play.
pub fn autopilot_target(session: &Session) -> Option<Vec2> {
    if session.is_won() {
        return None;
    }
    let player = session.player().pos;
    let best = session
        .items()
        .filter(|(_, item)| !item.kind.is_bad())
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(player)
                .partial_cmp(&b.pos.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(_, item)| item.pos);

    Some(best.unwrap_or_else(|| Player::default().pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{ExpiryReason, GameEvent, ItemKind, Mode};

    #[test]
    fn test_player_follows_target() {
        let mut session = Session::new(1);
        let start = session.player().pos;
        let input = TickInput {
            target: Some(Vec2::new(100.0, 400.0)),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut session, &input, SIM_DT_MS);
        }
        let goal = Vec2::new(100.0, 400.0);
        assert!(session.player().pos.distance(goal) < start.distance(goal));
    }

    #[test]
    fn test_contact_collects_item() {
        let mut session = Session::new(2);
        let pos = session.player().pos;
        let id = session.spawn_item(ItemKind::Apple, pos).unwrap();
        session.drain_events();

        tick(&mut session, &TickInput::default(), SIM_DT_MS);
        assert!(session.item(id).is_none());
        assert_eq!(session.score(), 50);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 50 }));
    }

    #[test]
    fn test_item_expiring_on_contact_tick_is_not_scored() {
        let mut session = Session::new(3);
        let pos = session.player().pos;
        let id = session.spawn_item(ItemKind::Bomb, pos).unwrap();
        let lifetime = session.item(id).unwrap().lifetime_ms;
        session.drain_events();

        // Move the player away, wait out the lifetime, then step onto the item
        session.player_mut().pos = Vec2::new(100.0, 100.0);
        session.player_mut().target = Vec2::new(100.0, 100.0);
        session.advance_clock(lifetime - SIM_DT_MS);
        session.player_mut().pos = pos;
        session.player_mut().target = pos;
        tick(&mut session, &TickInput::default(), SIM_DT_MS);

        assert!(session.item(id).is_none());
        assert_eq!(session.score(), 0);
        assert!(!session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Collected { .. })));
    }

    #[test]
    fn test_pushed_item_drifts_out_and_is_reaped() {
        let mut session = Session::new(6);
        let id = session.spawn_item(ItemKind::Cherry, Vec2::new(600.0, 200.0)).unwrap();
        session.item_mut(id).unwrap().vel = Vec2::new(2000.0, 0.0);
        session.drain_events();

        for _ in 0..20 {
            tick(&mut session, &TickInput::default(), SIM_DT_MS);
        }
        assert!(session.item(id).is_none());
        assert!(session.drain_events().contains(&GameEvent::ItemExpired {
            id,
            reason: ExpiryReason::OutOfBounds,
        }));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_won_session_ignores_input() {
        let mut session = Session::new(4);
        for _ in 0..6 {
            let pos = session.player().pos;
            session.spawn_item(ItemKind::Apple, pos);
            tick(&mut session, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(session.mode(), Mode::Won);

        let target = session.player().target;
        let input = TickInput {
            target: Some(Vec2::new(50.0, 50.0)),
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT_MS);
        assert_eq!(session.player().target, target);
    }

    #[test]
    fn test_autopilot_skips_bad_items() {
        let mut session = Session::new(5);
        let start = session.player().pos;
        session.spawn_item(ItemKind::Bomb, start + Vec2::new(0.0, -100.0));
        let fruit = Vec2::new(600.0, 300.0);
        session.spawn_item(ItemKind::Grape, fruit);
        assert_eq!(autopilot_target(&session), Some(fruit));
    }

    #[test]
    fn test_idle_mode_wins_eventually() {
        let mut session = Session::new(77);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        // Ten simulated minutes is far more than a competent run needs
        for _ in 0..(10 * 60 * 1000 / SIM_DT_MS) {
            tick(&mut session, &input, SIM_DT_MS);
            if session.is_won() {
                break;
            }
        }
        assert!(session.is_won(), "score {}", session.score());
        assert_eq!(session.item_count(), 0);
    }
}
