//! End-to-end runs through the public session API

use fruit_rush::Tuning;
use fruit_rush::consts::SIM_DT_MS;
use fruit_rush::sim::{GameEvent, ItemKind, Mode, Session, TickInput, tick};

fn run_for(session: &mut Session, ms: u64) -> Vec<GameEvent> {
    let input = TickInput::default();
    let mut events = Vec::new();
    for _ in 0..ms / SIM_DT_MS {
        tick(session, &input, SIM_DT_MS);
        events.extend(session.drain_events());
    }
    events
}

/// Drop an item on the player and let the next tick catch it
fn catch(session: &mut Session, kind: ItemKind) -> Vec<GameEvent> {
    let pos = session.player().pos;
    session.spawn_item(kind, pos);
    run_for(session, SIM_DT_MS)
}

#[test]
fn star_runs_super_mode_then_returns_to_normal() {
    let mut session = Session::new(11);
    session.drain_events();

    let events = catch(&mut session, ItemKind::Star);
    assert_eq!(session.mode(), Mode::Super);
    assert_eq!(session.spawn_cadence_ms(), Some(400));
    assert_eq!(session.score(), 0);
    assert!(events.contains(&GameEvent::SuperMode {
        active: true,
        duration_ms: Some(5000),
    }));

    let during = run_for(&mut session, 4800);
    assert_eq!(session.mode(), Mode::Super);
    let spawned: Vec<ItemKind> = during
        .iter()
        .filter_map(|e| match e {
            GameEvent::ItemSpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert!(spawned.len() >= 11);
    assert!(spawned.iter().all(|k| ItemKind::FRUITS.contains(k)));

    let after = run_for(&mut session, 400);
    assert_eq!(session.mode(), Mode::Normal);
    assert_eq!(session.spawn_cadence_ms(), Some(1200));
    assert!(after.contains(&GameEvent::SuperMode {
        active: false,
        duration_ms: None,
    }));
}

#[test]
fn scoring_tightens_spawn_cadence() {
    let mut session = Session::new(12);
    catch(&mut session, ItemKind::Banana);
    assert_eq!(session.score(), 50);
    assert_eq!(session.spawn_cadence_ms(), Some(1100));

    catch(&mut session, ItemKind::Skull);
    assert_eq!(session.score(), 35);
    assert_eq!(session.spawn_cadence_ms(), Some(1130));
}

#[test]
fn win_fires_once_and_freezes_the_run() {
    let mut session = Session::new(13);
    let mut events = Vec::new();
    for _ in 0..6 {
        events.extend(catch(&mut session, ItemKind::Apple));
    }
    events.extend(run_for(&mut session, 10_000));

    let wins = events.iter().filter(|e| matches!(e, GameEvent::Won)).count();
    assert_eq!(wins, 1);
    assert_eq!(session.mode(), Mode::Won);
    assert_eq!(session.score(), 300);
    assert_eq!(session.item_count(), 0);
    assert_eq!(session.spawn_cadence_ms(), None);
    assert!(
        !events
            .iter()
            .skip_while(|e| !matches!(e, GameEvent::Won))
            .any(|e| matches!(e, GameEvent::ItemSpawned { .. }))
    );
    assert!(session.spawn_item(ItemKind::Apple, session.player().pos).is_none());
}

#[test]
fn tuning_file_overrides_win_score() {
    let tuning = Tuning::from_json(r#"{ "win_score": 100 }"#).unwrap();
    let mut session = Session::with_tuning(14, tuning).unwrap();
    catch(&mut session, ItemKind::Grape);
    assert_eq!(session.mode(), Mode::Normal);
    catch(&mut session, ItemKind::Grape);
    assert_eq!(session.mode(), Mode::Won);
}
