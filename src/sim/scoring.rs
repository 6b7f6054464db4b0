//! Points for a collected item

use super::spawn::fixed_points;
use super::state::{Item, ItemClass, ItemKind, Qualifier};
use crate::tuning::Tuning;

/// Result of scoring one collected item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub kind: ItemKind,
    pub points: i32,
    pub qualifier: Qualifier,
    /// Star pickups start (or restart) super mode instead of scoring
    pub triggers_super: bool,
}

/// Reaction-speed points for fruit caught `elapsed_ms` after it appeared
pub fn fruit_points(elapsed_ms: Option<u64>, tuning: &Tuning) -> (i32, Qualifier) {
    let Some(elapsed) = elapsed_ms else {
        return (tuning.slow_fruit_points, Qualifier::None);
    };

    const LABELS: [Qualifier; 3] = [Qualifier::Divine, Qualifier::Great, Qualifier::Good];
    tuning
        .speed_tiers
        .iter()
        .zip(LABELS)
        .find(|(tier, _)| elapsed < tier.under_ms)
        .map(|(tier, label)| (tier.points, label))
        .unwrap_or((tuning.slow_fruit_points, Qualifier::None))
}

/// Score an item collected at `now_ms`
pub fn score_item(item: &Item, now_ms: u64, tuning: &Tuning) -> Outcome {
    let kind = item.kind;
    match kind.class() {
        ItemClass::Power => Outcome {
            kind,
            points: 0,
            qualifier: Qualifier::Super,
            triggers_super: true,
        },
        ItemClass::Bad => Outcome {
            kind,
            points: item
                .fixed_points
                .or_else(|| fixed_points(kind, tuning))
                .unwrap_or(0),
            qualifier: Qualifier::None,
            triggers_super: false,
        },
        ItemClass::Fruit => {
            let (points, qualifier) = fruit_points(item.age_ms(now_ms), tuning);
            Outcome {
                kind,
                points,
                qualifier,
                triggers_super: false,
            }
        }
    }
}

/// Apply points to a score, never dropping below zero
#[inline]
pub fn apply_points(score: u32, points: i32) -> u32 {
    let next = i64::from(score) + i64::from(points);
    next.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn item(kind: ItemKind, spawned_at_ms: Option<u64>) -> Item {
        let tuning = Tuning::default();
        Item {
            kind,
            spawned_at_ms,
            fixed_points: fixed_points(kind, &tuning),
            lifetime_ms: 6000,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            bob_phase: 0.0,
        }
    }

    #[test]
    fn test_fruit_step_table() {
        let tuning = Tuning::default();
        let cases = [
            (0, 50),
            (499, 50),
            (500, 25),
            (999, 25),
            (1000, 10),
            (1999, 10),
            (2000, 5),
            (60_000, 5),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(
                fruit_points(Some(elapsed), &tuning).0,
                expected,
                "elapsed {elapsed}"
            );
        }
    }

    #[test]
    fn test_fruit_qualifiers() {
        let tuning = Tuning::default();
        assert_eq!(fruit_points(Some(100), &tuning).1, Qualifier::Divine);
        assert_eq!(fruit_points(Some(700), &tuning).1, Qualifier::Great);
        assert_eq!(fruit_points(Some(1500), &tuning).1, Qualifier::Good);
        assert_eq!(fruit_points(Some(2500), &tuning).1, Qualifier::None);
    }

    #[test]
    fn test_fruit_without_timestamp_scores_minimum() {
        let tuning = Tuning::default();
        let outcome = score_item(&item(ItemKind::Grape, None), 100, &tuning);
        assert_eq!(outcome.points, 5);
        assert_eq!(outcome.qualifier, Qualifier::None);
    }

    #[test]
    fn test_fruit_scored_on_age() {
        let tuning = Tuning::default();
        let outcome = score_item(&item(ItemKind::Cherry, Some(1000)), 1300, &tuning);
        assert_eq!(outcome.points, 50);
        assert!(!outcome.triggers_super);
    }

    #[test]
    fn test_bad_items_ignore_time() {
        let tuning = Tuning::default();
        for now in [0, 100, 5000] {
            assert_eq!(
                score_item(&item(ItemKind::Bomb, Some(0)), now, &tuning).points,
                -20
            );
            assert_eq!(
                score_item(&item(ItemKind::Skull, Some(0)), now, &tuning).points,
                -15
            );
        }
    }

    #[test]
    fn test_star_triggers_super_without_points() {
        let tuning = Tuning::default();
        let outcome = score_item(&item(ItemKind::Star, Some(0)), 200, &tuning);
        assert_eq!(outcome.points, 0);
        assert!(outcome.triggers_super);
        assert_eq!(outcome.qualifier, Qualifier::Super);
    }

    #[test]
    fn test_apply_points_floor() {
        assert_eq!(apply_points(10, -20), 0);
        assert_eq!(apply_points(295, -20), 275);
        assert_eq!(apply_points(280, 50), 330);
    }

    proptest! {
        #[test]
        fn prop_score_never_negative(points in proptest::collection::vec(
            prop_oneof![Just(50), Just(25), Just(10), Just(5), Just(-15), Just(-20)], 0..200)
        ) {
            let mut score = 0u32;
            for p in points {
                let before = score;
                score = apply_points(score, p);
                prop_assert_eq!(i64::from(score), (i64::from(before) + i64::from(p)).max(0));
            }
        }
    }
}
