//! Contact and bounds checks
//!
//! Everything in play is treated as a circle; the play area is an
//! axis-aligned rectangle with its origin at the top-left corner.

use glam::Vec2;

/// Check whether two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Check whether a point has left the `width` x `height` area by more than `margin`
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let player = Vec2::new(100.0, 100.0);
        assert!(circles_overlap(player, 40.0, Vec2::new(160.0, 100.0), 28.0));
        assert!(!circles_overlap(player, 40.0, Vec2::new(170.0, 100.0), 28.0));
    }

    #[test]
    fn test_circles_touching_counts() {
        assert!(circles_overlap(
            Vec2::ZERO,
            10.0,
            Vec2::new(30.0, 0.0),
            20.0
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        let (w, h, m) = (720.0, 1280.0, 60.0);
        assert!(!out_of_bounds(Vec2::new(360.0, 640.0), w, h, m));
        // Inside the margin still counts as in play
        assert!(!out_of_bounds(Vec2::new(-59.0, 640.0), w, h, m));
        assert!(!out_of_bounds(Vec2::new(360.0, h + 60.0), w, h, m));

        assert!(out_of_bounds(Vec2::new(-61.0, 640.0), w, h, m));
        assert!(out_of_bounds(Vec2::new(w + 61.0, 640.0), w, h, m));
        assert!(out_of_bounds(Vec2::new(360.0, -61.0), w, h, m));
        assert!(out_of_bounds(Vec2::new(360.0, h + 61.0), w, h, m));
    }
}
