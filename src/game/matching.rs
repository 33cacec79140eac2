//! Match Evaluation
//!
//! Two shapes match when they share a kind and their rotations are within
//! a small tolerance of each other on the circle.

use crate::core::rng::FULL_TURN_DEG;
use crate::game::board::ShapeInstance;

/// Default rotation tolerance (degrees, exclusive).
pub const ROTATION_TOLERANCE_DEG: f64 = 5.0;

/// Shortest angular distance between two rotations, in [0, 180].
#[inline]
pub fn rotation_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % FULL_TURN_DEG;
    d.min(FULL_TURN_DEG - d)
}

/// Are `a` and `b` a match under `tolerance_deg`?
///
/// Only meaningful for two distinct shapes; selecting the same shape twice
/// is a deselect and never reaches this function.
#[inline]
pub fn is_match_within(a: &ShapeInstance, b: &ShapeInstance, tolerance_deg: f64) -> bool {
    a.kind == b.kind && rotation_distance(a.rotation_degrees, b.rotation_degrees) < tolerance_deg
}

/// [`is_match_within`] with the default 5° tolerance.
#[inline]
pub fn is_match(a: &ShapeInstance, b: &ShapeInstance) -> bool {
    is_match_within(a, b, ROTATION_TOLERANCE_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::game::board::{Position, ShapeId};
    use crate::game::level::ShapeKind;

    fn shape(id: u32, kind: ShapeKind, rotation_degrees: f64) -> ShapeInstance {
        ShapeInstance {
            id: ShapeId(id),
            kind,
            rotation_degrees,
            position: Position::new(0, id),
            matched: false,
        }
    }

    #[test]
    fn test_exact_match() {
        let a = shape(0, ShapeKind::Hexagon, 90.0);
        let b = shape(1, ShapeKind::Hexagon, 90.0);
        assert!(is_match(&a, &b));
    }

    #[test]
    fn test_kind_mismatch() {
        let a = shape(0, ShapeKind::Hexagon, 90.0);
        let b = shape(1, ShapeKind::Pentagon, 90.0);
        assert!(!is_match(&a, &b));
    }

    #[test]
    fn test_tolerance_boundary() {
        let a = shape(0, ShapeKind::Circle, 100.0);
        assert!(is_match(&a, &shape(1, ShapeKind::Circle, 104.9)));
        assert!(!is_match(&a, &shape(1, ShapeKind::Circle, 105.0)));
        assert!(!is_match(&a, &shape(1, ShapeKind::Circle, 95.0)));
    }

    #[test]
    fn test_wraparound() {
        let a = shape(0, ShapeKind::Square, 358.0);
        let b = shape(1, ShapeKind::Square, 2.0);
        assert!(is_match(&a, &b));
        assert!(is_match(&b, &a));

        let c = shape(2, ShapeKind::Square, 355.0);
        let d = shape(3, ShapeKind::Square, 0.0);
        assert!(!is_match(&c, &d));
    }

    #[test]
    fn test_rotation_distance() {
        assert_eq!(rotation_distance(10.0, 350.0), 20.0);
        assert_eq!(rotation_distance(0.0, 180.0), 180.0);
        assert_eq!(rotation_distance(270.0, 270.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_close_rotations_match(base in 0.0f64..360.0, delta in -4.99f64..4.99) {
            let other = (base + delta).rem_euclid(360.0);
            let a = shape(0, ShapeKind::Diamond, base);
            let b = shape(1, ShapeKind::Diamond, other);
            prop_assert!(is_match(&a, &b));
        }

        #[test]
        fn prop_far_rotations_never_match(
            base in 0.0f64..360.0,
            delta in 5.0f64..=355.0,
            kind_a in 0u8..6,
            kind_b in 0u8..6,
        ) {
            let other = (base + delta).rem_euclid(360.0);
            let a = shape(0, ShapeKind::from_index(kind_a).unwrap(), base);
            let b = shape(1, ShapeKind::from_index(kind_b).unwrap(), other);
            // Guard the float boundary: rem_euclid may land a hair inside 5°.
            prop_assume!(rotation_distance(base, other) >= 5.0);
            prop_assert!(!is_match(&a, &b));
        }
    }
}
