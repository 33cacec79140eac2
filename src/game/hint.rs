//! Hint Mechanics
//!
//! Hints are a depletable per-attempt resource. Using one raises a
//! highlight over an unmatched pair that clears itself after a fixed
//! wall-clock duration, independent of the game countdown.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::game::board::{Board, ShapeId};
use crate::game::matching::is_match_within;
use crate::game::state::{Phase, SessionConfig, SessionState};

/// A pending hint highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintHighlight {
    /// Pair being highlighted; `None` when no unmatched pair remains
    pub target: Option<(ShapeId, ShapeId)>,
    /// Time until the highlight clears
    pub remaining: Duration,
}

impl HintHighlight {
    /// Advance the highlight timer. Returns true once it has expired.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining.is_zero()
    }
}

/// Pick the pair to highlight.
///
/// Takes the lowest-id unmatched shape that has an unmatched partner of the
/// same kind. Prefers a partner that already matches it by rotation,
/// otherwise the lowest-id partner of that kind.
pub fn pick_hint_target(board: &Board, tolerance_deg: f64) -> Option<(ShapeId, ShapeId)> {
    for first in board.unmatched() {
        let mut fallback = None;
        for other in board.unmatched() {
            if other.id == first.id || other.kind != first.kind {
                continue;
            }
            if is_match_within(first, other, tolerance_deg) {
                return Some((first.id, other.id));
            }
            fallback.get_or_insert(other.id);
        }
        if let Some(partner) = fallback {
            return Some((first.id, partner));
        }
    }
    None
}

/// Spend a hint.
///
/// Ignored (returns `None`) unless the session is Playing with hints left.
/// Costs no score and no moves.
pub fn use_hint(state: &mut SessionState, config: &SessionConfig) -> Option<HintHighlight> {
    if state.phase != Phase::Playing || state.hints_remaining == 0 {
        return None;
    }

    state.hints_remaining -= 1;

    Some(HintHighlight {
        target: pick_hint_target(&state.board, config.rotation_tolerance_deg),
        remaining: config.hint_highlight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use crate::game::board::{Position, ShapeInstance};
    use crate::game::level::{LevelDefinition, ShapeKind};

    fn board(shapes: &[(u32, ShapeKind, f64, bool)]) -> Board {
        let mut map = BTreeMap::new();
        for (i, (id, kind, rot, matched)) in shapes.iter().enumerate() {
            map.insert(ShapeId(*id), ShapeInstance {
                id: ShapeId(*id),
                kind: *kind,
                rotation_degrees: *rot,
                position: Position::new(0, i as u32),
                matched: *matched,
            });
        }
        Board { grid_size: 2, shapes: map, empty_cell: None }
    }

    fn playing_state(board: Board, hints: u32) -> SessionState {
        let level = LevelDefinition::new(1, 2, 60, 0, vec![ShapeKind::Circle]).unwrap();
        let mut state = SessionState::new([0; 16], 0, level, board, hints);
        state.phase = Phase::Playing;
        state
    }

    #[test]
    fn test_prefers_rotation_match() {
        let board = board(&[
            (0, ShapeKind::Circle, 10.0, false),
            (1, ShapeKind::Circle, 200.0, false),
            (2, ShapeKind::Circle, 12.0, false),
            (3, ShapeKind::Circle, 90.0, false),
        ]);
        assert_eq!(pick_hint_target(&board, 5.0), Some((ShapeId(0), ShapeId(2))));
    }

    #[test]
    fn test_falls_back_to_same_kind() {
        let board = board(&[
            (0, ShapeKind::Square, 10.0, false),
            (1, ShapeKind::Circle, 10.0, false),
            (2, ShapeKind::Square, 100.0, false),
            (3, ShapeKind::Circle, 50.0, false),
        ]);
        assert_eq!(pick_hint_target(&board, 5.0), Some((ShapeId(0), ShapeId(2))));
    }

    #[test]
    fn test_skips_matched_shapes() {
        let board = board(&[
            (0, ShapeKind::Square, 10.0, true),
            (1, ShapeKind::Square, 10.0, true),
            (2, ShapeKind::Diamond, 100.0, false),
            (3, ShapeKind::Diamond, 50.0, false),
        ]);
        assert_eq!(pick_hint_target(&board, 5.0), Some((ShapeId(2), ShapeId(3))));
    }

    #[test]
    fn test_no_target_when_cleared() {
        let board = board(&[
            (0, ShapeKind::Square, 10.0, true),
            (1, ShapeKind::Square, 10.0, true),
        ]);
        assert_eq!(pick_hint_target(&board, 5.0), None);
    }

    #[test]
    fn test_use_hint_decrements() {
        let mut state = playing_state(board(&[
            (0, ShapeKind::Circle, 0.0, false),
            (1, ShapeKind::Circle, 0.0, false),
        ]), 3);

        let highlight = use_hint(&mut state, &SessionConfig::default()).unwrap();

        assert_eq!(state.hints_remaining, 2);
        assert_eq!(highlight.remaining, Duration::from_secs(1));
        assert_eq!(highlight.target, Some((ShapeId(0), ShapeId(1))));
        assert_eq!(state.score, 0);
        assert_eq!(state.moves_count, 0);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_use_hint_exhausted() {
        let mut state = playing_state(Board::default(), 0);
        assert!(use_hint(&mut state, &SessionConfig::default()).is_none());
        assert_eq!(state.hints_remaining, 0);
    }

    #[test]
    fn test_use_hint_requires_playing() {
        let mut state = playing_state(Board::default(), 3);
        state.phase = Phase::Paused;
        assert!(use_hint(&mut state, &SessionConfig::default()).is_none());
        assert_eq!(state.hints_remaining, 3);
    }

    #[test]
    fn test_highlight_expires() {
        let mut highlight = HintHighlight {
            target: None,
            remaining: Duration::from_millis(1000),
        };
        assert!(!highlight.advance(Duration::from_millis(400)));
        assert!(!highlight.advance(Duration::from_millis(400)));
        assert!(highlight.advance(Duration::from_millis(400)));
        assert!(highlight.remaining.is_zero());
    }
}
