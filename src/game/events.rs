//! Session Events
//!
//! Events generated by the session for the host to render, log or record.
//! Drained with `PuzzleSession::take_events`.

use serde::{Serialize, Deserialize};

use crate::game::board::ShapeId;
use crate::game::scoring::ScoreAward;
use crate::game::state::Phase;

/// Session event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Phase changed
    PhaseChanged {
        /// Previous phase
        from: Phase,
        /// New phase
        to: Phase,
    },

    /// A new board was dealt (open or reset)
    BoardDealt {
        /// Shapes on the new board
        shape_count: u32,
    },

    /// First shape of an attempt selected
    ShapeSelected {
        /// Selected shape
        shape_id: ShapeId,
    },

    /// Selected shape chosen again
    SelectionCleared {
        /// Shape that was deselected
        shape_id: ShapeId,
    },

    /// Match attempt succeeded
    MatchMade {
        /// Shape selected first
        first: ShapeId,
        /// Shape selected second
        second: ShapeId,
        /// Points breakdown
        award: ScoreAward,
        /// Score after the award
        new_score: u32,
    },

    /// Match attempt failed; combo reset
    MatchMissed {
        /// Shape selected first
        first: ShapeId,
        /// Shape selected second
        second: ShapeId,
    },

    /// Shape rotated
    ShapeRotated {
        /// Rotated shape
        shape_id: ShapeId,
        /// Rotation after the step
        rotation_degrees: f64,
    },

    /// Hint highlight raised
    HintShown {
        /// Highlighted pair, if any remains
        target: Option<(ShapeId, ShapeId)>,
        /// Hints left after this one
        hints_remaining: u32,
    },

    /// Hint highlight cleared itself
    HintCleared,

    /// Countdown advanced
    ClockTicked {
        /// Seconds left
        time_remaining_seconds: u32,
    },

    /// Outcome handed to the progress store
    LevelRecorded {
        /// Completed level
        level_id: u32,
        /// Final score
        score: u32,
        /// Whether the next level was unlocked
        unlocked_next: bool,
    },
}

impl SessionEvent {
    /// Create a phase change event.
    pub fn phase_changed(from: Phase, to: Phase) -> Self {
        SessionEvent::PhaseChanged { from, to }
    }

    /// Is this a phase change into a terminal phase?
    pub fn is_terminal_transition(&self) -> bool {
        matches!(self, SessionEvent::PhaseChanged { to, .. } if to.is_terminal())
    }
}
