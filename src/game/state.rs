//! Session State Definitions
//!
//! Everything the host can observe about one puzzle session, plus the
//! tunable engine constants.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::board::{Board, ShapeId};
use crate::game::level::LevelDefinition;
use crate::game::matching::ROTATION_TOLERANCE_DEG;
use crate::game::scoring::ScoringConfig;

/// Hints granted at the start of every attempt.
pub const INITIAL_HINTS: u32 = 3;

// =============================================================================
// PHASE
// =============================================================================

/// Current phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(u8)]
pub enum Phase {
    /// Board dealt, clock not running
    #[default]
    Ready = 0,
    /// Clock running, player actions accepted
    Playing = 1,
    /// Clock stopped, counters preserved
    Paused = 2,
    /// Board cleared with target score reached
    Completed = 3,
    /// Clock expired
    Failed = 4,
}

impl Phase {
    /// Completed and Failed end the attempt; only `reset` leaves them.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Engine constants for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hints granted per attempt
    pub initial_hints: u32,
    /// How long a hint highlight stays up (wall clock)
    pub hint_highlight: Duration,
    /// Rotation tolerance for a match (degrees, exclusive)
    pub rotation_tolerance_deg: f64,
    /// Degrees added per rotate action
    pub rotation_step_deg: f64,
    /// Points formula
    pub scoring: ScoringConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_hints: INITIAL_HINTS,
            hint_highlight: Duration::from_secs(1),
            rotation_tolerance_deg: ROTATION_TOLERANCE_DEG,
            rotation_step_deg: 90.0,
            scoring: ScoringConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Complete observable state of one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Session identifier
    pub session_id: [u8; 16],

    /// Seed of the board RNG (for verification)
    pub rng_seed: u64,

    /// Level being played
    pub level: LevelDefinition,

    /// Shapes for the current attempt
    pub board: Board,

    /// Accumulated score
    pub score: u32,

    /// Rotations plus match attempts
    pub moves_count: u32,

    /// Pairs matched this attempt
    pub matched_pairs: u32,

    /// Consecutive successful matches
    pub combo_streak: u32,

    /// Hints left this attempt
    pub hints_remaining: u32,

    /// Countdown, in seconds
    pub time_remaining_seconds: u32,

    /// First shape of a pending match attempt
    pub selected: Option<ShapeId>,

    /// Current phase
    pub phase: Phase,
}

impl SessionState {
    /// Create a fresh Ready state for `level`.
    pub fn new(
        session_id: [u8; 16],
        rng_seed: u64,
        level: LevelDefinition,
        board: Board,
        hints: u32,
    ) -> Self {
        let time_remaining_seconds = level.time_limit_seconds;
        Self {
            session_id,
            rng_seed,
            level,
            board,
            score: 0,
            moves_count: 0,
            matched_pairs: 0,
            combo_streak: 0,
            hints_remaining: hints,
            time_remaining_seconds,
            selected: None,
            phase: Phase::Ready,
        }
    }

    /// Start a new attempt on `board`, keeping the level.
    pub fn restart(&mut self, board: Board, hints: u32) {
        self.board = board;
        self.score = 0;
        self.moves_count = 0;
        self.matched_pairs = 0;
        self.combo_streak = 0;
        self.hints_remaining = hints;
        self.time_remaining_seconds = self.level.time_limit_seconds;
        self.selected = None;
        self.phase = Phase::Ready;
    }

    /// Board fully matched and target reached.
    pub fn is_complete(&self) -> bool {
        self.board.all_matched() && self.score >= self.level.target_score
    }

    /// Check if the attempt has ended.
    pub fn is_ended(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(&self.session_id, self.rng_seed, |hasher| {
            hasher.update_u32(self.level.id);

            // BTreeMap guarantees id order
            for shape in self.board.shapes.values() {
                hasher.update_u32(shape.id.0);
                hasher.update_u8(shape.kind as u8);
                hasher.update_f64(shape.rotation_degrees);
                hasher.update_u32(shape.position.row);
                hasher.update_u32(shape.position.col);
                hasher.update_bool(shape.matched);
            }

            hasher.update_u32(self.score);
            hasher.update_u32(self.moves_count);
            hasher.update_u32(self.matched_pairs);
            hasher.update_u32(self.combo_streak);
            hasher.update_u32(self.hints_remaining);
            hasher.update_u32(self.time_remaining_seconds);
            hasher.update_opt_u32(self.selected.map(|id| id.0));
            hasher.update_u8(self.phase as u8);
        })
    }
}
