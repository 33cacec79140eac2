//! Puzzle Session State Machine
//!
//! Owns one attempt at a level: the board, the counters, the countdown and
//! the hint highlight. Every player action is phase-guarded and total: an
//! action outside its phase, or naming a shape that is not on the board,
//! is recorded and otherwise ignored. Ticks are recorded only while the
//! clock runs.
//!
//! ```text
//!   Ready ──start──▶ Playing ──pause──▶ Paused
//!                     │  ▲                 │
//!                     │  └─────resume──────┘
//!                     ├──clock hits 0──▶ Failed
//!                     └──board cleared──▶ Completed
//!   any phase ──reset──▶ Ready (fresh board)
//! ```

use std::time::Duration;
use tracing::{debug, info};

use crate::core::hash::StateHash;
use crate::core::rng::{DeterministicRng, FULL_TURN_DEG, RandomSource};
use crate::game::action::{PlayerAction, SessionTranscript, TRANSCRIPT_VERSION};
use crate::game::board::{generate, ShapeId};
use crate::game::events::SessionEvent;
use crate::game::hint::{use_hint, HintHighlight};
use crate::game::level::{LevelDefinition, LevelError};
use crate::game::matching::is_match_within;
use crate::game::scoring::on_match;
use crate::game::state::{Phase, SessionConfig, SessionState};
use crate::game::tick::{tick, TickResult};
use crate::host::catalog::LevelCatalog;
use crate::host::progress::ProgressStore;

/// A single player's session on one level.
///
/// The progress store is injected and only called when an attempt
/// completes. Randomness comes from `R`, which makes boards reproducible
/// in tests.
pub struct PuzzleSession<S: ProgressStore, R: RandomSource = DeterministicRng> {
    state: SessionState,
    config: SessionConfig,
    rng: R,
    store: S,
    /// Next shape id; never rewinds, so ids are unique across resets
    next_shape_id: u32,
    /// Whether completing this level advances the unlock frontier
    unlocks_next: bool,
    highlight: Option<HintHighlight>,
    pending_events: Vec<SessionEvent>,
    actions: Vec<PlayerAction>,
}

impl<S: ProgressStore> PuzzleSession<S, DeterministicRng> {
    /// Open a session with default config and a seeded RNG.
    pub fn with_seed(
        level: LevelDefinition,
        store: S,
        session_id: [u8; 16],
        seed: u64,
    ) -> Result<Self, LevelError> {
        Self::new(level, SessionConfig::default(), store, DeterministicRng::new(seed), session_id)
    }
}

impl<S: ProgressStore, R: RandomSource> PuzzleSession<S, R> {
    /// Open a session on `level` in the Ready phase with a freshly dealt board.
    pub fn new(
        level: LevelDefinition,
        config: SessionConfig,
        store: S,
        mut rng: R,
        session_id: [u8; 16],
    ) -> Result<Self, LevelError> {
        level.validate()?;

        let mut next_shape_id = 0;
        let board = generate(&level, &mut rng, &mut next_shape_id);
        let shape_count = board.len() as u32;

        debug!(
            "Opened level {} ({}x{}, {} shapes)",
            level.id, level.grid_size, level.grid_size, shape_count
        );

        let state = SessionState::new(session_id, rng.seed(), level, board, config.initial_hints);

        Ok(Self {
            state,
            config,
            rng,
            store,
            next_shape_id,
            unlocks_next: true,
            highlight: None,
            pending_events: vec![SessionEvent::BoardDealt { shape_count }],
            actions: Vec::new(),
        })
    }

    /// Open level `level_id` from a catalog.
    ///
    /// Completing the catalog's last level does not advance the unlock
    /// frontier.
    pub fn from_catalog<C: LevelCatalog + ?Sized>(
        catalog: &C,
        level_id: u32,
        config: SessionConfig,
        store: S,
        rng: R,
        session_id: [u8; 16],
    ) -> Result<Self, LevelError> {
        let level = catalog
            .level(level_id)
            .cloned()
            .ok_or(LevelError::UnknownLevel(level_id))?;
        let mut session = Self::new(level, config, store, rng, session_id)?;
        session.unlocks_next = catalog.has_next(level_id);
        Ok(session)
    }

    /// Override whether completing this level advances the unlock frontier.
    pub fn set_unlocks_next(&mut self, unlocks_next: bool) {
        self.unlocks_next = unlocks_next;
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Read-only view for rendering.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Engine constants in effect.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The injected progress store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the session, returning the progress store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Pending hint highlight, if one is showing.
    pub fn highlight(&self) -> Option<&HintHighlight> {
        self.highlight.as_ref()
    }

    /// Every action applied so far.
    pub fn actions(&self) -> &[PlayerAction] {
        &self.actions
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    /// Snapshot the recorded actions for later replay.
    ///
    /// Replays rebuild the board with [`DeterministicRng`], so they only
    /// reproduce sessions that were opened with one.
    pub fn transcript(&self) -> SessionTranscript {
        SessionTranscript {
            version: TRANSCRIPT_VERSION,
            session_id: self.state.session_id,
            rng_seed: self.state.rng_seed,
            level: self.state.level.clone(),
            config: self.config.clone(),
            actions: self.actions.clone(),
            final_hash: self.compute_hash(),
        }
    }

    // =========================================================================
    // Player actions
    // =========================================================================

    /// Apply a recorded action. Returns whether it took effect.
    pub fn apply(&mut self, action: PlayerAction) -> bool {
        match action {
            PlayerAction::Start => self.start(),
            PlayerAction::Pause => self.pause(),
            PlayerAction::Resume => self.resume(),
            PlayerAction::Reset => self.reset(),
            PlayerAction::Select(id) => self.select_shape(id),
            PlayerAction::Rotate(id) => self.rotate_shape(id),
            PlayerAction::UseHint => self.use_hint(),
            PlayerAction::Tick => self.advance_clock(),
        }
    }

    /// Ready → Playing. Starts the countdown.
    pub fn start(&mut self) -> bool {
        self.actions.push(PlayerAction::Start);
        if self.state.phase != Phase::Ready {
            return false;
        }
        self.set_phase(Phase::Playing);
        true
    }

    /// Playing → Paused. Stops the countdown; counters are preserved.
    pub fn pause(&mut self) -> bool {
        self.actions.push(PlayerAction::Pause);
        if self.state.phase != Phase::Playing {
            return false;
        }
        self.set_phase(Phase::Paused);
        true
    }

    /// Paused → Playing. The countdown continues from where it stopped.
    pub fn resume(&mut self) -> bool {
        self.actions.push(PlayerAction::Resume);
        if self.state.phase != Phase::Paused {
            return false;
        }
        self.set_phase(Phase::Playing);
        true
    }

    /// Any phase → Ready with a fresh board and every counter restored.
    ///
    /// Cancels a pending hint highlight since its target belongs to the old
    /// board.
    pub fn reset(&mut self) -> bool {
        self.actions.push(PlayerAction::Reset);

        let board = generate(&self.state.level, &mut self.rng, &mut self.next_shape_id);
        let shape_count = board.len() as u32;
        let from = self.state.phase;

        self.state.restart(board, self.config.initial_hints);
        self.highlight = None;

        if from != Phase::Ready {
            self.pending_events.push(SessionEvent::phase_changed(from, Phase::Ready));
        }
        self.pending_events.push(SessionEvent::BoardDealt { shape_count });

        debug!("Level {} reset from {:?}", self.state.level.id, from);
        true
    }

    /// Select a shape, or complete a match attempt if one is already selected.
    ///
    /// - nothing selected: `id` becomes selected (free)
    /// - `id` already selected: deselect (free, no evaluation)
    /// - otherwise: costs a move, evaluates the pair, clears the selection
    ///
    /// Matched shapes are inert and cannot be selected.
    pub fn select_shape(&mut self, id: ShapeId) -> bool {
        self.actions.push(PlayerAction::Select(id));
        if self.state.phase != Phase::Playing || !self.is_selectable(id) {
            return false;
        }

        match self.state.selected {
            None => {
                self.state.selected = Some(id);
                self.pending_events.push(SessionEvent::ShapeSelected { shape_id: id });
            }
            Some(prev) if prev == id => {
                self.state.selected = None;
                self.pending_events.push(SessionEvent::SelectionCleared { shape_id: id });
            }
            Some(prev) => {
                self.state.selected = None;
                self.attempt_match(prev, id);
            }
        }
        true
    }

    /// Rotate a shape by one step, costing a move.
    ///
    /// A rotation that reaches or passes a full turn lands on exactly 0.
    pub fn rotate_shape(&mut self, id: ShapeId) -> bool {
        self.actions.push(PlayerAction::Rotate(id));
        if self.state.phase != Phase::Playing || !self.is_selectable(id) {
            return false;
        }

        let step = self.config.rotation_step_deg;
        let Some(shape) = self.state.board.get_mut(id) else {
            return false;
        };
        let mut rotation = shape.rotation_degrees + step;
        if rotation >= FULL_TURN_DEG {
            rotation = 0.0;
        }
        shape.rotation_degrees = rotation;
        self.state.moves_count += 1;

        self.pending_events.push(SessionEvent::ShapeRotated {
            shape_id: id,
            rotation_degrees: rotation,
        });
        true
    }

    /// Spend a hint and raise a highlight.
    ///
    /// No-op unless Playing with hints left. A new hint replaces any
    /// highlight still showing.
    pub fn use_hint(&mut self) -> bool {
        self.actions.push(PlayerAction::UseHint);
        let Some(highlight) = use_hint(&mut self.state, &self.config) else {
            return false;
        };

        self.pending_events.push(SessionEvent::HintShown {
            target: highlight.target,
            hints_remaining: self.state.hints_remaining,
        });
        self.highlight = Some(highlight);

        debug!("Hint used, {} remaining", self.state.hints_remaining);
        true
    }

    // =========================================================================
    // Host-driven timers
    // =========================================================================

    /// Advance the countdown by one second.
    ///
    /// Returns every event generated since the last drain, including this
    /// tick's.
    pub fn tick(&mut self) -> TickResult {
        let session_ended = self.advance_clock() && self.state.phase == Phase::Failed;
        TickResult {
            events: self.take_events(),
            session_ended,
        }
    }

    /// Advance the hint highlight's wall clock.
    ///
    /// Runs regardless of phase; the highlight clears on its own schedule
    /// even after a pause or a terminal transition. Returns true if the
    /// highlight cleared during this call.
    pub fn advance_hint(&mut self, elapsed: Duration) -> bool {
        let Some(highlight) = self.highlight.as_mut() else {
            return false;
        };
        if !highlight.advance(elapsed) {
            return false;
        }

        self.highlight = None;
        self.pending_events.push(SessionEvent::HintCleared);
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Run the clock and queue its events. Returns whether it ran.
    ///
    /// Only ticks that moved the clock are recorded; a host ticking outside
    /// Playing leaves the action log untouched.
    fn advance_clock(&mut self) -> bool {
        let mut result = tick(&mut self.state);
        if result.events.is_empty() {
            return false;
        }
        self.actions.push(PlayerAction::Tick);

        if result.session_ended {
            info!(
                "Level {} failed: clock expired with score {} ({} pairs matched)",
                self.state.level.id, self.state.score, self.state.matched_pairs
            );
        }

        self.pending_events.append(&mut result.events);
        true
    }

    fn is_selectable(&self, id: ShapeId) -> bool {
        self.state.board.get(id).is_some_and(|s| !s.matched)
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        self.state.phase = to;
        self.pending_events.push(SessionEvent::phase_changed(from, to));
        debug!("Level {} phase {:?} -> {:?}", self.state.level.id, from, to);
    }

    fn attempt_match(&mut self, first: ShapeId, second: ShapeId) {
        self.state.moves_count += 1;

        let matched = match (self.state.board.get(first), self.state.board.get(second)) {
            (Some(a), Some(b)) => is_match_within(a, b, self.config.rotation_tolerance_deg),
            _ => false,
        };

        if !matched {
            self.state.combo_streak = 0;
            self.pending_events.push(SessionEvent::MatchMissed { first, second });
            return;
        }

        let award = on_match(&self.state, &self.config.scoring);
        for id in [first, second] {
            if let Some(shape) = self.state.board.get_mut(id) {
                shape.matched = true;
            }
        }
        self.state.combo_streak = award.new_combo;
        self.state.score = self.state.score.saturating_add(award.points);
        self.state.matched_pairs += 1;

        self.pending_events.push(SessionEvent::MatchMade {
            first,
            second,
            award,
            new_score: self.state.score,
        });
        debug!(
            "Match {:?}+{:?} for {} points (combo {})",
            first, second, award.points, award.new_combo
        );

        if self.state.is_complete() {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.set_phase(Phase::Completed);

        let level_id = self.state.level.id;
        let score = self.state.score;
        self.store.complete_level(level_id, score);
        if self.unlocks_next {
            self.store.unlock_next_level();
        }

        self.pending_events.push(SessionEvent::LevelRecorded {
            level_id,
            score,
            unlocked_next: self.unlocks_next,
        });
        info!("Level {} completed with score {} in {} moves", level_id, score, self.state.moves_count);
    }
}
