//! Game Logic Module
//!
//! Everything that runs inside a puzzle session. Deterministic given the
//! RNG seed and the action sequence.
//!
//! ## Module Structure
//!
//! - `level`: Level definitions and validation
//! - `board`: Shapes, grid positions, board generation
//! - `matching`: Rotation-tolerant match rule
//! - `scoring`: Points awarded per match
//! - `hint`: Hint spending and highlight timing
//! - `state`: Session state and engine constants
//! - `tick`: One-second countdown step
//! - `session`: Phase state machine and player actions
//! - `action`: Recorded actions, transcripts, replay
//! - `events`: Session events for the host UI

pub mod level;
pub mod board;
pub mod matching;
pub mod scoring;
pub mod hint;
pub mod state;
pub mod tick;
pub mod session;
pub mod action;
pub mod events;

// Re-export key types
pub use level::{Difficulty, LevelDefinition, LevelError, ShapeKind};
pub use board::{Board, Position, ShapeId, ShapeInstance};
pub use state::{Phase, SessionConfig, SessionState};
pub use session::PuzzleSession;
pub use action::{PlayerAction, SessionTranscript, TranscriptError};
pub use tick::TickResult;
pub use events::SessionEvent;
