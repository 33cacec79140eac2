//! # Whirljig Engine
//!
//! Deterministic puzzle session engine for Whirljig, a timed shape-matching
//! game. Players pair shapes of the same kind whose rotations agree, racing
//! a countdown to reach the level's target score.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WHIRLJIG ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Session logic (deterministic)             │
//! │  ├── level.rs    - Level definitions                         │
//! │  ├── board.rs    - Board generation                          │
//! │  ├── matching.rs - Rotation-tolerant match rule              │
//! │  ├── scoring.rs  - Match scoring                             │
//! │  ├── hint.rs     - Hints and highlight timer                 │
//! │  ├── session.rs  - Phase state machine                       │
//! │  └── action.rs   - Transcripts and replay                    │
//! │                                                              │
//! │  host/           - Collaborators owned by the host           │
//! │  ├── catalog.rs  - Level catalog                             │
//! │  └── progress.rs - Progress store                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same level, seed and action sequence, a session reaches the
//! same state hash on any platform:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time in session logic; the host drives both timers
//! - All randomness from seeded Xorshift128+

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod host;

// Re-export commonly used types
pub use core::rng::{DeterministicRng, RandomSource};
pub use game::level::{LevelDefinition, ShapeKind};
pub use game::session::PuzzleSession;
pub use game::state::{Phase, SessionConfig, SessionState};
pub use host::{Catalog, InMemoryProgress, LevelCatalog, ProgressStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Countdown resolution: the host calls `tick` once per this many seconds.
pub const TICK_INTERVAL_SECS: u64 = 1;
