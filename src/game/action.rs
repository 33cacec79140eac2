//! Player Actions and Transcripts
//!
//! Every host call on a session is recorded as a [`PlayerAction`]. A
//! [`SessionTranscript`] bundles those actions with the level, config and
//! seed, which is enough to rebuild the session bit-for-bit.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::StateHash;
use crate::core::rng::DeterministicRng;
use crate::game::board::ShapeId;
use crate::game::level::{LevelDefinition, LevelError};
use crate::game::session::PuzzleSession;
use crate::game::state::SessionConfig;
use crate::host::progress::InMemoryProgress;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// One host call on a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Ready → Playing
    Start,
    /// Playing → Paused
    Pause,
    /// Paused → Playing
    Resume,
    /// Fresh board, any phase
    Reset,
    /// Select (or match against the selection)
    Select(ShapeId),
    /// Rotate one step
    Rotate(ShapeId),
    /// Spend a hint
    UseHint,
    /// One second of countdown
    Tick,
}

/// Transcript errors.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// JSON encode/decode failed
    #[error("transcript json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encode/decode failed
    #[error("transcript binary error: {0}")]
    Binary(#[from] bincode::Error),

    /// Written by an incompatible engine
    #[error("transcript version {found} (expected {expected})")]
    VersionMismatch {
        /// Version this build reads
        expected: u8,
        /// Version found in the transcript
        found: u8,
    },

    /// Recorded level no longer validates
    #[error("transcript level invalid: {0}")]
    InvalidLevel(#[from] LevelError),

    /// Replay diverged from the recording
    #[error("replayed state hash does not match the recording")]
    HashMismatch,
}

/// Everything needed to replay a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionTranscript {
    /// Version for forward compatibility
    pub version: u8,
    /// Session identifier
    pub session_id: [u8; 16],
    /// Board RNG seed
    pub rng_seed: u64,
    /// Level played
    pub level: LevelDefinition,
    /// Engine constants in effect
    pub config: SessionConfig,
    /// Every host call, in order
    pub actions: Vec<PlayerAction>,
    /// State hash after the last action
    pub final_hash: StateHash,
}

impl SessionTranscript {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, TranscriptError> {
        let transcript: Self = serde_json::from_str(s)?;
        transcript.check_version()?;
        Ok(transcript)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TranscriptError> {
        let transcript: Self = bincode::deserialize(data)?;
        transcript.check_version()?;
        Ok(transcript)
    }

    fn check_version(&self) -> Result<(), TranscriptError> {
        if self.version != TRANSCRIPT_VERSION {
            return Err(TranscriptError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Rebuild a session by replaying a transcript.
///
/// Progress is written to a fresh in-memory store so replays never touch
/// the player's real progress.
pub fn replay_session(
    transcript: &SessionTranscript,
) -> Result<PuzzleSession<InMemoryProgress>, TranscriptError> {
    let mut session = PuzzleSession::new(
        transcript.level.clone(),
        transcript.config.clone(),
        InMemoryProgress::new(),
        DeterministicRng::new(transcript.rng_seed),
        transcript.session_id,
    )?;

    for action in &transcript.actions {
        session.apply(*action);
    }

    Ok(session)
}

/// Replay a transcript and check it lands on the recorded hash.
pub fn verify_transcript(transcript: &SessionTranscript) -> Result<(), TranscriptError> {
    let session = replay_session(transcript)?;
    if session.compute_hash() != transcript.final_hash {
        return Err(TranscriptError::HashMismatch);
    }
    Ok(())
}
