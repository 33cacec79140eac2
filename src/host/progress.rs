//! Progress Store
//!
//! The session hands a level outcome to a [`ProgressStore`] exactly once,
//! when an attempt completes. Calls are fire-and-forget: the store is
//! assumed to succeed and the engine never retries.

use std::collections::{BTreeMap, BTreeSet};
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::debug;

/// Progress store contract consumed by the session.
pub trait ProgressStore {
    /// Record a completed level, merging the high score and adding to the total.
    fn complete_level(&mut self, level_id: u32, score: u32);

    /// Advance the unlocked-level frontier by one.
    fn unlock_next_level(&mut self);
}

impl<T: ProgressStore + ?Sized> ProgressStore for &mut T {
    fn complete_level(&mut self, level_id: u32, score: u32) {
        (**self).complete_level(level_id, score);
    }

    fn unlock_next_level(&mut self) {
        (**self).unlock_next_level();
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn complete_level(&mut self, level_id: u32, score: u32) {
        (**self).complete_level(level_id, score);
    }

    fn unlock_next_level(&mut self) {
        (**self).unlock_next_level();
    }
}

/// Player progress as plain data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Highest unlocked level id
    pub current_level: u32,
    /// Levels completed at least once
    pub completed_levels: BTreeSet<u32>,
    /// Best score per level
    pub high_scores: BTreeMap<u32, u32>,
    /// Sum of every completed attempt's score
    pub total_score: u64,
    /// When the last level was completed
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            current_level: 1,
            completed_levels: BTreeSet::new(),
            high_scores: BTreeMap::new(),
            total_score: 0,
            last_completed_at: None,
        }
    }
}

impl ProgressSnapshot {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// In-memory progress store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProgress {
    snapshot: ProgressSnapshot,
    completions: u32,
}

impl InMemoryProgress {
    /// Create an empty store (level 1 unlocked).
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a saved snapshot.
    pub fn from_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self { snapshot, completions: 0 }
    }

    /// Current progress.
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Best score for a level.
    pub fn high_score(&self, level_id: u32) -> Option<u32> {
        self.snapshot.high_scores.get(&level_id).copied()
    }

    /// Is a level playable yet?
    pub fn is_unlocked(&self, level_id: u32) -> bool {
        level_id >= 1 && level_id <= self.snapshot.current_level
    }

    /// Number of `complete_level` calls received by this instance.
    pub fn completions(&self) -> u32 {
        self.completions
    }
}

impl ProgressStore for InMemoryProgress {
    fn complete_level(&mut self, level_id: u32, score: u32) {
        let snapshot = &mut self.snapshot;
        snapshot.completed_levels.insert(level_id);
        snapshot.total_score += score as u64;
        let best = snapshot.high_scores.entry(level_id).or_insert(score);
        *best = (*best).max(score);
        snapshot.last_completed_at = Some(Utc::now());
        self.completions += 1;

        debug!(level_id, score, total = snapshot.total_score, "level completion recorded");
    }

    fn unlock_next_level(&mut self) {
        self.snapshot.current_level += 1;
        debug!(current_level = self.snapshot.current_level, "next level unlocked");
    }
}
