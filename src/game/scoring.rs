//! Scoring and Combos
//!
//! A successful match is worth a base amount plus bonuses for time left,
//! for using few moves, and for the current combo streak.

use serde::{Serialize, Deserialize};

use crate::game::state::SessionState;

/// Scoring constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Flat points per match
    pub base_points: u32,
    /// Move bonus is `max(0, move_bonus_ceiling - moves)`
    pub move_bonus_ceiling: u32,
    /// Combo bonus per streak level
    pub combo_step: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: 10,
            move_bonus_ceiling: 50,
            combo_step: 5,
        }
    }
}

/// Points awarded for one match, with the terms that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAward {
    /// Flat points per match
    pub base: u32,
    /// Seconds left on the clock
    pub time_bonus: u32,
    /// Bonus for matching in few moves
    pub move_bonus: u32,
    /// Bonus for the streak, including this match
    pub combo_bonus: u32,
    /// Sum of all terms
    pub points: u32,
    /// Combo streak after this match
    pub new_combo: u32,
}

/// Compute the award for a confirmed match.
///
/// `state.moves_count` must already include the attempt being scored and
/// `state.combo_streak` must still hold the streak from before it.
pub fn on_match(state: &SessionState, config: &ScoringConfig) -> ScoreAward {
    let new_combo = state.combo_streak + 1;

    let base = config.base_points;
    let time_bonus = state.time_remaining_seconds;
    let move_bonus = config.move_bonus_ceiling.saturating_sub(state.moves_count);
    let combo_bonus = new_combo.saturating_mul(config.combo_step);

    let points = base
        .saturating_add(time_bonus)
        .saturating_add(move_bonus)
        .saturating_add(combo_bonus);

    ScoreAward {
        base,
        time_bonus,
        move_bonus,
        combo_bonus,
        points,
        new_combo,
    }
}
