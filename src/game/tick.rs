//! Countdown Tick
//!
//! The only autonomous input to a session. The host calls this once per
//! second; it does nothing outside the Playing phase.

use crate::game::events::SessionEvent;
use crate::game::state::{Phase, SessionState};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<SessionEvent>,
    /// Whether the attempt ended this tick
    pub session_ended: bool,
}

/// Run one countdown step.
///
/// Decrements the clock; reaching zero moves the session to Failed within
/// the same call, so no later player action can observe a zero clock while
/// still Playing.
pub fn tick(state: &mut SessionState) -> TickResult {
    let mut result = TickResult::default();

    if state.phase != Phase::Playing {
        return result;
    }

    state.time_remaining_seconds = state.time_remaining_seconds.saturating_sub(1);
    result.events.push(SessionEvent::ClockTicked {
        time_remaining_seconds: state.time_remaining_seconds,
    });

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(time_remaining = state.time_remaining_seconds, "clock tick");

    if state.time_remaining_seconds == 0 {
        state.phase = Phase::Failed;
        state.selected = None;
        result.events.push(SessionEvent::phase_changed(Phase::Playing, Phase::Failed));
        result.session_ended = true;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;
    use crate::game::level::{LevelDefinition, ShapeKind};

    fn state(time_limit: u32, phase: Phase) -> SessionState {
        let level = LevelDefinition::new(1, 2, time_limit, 0, vec![ShapeKind::Circle]).unwrap();
        let mut state = SessionState::new([0; 16], 0, level, Board::default(), 3);
        state.phase = phase;
        state
    }

    #[test]
    fn test_tick_counts_down() {
        let mut state = state(10, Phase::Playing);

        let result = tick(&mut state);

        assert_eq!(state.time_remaining_seconds, 9);
        assert!(!result.session_ended);
        assert_eq!(result.events, vec![SessionEvent::ClockTicked { time_remaining_seconds: 9 }]);
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        for phase in [Phase::Ready, Phase::Paused, Phase::Completed, Phase::Failed] {
            let mut state = state(10, phase);
            let result = tick(&mut state);
            assert_eq!(state.time_remaining_seconds, 10);
            assert!(result.events.is_empty());
            assert_eq!(state.phase, phase);
        }
    }

    #[test]
    fn test_expiry_fails_immediately() {
        let mut state = state(2, Phase::Playing);

        tick(&mut state);
        let result = tick(&mut state);

        assert_eq!(state.time_remaining_seconds, 0);
        assert_eq!(state.phase, Phase::Failed);
        assert!(result.session_ended);

        // Further ticks are inert
        let result = tick(&mut state);
        assert!(result.events.is_empty());
    }
}
