//! Single-event simulation step
//!
//! Every mutation of [`GameState`] goes through [`step`], one event at a
//! time, so "read targets → decide → mutate" is always atomic.

use serde::{Deserialize, Serialize};

use super::movement::move_targets;
use super::resolve::resolve;
use super::spawn::spawn_target;
use super::state::{EndReason, GameState, Outcome};
use super::target::Action;
use crate::tuning::Tuning;

/// Work items processed by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Movement tick
    Move,
    /// Spawn tick
    Spawn,
    /// One second of countdown
    Countdown,
    /// Expire old effects
    SweepEffects,
    /// Player action
    Input(Action),
}

/// Result of one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    pub outcomes: Vec<Outcome>,
    /// Set when this step hit a terminal condition
    pub ended: Option<EndReason>,
}

/// Apply one event to a running game.
///
/// The caller guarantees the session is Running; terminal conditions are
/// reported, not acted on.
pub fn step(state: &mut GameState, event: SimEvent, tuning: &Tuning) -> StepResult {
    let outcomes = match event {
        SimEvent::Move => move_targets(state, tuning),
        SimEvent::Spawn => vec![spawn_target(state, tuning)],
        SimEvent::Countdown => {
            state.session.remaining_time = state.session.remaining_time.saturating_sub(1);
            Vec::new()
        }
        SimEvent::SweepEffects => {
            let removed = state.effects.sweep(state.now_ms, tuning.effect_ttl_ms);
            if removed > 0 {
                log::trace!("Swept {} effects", removed);
            }
            Vec::new()
        }
        SimEvent::Input(action) => resolve(state, action, tuning).into_iter().collect(),
    };

    StepResult {
        outcomes,
        ended: terminal_condition(state),
    }
}

/// Lives are checked before time; both are already clamped
fn terminal_condition(state: &GameState) -> Option<EndReason> {
    if state.session.lives == 0 {
        Some(EndReason::LivesExhausted)
    } else if state.session.remaining_time == 0 {
        Some(EndReason::TimeUp)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TargetKind;

    fn running_state() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(12345, &tuning);
        state.reset_for_run(12345, &tuning);
        (state, tuning)
    }

    #[test]
    fn test_countdown_ends_at_zero() {
        let (mut state, tuning) = running_state();
        for _ in 1..tuning.session_secs {
            assert_eq!(step(&mut state, SimEvent::Countdown, &tuning).ended, None);
        }
        let result = step(&mut state, SimEvent::Countdown, &tuning);
        assert_eq!(result.ended, Some(EndReason::TimeUp));
        assert_eq!(state.session.remaining_time, 0);
    }

    #[test]
    fn test_last_life_lost_ends_session() {
        let (mut state, tuning) = running_state();
        state.session.lives = 1;
        state
            .targets
            .insert(Action::SlashBlue, TargetKind::Normal, 61.0, &tuning);
        let result = step(&mut state, SimEvent::Move, &tuning);
        assert_eq!(result.ended, Some(EndReason::LivesExhausted));
    }

    #[test]
    fn test_sweep_uses_event_time() {
        let (mut state, tuning) = running_state();
        state
            .targets
            .insert(Action::ParryRed, TargetKind::Normal, 100.0, &tuning);
        state.now_ms = 1_000;
        step(&mut state, SimEvent::Input(Action::ParryRed), &tuning);
        assert_eq!(state.effects.len(), 1);

        state.now_ms = 1_500;
        step(&mut state, SimEvent::SweepEffects, &tuning);
        assert_eq!(state.effects.len(), 1);

        state.now_ms = 1_600;
        step(&mut state, SimEvent::SweepEffects, &tuning);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let (mut state1, tuning) = running_state();
        let (mut state2, _) = running_state();

        let events = [
            SimEvent::Spawn,
            SimEvent::Move,
            SimEvent::Spawn,
            SimEvent::Move,
            SimEvent::Input(Action::SlashBlue),
            SimEvent::Spawn,
        ];
        for event in events {
            let a = step(&mut state1, event, &tuning);
            let b = step(&mut state2, event, &tuning);
            assert_eq!(a, b);
        }
        let ids1: Vec<_> = state1.targets.iter().cloned().collect();
        let ids2: Vec<_> = state2.targets.iter().cloned().collect();
        assert_eq!(ids1, ids2);
    }
}
