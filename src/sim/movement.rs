//! Movement process: advance targets, apply miss penalties, despawn

use super::state::{GameState, Outcome};
use super::target::RemovalCause;
use crate::tuning::Tuning;

/// One movement tick.
///
/// Targets move first, then everything past a boundary is removed in
/// insertion order. A target taken by the resolver is already gone from the
/// set, so it can never be visited here again.
pub fn move_targets(state: &mut GameState, tuning: &Tuning) -> Vec<Outcome> {
    state.targets.advance_all(tuning);

    let mut outcomes = Vec::new();
    for (target, cause) in state.targets.drain_expired(tuning) {
        match cause {
            RemovalCause::Missed => {
                state.session.lose_life();
                log::debug!(
                    "Missed target {} ({}), lives now {}",
                    target.id,
                    target.required_action.as_str(),
                    state.session.lives
                );
                outcomes.push(Outcome::Missed {
                    id: target.id,
                    action: target.required_action,
                });
            }
            RemovalCause::Offscreen => {
                outcomes.push(Outcome::Offscreen { id: target.id });
            }
        }
    }
    outcomes
}
