//! Input resolution
//!
//! A press is judged against a single candidate: the eligible target closest
//! to the miss boundary. Pressing the wrong action is silent and costs nothing.

use glam::Vec2;

use super::effects::EffectKind;
use super::state::{GameState, Outcome};
use super::target::Action;
use crate::tuning::Tuning;

/// Resolve one player action. Returns `None` when nothing changed.
pub fn resolve(state: &mut GameState, action: Action, tuning: &Tuning) -> Option<Outcome> {
    let candidate = state.targets.select()?;
    if candidate.required_action != action {
        log::trace!(
            "{} pressed, closest target wants {}",
            action.as_str(),
            candidate.required_action.as_str()
        );
        return None;
    }

    let id = candidate.id;
    let mut target = state.targets.take(id)?;
    target.hit = true;

    let points = if action.is_parry() {
        tuning.parry_points
    } else {
        tuning.slash_points
    };
    let session = &mut state.session;
    session.score += points;
    session.hit_count += 1;

    let bonus_life = session.hit_count % tuning.bonus_life_every == 0;
    if bonus_life {
        session.gain_life(tuning.max_lives);
    }

    spawn_effect(state, action, target.screen_pos());

    Some(Outcome::Hit {
        id,
        action,
        points,
        bonus_life,
    })
}

/// Cosmetic only: failures are logged and dropped
fn spawn_effect(state: &mut GameState, action: Action, position: Vec2) {
    if let Err(err) = state
        .effects
        .push(EffectKind::from(action), position, state.now_ms)
    {
        log::warn!("Dropping hit effect: {}", err);
    }
}
