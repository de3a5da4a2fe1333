//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One event at a time, no clocks of its own
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod effects;
pub mod movement;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod target;
pub mod tick;

pub use autoplay::Autoplayer;
pub use effects::{Effect, EffectError, EffectKind, EffectRegistry};
pub use movement::move_targets;
pub use resolve::resolve;
pub use spawn::{roll, spawn_target, spawn_with};
pub use state::{EndReason, GameState, Outcome, SessionState, SessionStatus};
pub use target::{Action, RemovalCause, Target, TargetKind, TargetSet};
pub use tick::{SimEvent, StepResult, step};
