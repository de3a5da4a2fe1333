//! Idle/demo mode - a scripted player
//!
//! Presses the correct action for the currently selected target with a given
//! accuracy; otherwise it hesitates and lets the target run out.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::target::{Action, TargetSet};

/// Seeded imperfect player
#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    /// Probability of pressing when a target is selectable (0..=1)
    accuracy: f64,
    /// Last target judged, so each target is only rolled once
    last_judged: Option<u32>,
}

impl Autoplayer {
    pub fn new(seed: u64, accuracy: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            last_judged: None,
        }
    }

    /// Decide what to press this frame
    pub fn decide(&mut self, targets: &TargetSet) -> Option<Action> {
        let target = targets.select()?;
        if self.last_judged == Some(target.id) {
            return None;
        }
        self.last_judged = Some(target.id);
        self.rng
            .random_bool(self.accuracy)
            .then_some(target.required_action)
    }
}
