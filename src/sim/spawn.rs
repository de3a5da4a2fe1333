//! Spawn process: randomized targets entering at the far edge

use rand::Rng;

use super::state::{GameState, Outcome};
use super::target::{Action, TargetKind, TargetSet};
use crate::tuning::Tuning;

/// Draw a kind and an action uniformly from `rng`
pub fn roll<R: Rng>(rng: &mut R) -> (TargetKind, Action) {
    let kind = TargetKind::ALL[rng.random_range(0..TargetKind::ALL.len())];
    let action = Action::ALL[rng.random_range(0..Action::ALL.len())];
    (kind, action)
}

/// Insert one random target at the spawn edge. The lane follows from the action.
pub fn spawn_with<R: Rng>(targets: &mut TargetSet, rng: &mut R, tuning: &Tuning) -> Outcome {
    let (kind, action) = roll(rng);
    let id = targets.insert(action, kind, tuning.spawn_position, tuning);
    log::debug!("Spawned {:?} target {} in lane {}", kind, id, action.lane());
    Outcome::Spawned { id, action, kind }
}

/// Spawn tick using the session's seeded RNG
pub fn spawn_target(state: &mut GameState, tuning: &Tuning) -> Outcome {
    spawn_with(&mut state.targets, &mut state.rng, tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_at_far_edge_in_derived_lane() {
        let tuning = Tuning::default();
        let mut targets = TargetSet::new();
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..50 {
            let Outcome::Spawned { id, action, kind } = spawn_with(&mut targets, &mut rng, &tuning)
            else {
                panic!("expected spawn outcome");
            };
            let target = targets.get(id).unwrap();
            assert_eq!(target.lane, action.lane());
            assert_eq!(target.position, tuning.spawn_position);
            assert_eq!(target.speed, tuning.kind_stats(kind).speed);
            assert!(!target.in_range);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Pcg32::seed_from_u64(2024);
        let mut b = Pcg32::seed_from_u64(2024);
        let rolls_a: Vec<_> = (0..32).map(|_| roll(&mut a)).collect();
        let rolls_b: Vec<_> = (0..32).map(|_| roll(&mut b)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_all_kinds_and_actions_appear() {
        let mut rng = Pcg32::seed_from_u64(9);
        let rolls: Vec<_> = (0..400).map(|_| roll(&mut rng)).collect();
        for kind in TargetKind::ALL {
            assert!(rolls.iter().any(|(k, _)| *k == kind));
        }
        for action in Action::ALL {
            assert!(rolls.iter().any(|(_, a)| *a == action));
        }
    }
}
