//! Game state and core simulation types
//!
//! Everything a running session mutates lives in [`GameState`]; the session
//! controller owns it and hands it to one process at a time.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::EffectRegistry;
use super::target::{Action, TargetKind, TargetSet};
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Opened, not started yet
    #[default]
    Idle,
    /// Timers armed, accepting input
    Running,
    /// Session over (terminal until the next explicit start)
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Lives reached zero
    LivesExhausted,
    /// Countdown reached zero
    TimeUp,
    /// Host tore the session down mid-run (no reward)
    Aborted,
}

impl EndReason {
    /// Whether this ending pays out a reward
    pub fn pays_reward(self) -> bool {
        !matches!(self, EndReason::Aborted)
    }
}

/// Player-facing counters for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Always within [0, max_lives]
    pub lives: u8,
    pub score: u64,
    pub hit_count: u32,
    /// Seconds left on the countdown
    pub remaining_time: u32,
    pub end_reason: Option<EndReason>,
    /// Reward delivered to the host (set at most once per session)
    pub reward: Option<u32>,
}

impl SessionState {
    /// Fresh counters for a new session (status stays Idle until started)
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            status: SessionStatus::Idle,
            lives: tuning.starting_lives.min(tuning.max_lives),
            score: 0,
            hit_count: 0,
            remaining_time: tuning.session_secs,
            end_reason: None,
            reward: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Lose one life (floored at zero)
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Gain one life (capped)
    pub fn gain_life(&mut self, max_lives: u8) {
        self.lives = self.lives.saturating_add(1).min(max_lives);
    }

    /// Reward owed for the current score and hit count
    pub fn compute_reward(&self, tuning: &Tuning) -> u32 {
        let from_score = self.score / tuning.reward_score_divisor.max(1);
        let from_hits = u64::from(self.hit_count) * u64::from(tuning.reward_per_hit);
        u32::try_from(from_score + from_hits).unwrap_or(u32::MAX)
    }
}

/// Something observable that happened while processing an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Spawned {
        id: u32,
        action: Action,
        kind: TargetKind,
    },
    Hit {
        id: u32,
        action: Action,
        points: u64,
        /// A bonus life was granted by this hit
        bonus_life: bool,
    },
    Missed {
        id: u32,
        action: Action,
    },
    Offscreen {
        id: u32,
    },
    GameOver {
        reason: EndReason,
        reward: Option<u32>,
    },
}

impl Outcome {
    /// Target removed by this outcome, if any
    pub fn removed_target(&self) -> Option<u32> {
        match self {
            Outcome::Hit { id, .. } | Outcome::Missed { id, .. } | Outcome::Offscreen { id } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

/// Complete mutable game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the spawn RNG was created from
    pub seed: u64,
    /// Spawn RNG
    pub rng: Pcg32,
    pub session: SessionState,
    pub targets: TargetSet,
    pub effects: EffectRegistry,
    /// Virtual time of the event currently being processed
    pub now_ms: u64,
}

impl GameState {
    /// Create a new idle game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: SessionState::new(tuning),
            targets: TargetSet::new(),
            effects: EffectRegistry::new(tuning.max_effects),
            now_ms: 0,
        }
    }

    /// Reinitialize every field for a fresh run (status becomes Running)
    pub fn reset_for_run(&mut self, seed: u64, tuning: &Tuning) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.session = SessionState::new(tuning);
        self.session.status = SessionStatus::Running;
        self.targets.clear();
        self.effects.clear();
    }
}
