//! Rhythm Strike - lane-based reflex minigame timing engine
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (targets, movement, spawning, input resolution, effects)
//! - `scheduler`: Virtual-time periodic processes feeding the session queue
//! - `session`: Session controller / state machine owning all mutable state
//! - `tuning`: Data-driven game balance
//! - `settings`: Key bindings and player preferences

pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scheduler::{Process, Scheduler};
pub use session::{
    Dispatch, DropReason, Event, EventKind, RewardCallback, Session, SessionError, Snapshot,
};
pub use settings::{InputSource, KeyBindings, Settings, SettingsError};
pub use sim::{Action, EndReason, Outcome, SessionState, SessionStatus, Target, TargetKind};
pub use tuning::{KindStats, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Number of lanes (one per action)
    pub const LANE_COUNT: usize = 4;

    /// Movement cadence (~20 Hz)
    pub const MOVEMENT_INTERVAL_MS: u64 = 50;
    /// Spawn cadence (~0.67 Hz)
    pub const SPAWN_INTERVAL_MS: u64 = 1500;
    /// Countdown cadence (1 Hz)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
    /// Effect sweep cadence (~10 Hz)
    pub const EFFECT_SWEEP_INTERVAL_MS: u64 = 100;

    /// Session length in seconds
    pub const SESSION_SECS: u32 = 60;

    /// Lives
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    /// A bonus life is granted every N cumulative hits
    pub const BONUS_LIFE_EVERY: u32 = 10;

    /// Points per successful hit
    pub const SLASH_POINTS: u64 = 100;
    pub const PARRY_POINTS: u64 = 200;

    /// Reward = score / REWARD_SCORE_DIVISOR + hits * REWARD_PER_HIT
    pub const REWARD_SCORE_DIVISOR: u64 = 10;
    pub const REWARD_PER_HIT: u32 = 5;

    /// Play area (travel axis runs from PLAY_WIDTH toward 0)
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 400.0;

    /// Hit window on the travel axis (inclusive)
    pub const RANGE_NEAR: f32 = 80.0;
    pub const RANGE_FAR: f32 = 160.0;
    /// Unhit targets below this position count as a miss
    pub const MISS_THRESHOLD: f32 = 60.0;
    /// Anything below this position is cleaned up silently
    pub const OFFSCREEN_THRESHOLD: f32 = -50.0;

    /// Cosmetic effect lifetime
    pub const EFFECT_TTL_MS: u64 = 500;
    /// Maximum live effects
    pub const MAX_EFFECTS: usize = 64;
}

/// Vertical center of a lane's band when the play area is split into equal bands.
///
/// `lane` is 1-based.
#[inline]
pub fn lane_center_y(lane: u8, play_height: f32) -> f32 {
    let band = play_height / consts::LANE_COUNT as f32;
    (lane.saturating_sub(1)) as f32 * band + band / 2.0
}
