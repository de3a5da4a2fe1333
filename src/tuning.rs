//! Data-driven game balance
//!
//! Every cadence, threshold and payout the simulation reads lives here so a
//! host can ship alternative balance as JSON without touching code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::TargetKind;

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("inconsistent tuning: {0}")]
    Inconsistent(&'static str),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Speed/size for one target kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    /// Travel per movement tick
    pub speed: f32,
    /// Visual size (pixels)
    pub size: f32,
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Cadences ===
    pub movement_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub countdown_interval_ms: u64,
    pub effect_sweep_interval_ms: u64,

    // === Session ===
    /// Session length (countdown ticks)
    pub session_secs: u32,
    pub starting_lives: u8,
    pub max_lives: u8,

    // === Scoring ===
    pub slash_points: u64,
    pub parry_points: u64,
    pub bonus_life_every: u32,
    pub reward_score_divisor: u64,
    pub reward_per_hit: u32,

    // === Geometry ===
    pub play_width: f32,
    pub play_height: f32,
    /// Where targets enter the travel axis
    pub spawn_position: f32,
    pub range_near: f32,
    pub range_far: f32,
    pub miss_threshold: f32,
    pub offscreen_threshold: f32,

    // === Effects ===
    pub effect_ttl_ms: u64,
    pub max_effects: usize,

    // === Target kinds ===
    pub normal: KindStats,
    pub fast: KindStats,
    pub tank: KindStats,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement_interval_ms: MOVEMENT_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            effect_sweep_interval_ms: EFFECT_SWEEP_INTERVAL_MS,

            session_secs: SESSION_SECS,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,

            slash_points: SLASH_POINTS,
            parry_points: PARRY_POINTS,
            bonus_life_every: BONUS_LIFE_EVERY,
            reward_score_divisor: REWARD_SCORE_DIVISOR,
            reward_per_hit: REWARD_PER_HIT,

            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            spawn_position: PLAY_WIDTH,
            range_near: RANGE_NEAR,
            range_far: RANGE_FAR,
            miss_threshold: MISS_THRESHOLD,
            offscreen_threshold: OFFSCREEN_THRESHOLD,

            effect_ttl_ms: EFFECT_TTL_MS,
            max_effects: MAX_EFFECTS,

            normal: KindStats { speed: 8.0, size: 48.0 },
            fast: KindStats { speed: 13.0, size: 36.0 },
            tank: KindStats { speed: 5.0, size: 64.0 },
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields fall back to defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stats for a target kind
    pub fn kind_stats(&self, kind: TargetKind) -> KindStats {
        match kind {
            TargetKind::Normal => self.normal,
            TargetKind::Fast => self.fast,
            TargetKind::Tank => self.tank,
        }
    }

    /// Whether a travel-axis position lies inside the hit window
    #[inline]
    pub fn in_range(&self, position: f32) -> bool {
        position >= self.range_near && position <= self.range_far
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive_intervals = [
            (self.movement_interval_ms, "movement_interval_ms"),
            (self.spawn_interval_ms, "spawn_interval_ms"),
            (self.countdown_interval_ms, "countdown_interval_ms"),
            (self.effect_sweep_interval_ms, "effect_sweep_interval_ms"),
            (self.reward_score_divisor, "reward_score_divisor"),
        ];
        for (value, name) in positive_intervals {
            if value == 0 {
                return Err(TuningError::NotPositive(name));
            }
        }
        if self.session_secs == 0 {
            return Err(TuningError::NotPositive("session_secs"));
        }
        if self.bonus_life_every == 0 {
            return Err(TuningError::NotPositive("bonus_life_every"));
        }
        if self.starting_lives == 0 {
            return Err(TuningError::NotPositive("starting_lives"));
        }
        if self.starting_lives > self.max_lives {
            return Err(TuningError::Inconsistent("starting_lives exceeds max_lives"));
        }
        if self.play_width <= 0.0 || self.play_height <= 0.0 {
            return Err(TuningError::NotPositive("play area"));
        }
        for (stats, name) in [
            (self.normal, "normal speed"),
            (self.fast, "fast speed"),
            (self.tank, "tank speed"),
        ] {
            if stats.speed <= 0.0 {
                return Err(TuningError::NotPositive(name));
            }
        }
        if self.range_near > self.range_far {
            return Err(TuningError::Inconsistent("range_near exceeds range_far"));
        }
        if self.miss_threshold > self.range_near {
            return Err(TuningError::Inconsistent("miss_threshold lies inside the hit window"));
        }
        if self.offscreen_threshold > self.miss_threshold {
            return Err(TuningError::Inconsistent("offscreen_threshold exceeds miss_threshold"));
        }
        if self.spawn_position <= self.range_far {
            return Err(TuningError::Inconsistent("targets would spawn inside the hit window"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "session_secs": 30, "max_effects": 8 }"#).unwrap();
        assert_eq!(tuning.session_secs, 30);
        assert_eq!(tuning.max_effects, 8);
        assert_eq!(tuning.movement_interval_ms, MOVEMENT_INTERVAL_MS);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_zero_cadence() {
        let err = Tuning::from_json(r#"{ "spawn_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NotPositive("spawn_interval_ms")));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let tuning = Tuning {
            offscreen_threshold: 100.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let tuning = Tuning::default();
        assert!(tuning.in_range(RANGE_NEAR));
        assert!(tuning.in_range(RANGE_FAR));
        assert!(!tuning.in_range(RANGE_NEAR - 0.01));
        assert!(!tuning.in_range(RANGE_FAR + 0.01));
    }
}
