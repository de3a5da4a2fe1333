//! Cosmetic hit markers
//!
//! Effects never feed back into gameplay. Insertion failures are reported to
//! the caller, who logs and drops them.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::target::Action;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("effect registry full ({0} live effects)")]
    Full(usize),
    #[error("effects disabled")]
    Disabled,
}

/// Visual style of a hit marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Slash,
    Parry,
}

impl From<Action> for EffectKind {
    fn from(action: Action) -> Self {
        if action.is_parry() {
            EffectKind::Parry
        } else {
            EffectKind::Slash
        }
    }
}

/// A short-lived marker at the spot a target was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub position: Vec2,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRegistry {
    effects: Vec<Effect>,
    capacity: usize,
    enabled: bool,
    next_id: u32,
}

impl EffectRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            effects: Vec::with_capacity(capacity.min(64)),
            capacity,
            enabled: true,
            next_id: 1,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.effects.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn push(&mut self, kind: EffectKind, position: Vec2, now_ms: u64) -> Result<u32, EffectError> {
        if !self.enabled {
            return Err(EffectError::Disabled);
        }
        if self.effects.len() >= self.capacity {
            return Err(EffectError::Full(self.effects.len()));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.effects.push(Effect {
            id,
            kind,
            position,
            created_at_ms: now_ms,
        });
        Ok(id)
    }

    /// Drop effects older than `ttl_ms`. Returns how many were removed.
    pub fn sweep(&mut self, now_ms: u64, ttl_ms: u64) -> usize {
        let before = self.effects.len();
        self.effects
            .retain(|e| now_ms.saturating_sub(e.created_at_ms) <= ttl_ms);
        before - self.effects.len()
    }
}
