//! Player settings and preferences
//!
//! Key bindings for the four actions plus cosmetic toggles. Stored by the
//! host as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Action;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("key '{0}' is bound to more than one action")]
    DuplicateKey(char),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a press came from. Every source funnels into the same resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Keyboard key (matched case-insensitively)
    Key(char),
    /// On-screen control
    Button(Action),
}

/// One key per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub slash_blue: char,
    pub parry_blue: char,
    pub parry_red: char,
    pub slash_red: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            slash_blue: 'd',
            parry_blue: 'f',
            parry_red: 'j',
            slash_red: 'k',
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: Action) -> char {
        match action {
            Action::SlashBlue => self.slash_blue,
            Action::ParryBlue => self.parry_blue,
            Action::ParryRed => self.parry_red,
            Action::SlashRed => self.slash_red,
        }
    }

    pub fn action_for(&self, key: char) -> Option<Action> {
        let key = key.to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|&action| self.key_for(action).to_ascii_lowercase() == key)
    }

    /// Every action must have its own key
    pub fn validate(&self) -> Result<(), SettingsError> {
        let keys: Vec<char> = Action::ALL
            .iter()
            .map(|&a| self.key_for(a).to_ascii_lowercase())
            .collect();
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(SettingsError::DuplicateKey(*key));
            }
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bindings: KeyBindings,

    // === Visual Effects ===
    /// Hit markers
    pub hit_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            hit_effects: true,
        }
    }
}

impl Settings {
    /// Load settings from JSON, rejecting ambiguous bindings
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.bindings.validate()?;
        log::info!("Loaded settings");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Map any input source to an action
    pub fn action_for(&self, source: InputSource) -> Option<Action> {
        match source {
            InputSource::Key(key) => self.bindings.action_for(key),
            InputSource::Button(action) => Some(action),
        }
    }
}
