//! Player preferences
//!
//! Persisted as JSON next to the game, separate from gameplay tuning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::HAPTIC_PULSE_MS;

/// Feedback preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Haptics ===
    /// Vibrate on hit
    pub haptics: bool,
    /// Pulse length on hit
    pub haptic_pulse_ms: Millis,

    // === Audio ===
    /// Play the hit cue
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === HUD ===
    /// Show "lives left" messages
    pub show_messages: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptics: true,
            haptic_pulse_ms: HAPTIC_PULSE_MS,
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            show_messages: true,
        }
    }
}

impl Settings {
    /// Volume the hit cue should play at (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if !self.sound {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings in {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
