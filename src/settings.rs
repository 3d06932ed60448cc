//! Game settings and preferences
//!
//! Persisted separately from the best score, as JSON in the platform store.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::tuning::{Mode, Pacing, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last mode picked on the menu
    pub mode: Mode,

    // === Visual Effects ===
    /// Particle bursts on score and crash
    pub particles: bool,
    /// Actor trail (Arcade only)
    pub trails: bool,

    // === Gameplay ===
    /// Whether difficulty follows the viewport or a fixed logical width
    pub pacing: Pacing,

    // === Accessibility ===
    /// Reduced motion (no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Calm,
            particles: true,
            trails: true,
            pacing: Pacing::Viewport,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "flappy_feather_settings";

    /// Balance table for the chosen mode with the chosen pacing
    pub fn tuning(&self) -> Tuning {
        Tuning::for_mode(self.mode).with_pacing(self.pacing)
    }

    /// Game-over flash (Arcade only, respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.mode == Mode::Arcade && !self.reduced_motion
    }

    /// Trail (Arcade only)
    pub fn effective_trail(&self) -> bool {
        self.mode == Mode::Arcade && self.trails
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(err) => log::warn!("Discarding unreadable settings: {}", err),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(err) => log::warn!("Failed to encode settings: {}", err),
        }
    }
}
