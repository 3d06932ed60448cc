//! Persisted best score
//!
//! A single integer in the platform key/value store, read once when a
//! session opens and written on every new best.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Highest score ever recorded on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// Storage key, shared with earlier browser builds so their bests carry
    /// over. The value is stored as plain decimal text.
    pub const STORAGE_KEY: &'static str = "highScore";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Parse a stored value. Anything that isn't a non-negative integer is zero,
    /// including digits followed by junk ("12abc"): no prefix is salvaged.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(value) => Self { value },
            Err(_) => {
                log::warn!("Ignoring unreadable best score {:?}", raw);
                Self::default()
            }
        }
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished or in-progress score. Returns true on a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if self.qualifies(score) {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from storage; missing or malformed entries read as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(raw) => {
                let best = Self::parse(&raw);
                log::info!("Loaded best score {}", best.value);
                best
            }
            None => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Save to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(Self::STORAGE_KEY, &self.value.to_string());
        log::info!("Best score saved ({})", self.value);
    }
}
