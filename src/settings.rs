//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web build; session state itself is
//! never persisted - only these knobs survive a reload.

use serde::{Deserialize, Serialize};

use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH, TIME_BUDGET};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Reverb wet mix (0.0 - 1.0)
    pub reverb_mix: f32,

    /// Maze dimensions in cells; sanitized to odd values >= 5
    pub maze_width: usize,
    pub maze_height: usize,
    /// Session time budget in seconds
    pub time_budget: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            reverb_mix: 0.3,
            maze_width: MAZE_WIDTH,
            maze_height: MAZE_HEIGHT,
            time_budget: TIME_BUDGET,
        }
    }
}

impl Settings {
    /// Clamp volumes and force maze dimensions onto the odd >= 5 lattice the
    /// generator requires. Applied after every load so a hand-edited or
    /// stale persisted blob can't violate the generator's contract.
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.reverb_mix = self.reverb_mix.clamp(0.0, 1.0);
        self.maze_width = sanitize_dimension(self.maze_width);
        self.maze_height = sanitize_dimension(self.maze_height);
        if !self.time_budget.is_finite() || self.time_budget <= 0.0 {
            self.time_budget = TIME_BUDGET;
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "echo_maze_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(mut settings) = serde_json::from_str::<Settings>(&json) {
                    settings.sanitize();
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn sanitize_dimension(dim: usize) -> usize {
    let dim = dim.max(5);
    if dim % 2 == 0 { dim - 1 } else { dim }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_already_sane() {
        let mut settings = Settings::default();
        let before = settings.clone();
        settings.sanitize();
        assert_eq!(settings.maze_width, before.maze_width);
        assert_eq!(settings.master_volume, before.master_volume);
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let mut settings = Settings {
            master_volume: 4.0,
            reverb_mix: -1.0,
            maze_width: 2,
            maze_height: 16,
            time_budget: -5.0,
        };
        settings.sanitize();

        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.reverb_mix, 0.0);
        assert_eq!(settings.maze_width, 5);
        assert_eq!(settings.maze_height, 15);
        assert_eq!(settings.time_budget, TIME_BUDGET);
    }

    #[test]
    fn test_roundtrips_through_json() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.maze_width, settings.maze_width);
        assert_eq!(back.master_volume, settings.master_volume);
    }
}
