//! Player preferences
//!
//! Persisted separately from tuning and high scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show FPS counter in the HUD
    pub show_fps: bool,
    /// Show the speed multiplier under the distance
    pub show_speed: bool,
    /// Reduced motion (no drift tilt on the car)
    pub reduced_motion: bool,
    /// High contrast palette
    pub high_contrast: bool,
    /// Last username typed on the crash screen
    pub last_username: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            show_speed: true,
            reduced_motion: false,
            high_contrast: false,
            last_username: String::new(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_drift_settings";

    /// Car tilt in radians for a drift, honouring reduced motion
    pub fn drift_tilt(&self) -> f32 {
        if self.reduced_motion { 0.0 } else { 0.15 }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
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
            match serde_json::to_string(self) {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Failed to save settings: {:?}", e),
                },
                Err(e) => log::warn!("Failed to encode settings: {}", e),
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
