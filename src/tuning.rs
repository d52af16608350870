//! Data-driven game balance
//!
//! Every number the track loop depends on lives here so a run can be
//! re-tuned from JSON without touching the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::PERCENT_MAX;
use crate::sim::CollisionProbe;

/// Upper bound on the live window size
pub const MAX_SEGMENT_COUNT: usize = 1000;

/// Reasons a tuning document can be rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// The JSON could not be parsed
    Parse(String),
    /// A field holds a value the loop cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "tuning is not valid JSON: {msg}"),
            TuningError::Invalid { field, reason } => write!(f, "tuning field `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Track, steering and speed parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track window ===
    /// Number of live segments
    pub segment_count: usize,
    /// Vertical distance between consecutive segments (px)
    pub segment_spacing: f32,
    /// Baseline drivable width (percent of viewport width)
    pub base_width: f32,
    /// Width noise amplitude; new widths are `base_width ± width_noise`
    pub width_noise: f32,
    /// Curvature amplitude for the initial batch
    pub initial_curve: f32,
    /// Curvature amplitude for segments generated during play
    pub curve_range: f32,
    /// Clamp for segment centres (percent)
    pub center_min: f32,
    pub center_max: f32,
    /// Segments further than this below the viewport bottom are evicted (px)
    pub eviction_margin: f32,

    // === Car ===
    /// Clamp for the car's lateral position (percent)
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// Lateral movement per frame while a steering key is held (percent)
    pub steer_step: f32,
    /// Distance from either track edge that counts as a crash (percent)
    pub edge_margin: f32,

    // === Speed ===
    pub start_speed: f32,
    /// Speed gained per frame
    pub speed_step: f32,
    pub max_speed: f32,
    /// Pixels scrolled per frame per unit of speed
    pub scroll_factor: f32,

    // === Collision ===
    /// Car collision plane as a fraction of viewport height
    pub car_plane: f32,
    /// Detection band for [`CollisionProbe::Band`] (fractions of viewport height)
    pub band_top: f32,
    pub band_bottom: f32,
    pub probe: CollisionProbe,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            segment_count: 20,
            segment_spacing: 50.0,
            base_width: 60.0,
            width_noise: 5.0,
            initial_curve: 1.0,
            curve_range: 1.5,
            center_min: 20.0,
            center_max: 80.0,
            eviction_margin: 100.0,

            lateral_min: 10.0,
            lateral_max: 90.0,
            steer_step: 2.0,
            edge_margin: 5.0,

            start_speed: 1.0,
            speed_step: 0.001,
            max_speed: 3.0,
            scroll_factor: 3.0,

            car_plane: 0.75,
            band_top: 0.7,
            band_bottom: 0.8,
            probe: CollisionProbe::Nearest,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_drift_tuning";

    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the window or clamp invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let floats = [
            ("segment_spacing", self.segment_spacing),
            ("base_width", self.base_width),
            ("width_noise", self.width_noise),
            ("initial_curve", self.initial_curve),
            ("curve_range", self.curve_range),
            ("center_min", self.center_min),
            ("center_max", self.center_max),
            ("eviction_margin", self.eviction_margin),
            ("lateral_min", self.lateral_min),
            ("lateral_max", self.lateral_max),
            ("steer_step", self.steer_step),
            ("edge_margin", self.edge_margin),
            ("start_speed", self.start_speed),
            ("speed_step", self.speed_step),
            ("max_speed", self.max_speed),
            ("scroll_factor", self.scroll_factor),
            ("car_plane", self.car_plane),
            ("band_top", self.band_top),
            ("band_bottom", self.band_bottom),
        ];
        if let Some((field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(*field, "must be a finite number");
        }

        if self.segment_count < 2 {
            return invalid("segment_count", "must be at least 2");
        }
        if self.segment_count > MAX_SEGMENT_COUNT {
            return invalid("segment_count", "must be at most 1000");
        }
        if !(self.segment_spacing > 0.0) {
            return invalid("segment_spacing", "must be positive");
        }
        if !(self.base_width > 0.0) {
            return invalid("base_width", "must be positive");
        }
        if self.width_noise < 0.0 || self.width_noise >= self.base_width {
            return invalid("width_noise", "must be in [0, base_width)");
        }
        if self.width_noise > PERCENT_MAX {
            return invalid("width_noise", "must not exceed 100");
        }
        if !(0.0..=PERCENT_MAX).contains(&self.initial_curve) {
            return invalid("initial_curve", "must be in [0, 100]");
        }
        if !(0.0..=PERCENT_MAX).contains(&self.curve_range) {
            return invalid("curve_range", "must be in [0, 100]");
        }
        if self.center_min > self.center_max {
            return invalid("center_min", "must not exceed center_max");
        }
        if self.lateral_min > self.lateral_max {
            return invalid("lateral_min", "must not exceed lateral_max");
        }
        if self.steer_step < 0.0 {
            return invalid("steer_step", "must not be negative");
        }
        if self.speed_step < 0.0 {
            return invalid("speed_step", "must not be negative");
        }
        if self.start_speed < 0.0 || self.start_speed > self.max_speed {
            return invalid("start_speed", "must be in [0, max_speed]");
        }
        if self.scroll_factor < 0.0 {
            return invalid("scroll_factor", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.car_plane) {
            return invalid("car_plane", "must be a fraction of the viewport height");
        }
        if self.band_top >= self.band_bottom {
            return invalid("band_top", "must be above band_bottom");
        }
        Ok(())
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
