//! Neon Drift - a neon arcade drift runner
//!
//! Core modules:
//! - `sim`: Track generation, steering and collision (the per-frame loop)
//! - `platform`: Held-key input and frame scheduling/cancellation
//! - `renderer`: Scene building and 2D canvas painting
//! - `highscores`: Local best-distance table
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, SubmitError};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Fixed layout constants shared by the simulation and the renderer
pub mod consts {
    /// Horizontal positions are percentages of the viewport width
    pub const PERCENT_MAX: f32 = 100.0;
    /// Centre of the viewport (percent)
    pub const CENTER: f32 = 50.0;
    /// Drawn height of a track segment in pixels
    pub const SEGMENT_HEIGHT: f32 = 50.0;
    /// The car is drawn with its bottom edge this far above the viewport bottom
    pub const CAR_BOTTOM_FRACTION: f32 = 0.25;
    /// Car sprite size in pixels
    pub const CAR_WIDTH: f32 = 32.0;
    pub const CAR_HEIGHT: f32 = 64.0;
    /// Floor for segment opacity when fading toward the horizon
    pub const MIN_SEGMENT_OPACITY: f32 = 0.3;
}

/// Convert a percentage of the viewport width to pixels
#[inline]
pub fn percent_to_px(percent: f32, viewport_width: f32) -> f32 {
    percent * viewport_width / consts::PERCENT_MAX
}
