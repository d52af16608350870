//! Scene building
//!
//! Turns the game state into a flat list of screen-space quads and labels.
//! Pure so it can be tested without a canvas.

use glam::Vec2;

use crate::consts::{CAR_BOTTOM_FRACTION, CAR_HEIGHT, CAR_WIDTH, MIN_SEGMENT_OPACITY, SEGMENT_HEIGHT};
use crate::percent_to_px;
use crate::settings::Settings;
use crate::sim::{DriftDirection, GamePhase, GameState, Viewport};

/// RGBA, components in 0-1
pub type Color = [f32; 4];

/// Neon palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = [0.04, 0.02, 0.10, 1.0];
    pub const TRACK: Color = [0.55, 0.20, 0.95, 1.0];
    pub const CAR: Color = [1.0, 0.18, 0.66, 1.0];
    pub const CYAN: Color = [0.0, 0.95, 1.0, 1.0];
    pub const YELLOW: Color = [1.0, 0.92, 0.20, 1.0];
    pub const PINK: Color = [1.0, 0.18, 0.66, 1.0];

    pub const HC_TRACK: Color = [1.0, 1.0, 1.0, 1.0];
    pub const HC_CAR: Color = [1.0, 0.85, 0.0, 1.0];
}

/// Axis-aligned rectangle, optionally rotated about its centre
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// Top-left corner (px)
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    /// Radians, clockwise
    pub rotation: f32,
}

impl Quad {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A line of HUD text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub size_px: f32,
    pub color: Color,
    pub align: Align,
}

/// Everything to draw for one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub clear: Color,
    pub quads: Vec<Quad>,
    pub labels: Vec<Label>,
}

/// Build the scene for the current state
pub fn build(state: &GameState, viewport: Viewport, settings: &Settings, fps: Option<u32>) -> Scene {
    let (track_color, car_color) = if settings.high_contrast {
        (palette::HC_TRACK, palette::HC_CAR)
    } else {
        (palette::TRACK, palette::CAR)
    };

    let mut quads = Vec::with_capacity(state.track.len() + 1);

    // Oldest segments are nearest the viewer; fade toward the horizon
    for (index, segment) in state.track.segments().enumerate() {
        let alpha = (1.0 - index as f32 * 0.05).max(MIN_SEGMENT_OPACITY);
        let [r, g, b, _] = track_color;
        quads.push(Quad {
            pos: Vec2::new(percent_to_px(segment.left_edge(), viewport.width), segment.y),
            size: Vec2::new(percent_to_px(segment.width, viewport.width), SEGMENT_HEIGHT),
            color: [r, g, b, alpha],
            rotation: 0.0,
        });
    }

    quads.push(car_quad(state, viewport, settings, car_color));

    Scene {
        clear: palette::BACKGROUND,
        quads,
        labels: hud(state, viewport, settings, fps),
    }
}

fn car_quad(state: &GameState, viewport: Viewport, settings: &Settings, color: Color) -> Quad {
    let center_x = percent_to_px(state.lateral, viewport.width);
    let bottom = viewport.height * (1.0 - CAR_BOTTOM_FRACTION);
    let tilt = settings.drift_tilt();
    let rotation = match state.drift {
        DriftDirection::Left => -tilt,
        DriftDirection::Right => tilt,
        DriftDirection::None => 0.0,
    };

    Quad {
        pos: Vec2::new(center_x - CAR_WIDTH / 2.0, bottom - CAR_HEIGHT),
        size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
        color,
        rotation,
    }
}

fn hud(state: &GameState, viewport: Viewport, settings: &Settings, fps: Option<u32>) -> Vec<Label> {
    let mut labels = Vec::new();
    let center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);

    match state.phase {
        GamePhase::Waiting => {
            labels.push(Label {
                text: "NEON DRIFT".to_string(),
                pos: center - Vec2::new(0.0, 60.0),
                size_px: 72.0,
                color: palette::CYAN,
                align: Align::Center,
            });
            labels.push(Label {
                text: "Press SPACE to Start".to_string(),
                pos: center + Vec2::new(0.0, 20.0),
                size_px: 24.0,
                color: palette::YELLOW,
                align: Align::Center,
            });
        }
        GamePhase::Playing => {
            labels.push(Label {
                text: format!("{}m", state.score),
                pos: Vec2::new(24.0, 48.0),
                size_px: 36.0,
                color: palette::CYAN,
                align: Align::Left,
            });
            if settings.show_speed {
                labels.push(Label {
                    text: format!("Speed: {:.1}x", state.speed),
                    pos: Vec2::new(24.0, 76.0),
                    size_px: 18.0,
                    color: palette::YELLOW,
                    align: Align::Left,
                });
            }
        }
        GamePhase::Crashed => {
            labels.push(Label {
                text: "CRASHED!".to_string(),
                pos: center - Vec2::new(0.0, 40.0),
                size_px: 56.0,
                color: palette::PINK,
                align: Align::Center,
            });
            labels.push(Label {
                text: format!("{}m", state.score),
                pos: center + Vec2::new(0.0, 30.0),
                size_px: 48.0,
                color: palette::CYAN,
                align: Align::Center,
            });
        }
    }

    if let (true, Some(fps)) = (settings.show_fps, fps) {
        labels.push(Label {
            text: format!("{fps} fps"),
            pos: Vec2::new(viewport.width - 24.0, 32.0),
            size_px: 14.0,
            color: palette::YELLOW,
            align: Align::Right,
        });
    }

    labels
}
