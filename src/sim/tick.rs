//! Per-frame simulation step
//!
//! Steering, scrolling, window maintenance and the crash check, in that order.

use super::collision::{self, Contact};
use super::state::{DriftDirection, GamePhase, GameState};

/// Held input for a single frame, read once before the step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// A "left" key is held
    pub left: bool,
    /// A "right" key is held
    pub right: bool,
}

impl TickInput {
    pub const LEFT: Self = Self {
        left: true,
        right: false,
    };
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
    };
}

/// Current viewport metrics (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not playing; state untouched
    Idle,
    /// Frame simulated, keep scheduling
    Running,
    /// The car left the road this frame
    Crashed { score: u64 },
}

/// Advance the run by one display frame
pub fn tick(state: &mut GameState, input: &TickInput, viewport: Viewport) -> FrameOutcome {
    if state.phase != GamePhase::Playing {
        return FrameOutcome::Idle;
    }

    steer(state, input);

    let tuning = &state.tuning;
    state.track.advance(state.speed * tuning.scroll_factor);
    state
        .track
        .evict(viewport.height + tuning.eviction_margin);
    state.track.refill(&mut state.rng, tuning);

    let contact = collision::check(&state.track, state.lateral, viewport.height, tuning);
    if let Contact::OffTrack { segment_id, span } = contact {
        state.phase = GamePhase::Crashed;
        log::info!(
            "Crashed at {:.1}% on segment {} (safe {:.1}..{:.1}), score {}",
            state.lateral,
            segment_id,
            span.0,
            span.1,
            state.score
        );
        return FrameOutcome::Crashed { score: state.score };
    }

    state.score += state.speed.floor() as u64;
    state.speed = (state.speed + tuning.speed_step).min(tuning.max_speed);
    state.frames += 1;

    FrameOutcome::Running
}

/// Resolve held keys into lateral movement; opposing keys cancel out
fn steer(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    match (input.left, input.right) {
        (true, false) => {
            state.lateral = (state.lateral - tuning.steer_step).max(tuning.lateral_min);
            state.drift = DriftDirection::Left;
        }
        (false, true) => {
            state.lateral = (state.lateral + tuning.steer_step).min(tuning.lateral_max);
            state.drift = DriftDirection::Right;
        }
        _ => state.drift = DriftDirection::None,
    }
}
