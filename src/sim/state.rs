//! Game state and core simulation types
//!
//! One mutable record owned by the frame loop. Nothing here touches the
//! display or the keyboard; input arrives as a snapshot each frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::track::Track;
use crate::consts::CENTER;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start key
    Waiting,
    /// Active driving
    Playing,
    /// Run ended; only a restart leaves this phase
    Crashed,
}

/// Cosmetic steering indicator for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriftDirection {
    #[default]
    None,
    Left,
    Right,
}

/// Final numbers of a finished (or abandoned) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub frames: u64,
    pub top_speed: f32,
    pub last_segment_id: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducible track generation
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Car position (percent of viewport width)
    pub lateral: f32,
    /// Scroll multiplier
    pub speed: f32,
    /// Distance travelled
    pub score: u64,
    pub drift: DriftDirection,
    pub track: Track,
    /// Frames simulated while playing
    pub frames: u64,
    pub tuning: Tuning,
}

impl GameState {
    /// Create a new run in the waiting phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let track = Track::new(&mut rng, &tuning);

        Self {
            seed,
            rng,
            phase: GamePhase::Waiting,
            lateral: CENTER,
            speed: tuning.start_speed,
            score: 0,
            drift: DriftDirection::None,
            track,
            frames: 0,
            tuning,
        }
    }

    /// Begin driving. Only valid from the waiting phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Waiting {
            return false;
        }
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
        true
    }

    /// Throw the run away and build a fresh one with the same tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        *self = Self::new(seed, tuning);
    }

    /// Key released: drop the drift indicator without waiting for the next frame
    pub fn clear_drift(&mut self) {
        self.drift = DriftDirection::None;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            score: self.score,
            frames: self.frames,
            top_speed: self.speed,
            last_segment_id: self.track.newest().id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits() {
        let state = GameState::new(42, Tuning::default());
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.lateral, 50.0);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.drift, DriftDirection::None);
        assert_eq!(state.track.len(), 20);
    }

    #[test]
    fn test_start_only_from_waiting() {
        let mut state = GameState::new(42, Tuning::default());
        assert!(state.start());
        assert!(state.is_playing());
        assert!(!state.start());

        state.phase = GamePhase::Crashed;
        assert!(!state.start());
        assert_eq!(state.phase, GamePhase::Crashed);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        state.score = 900;
        state.speed = 2.5;
        state.lateral = 12.0;
        state.drift = DriftDirection::Left;
        state.phase = GamePhase::Crashed;

        state.restart(2);
        assert_eq!(state.seed, 2);
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.lateral, 50.0);
        assert_eq!(state.drift, DriftDirection::None);
        assert_eq!(state.track.newest().id, 19);
    }

    #[test]
    fn test_clear_drift() {
        let mut state = GameState::new(1, Tuning::default());
        state.drift = DriftDirection::Right;
        state.clear_drift();
        assert_eq!(state.drift, DriftDirection::None);
    }

    #[test]
    fn test_summary_serializes() {
        let state = GameState::new(77, Tuning::default());
        let json = serde_json::to_string(&state.summary()).unwrap();
        assert!(json.contains("\"seed\":77"));
        assert!(json.contains("\"last_segment_id\":19"));
    }
}
