//! Frame scheduling and teardown
//!
//! The browser drives the loop with `requestAnimationFrame`; tests drive it
//! by hand through [`ManualScheduler`]. Either way a frame that fires after
//! teardown finds the cancel token set and leaves the state alone.

use std::cell::Cell;
use std::rc::Rc;

use crate::sim::{FrameOutcome, GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

/// Opaque id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// "Run the frame callback before the next repaint"
pub trait FrameScheduler {
    fn request(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
    /// The requested frame has run; the handle is spent
    fn fired(&mut self, _handle: FrameHandle) {}
}

/// Receives the final score when a run crashes
pub trait OutcomeSink {
    fn on_crash(&mut self, score: u64);
}

impl<F: FnMut(u64)> OutcomeSink for F {
    fn on_crash(&mut self, score: u64) {
        self(score)
    }
}

/// Shared, idempotent cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Result of delivering one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Frame simulated, next one requested
    Continued,
    /// Run crashed on this frame; loop torn down
    Crashed { score: u64 },
    /// Loop not running; nothing touched
    Stopped,
}

/// Owns the game state and the scheduled-frame lifecycle
pub struct FrameLoop<S: FrameScheduler> {
    state: GameState,
    scheduler: S,
    pending: Option<FrameHandle>,
    token: CancelToken,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(seed: u64, tuning: Tuning, scheduler: S) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            scheduler,
            pending: None,
            token: CancelToken::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for input side effects (drift clearing on key-up)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some() && !self.token.is_cancelled()
    }

    /// Start the run and request the first frame
    pub fn start(&mut self) -> bool {
        if self.token.is_cancelled() || !self.state.start() {
            return false;
        }
        self.pending = Some(self.scheduler.request());
        true
    }

    /// Deliver one scheduled frame
    pub fn on_frame(
        &mut self,
        input: &TickInput,
        viewport: Viewport,
        sink: &mut impl OutcomeSink,
    ) -> FrameStatus {
        // The frame that was pending is now firing
        if let Some(handle) = self.pending.take() {
            self.scheduler.fired(handle);
        }

        if self.token.is_cancelled() || !self.state.is_playing() {
            return FrameStatus::Stopped;
        }

        match tick(&mut self.state, input, viewport) {
            FrameOutcome::Running => {
                self.pending = Some(self.scheduler.request());
                FrameStatus::Continued
            }
            FrameOutcome::Crashed { score } => {
                self.teardown();
                sink.on_crash(score);
                FrameStatus::Crashed { score }
            }
            FrameOutcome::Idle => FrameStatus::Stopped,
        }
    }

    /// Stop the loop. Safe to call any number of times.
    pub fn teardown(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Tear down and install a fresh run waiting for the start key
    pub fn restart(&mut self, seed: u64) {
        self.teardown();
        self.state.restart(seed);
        self.token = CancelToken::new();
        log::info!("Run reset with seed {}", seed);
    }
}

/// Scheduler that only records requests; tests fire frames explicitly
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    /// Requested, neither fired nor cancelled
    pub outstanding: Vec<FrameHandle>,
    pub requests: usize,
    pub cancels: usize,
    pub fired: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_id);
        self.outstanding.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.cancels += 1;
        self.outstanding.retain(|h| *h != handle);
    }

    fn fired(&mut self, handle: FrameHandle) {
        self.fired += 1;
        self.outstanding.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    const VIEW: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    fn new_loop() -> FrameLoop<ManualScheduler> {
        FrameLoop::new(11, Tuning::default(), ManualScheduler::new())
    }

    #[test]
    fn test_start_requests_first_frame() {
        let mut frames = new_loop();
        assert!(!frames.is_running());
        assert!(frames.start());
        assert!(frames.is_running());
        assert_eq!(frames.scheduler().requests, 1);

        // Starting twice does not double-schedule
        assert!(!frames.start());
        assert_eq!(frames.scheduler().requests, 1);
    }

    #[test]
    fn test_each_frame_requests_the_next() {
        let mut frames = new_loop();
        frames.start();
        let mut crashes = Vec::new();
        let mut sink = |score: u64| crashes.push(score);
        for _ in 0..5 {
            assert_eq!(
                frames.on_frame(&TickInput::default(), VIEW, &mut sink),
                FrameStatus::Continued
            );
        }
        assert!(crashes.is_empty());
        assert_eq!(frames.scheduler().requests, 6);
        assert_eq!(frames.scheduler().fired, 5);
        // Only the frame requested by the last tick is still pending
        assert_eq!(frames.scheduler().outstanding, vec![FrameHandle(6)]);
        assert_eq!(frames.state().score, 5);
    }

    #[test]
    fn test_crash_reports_score_once_and_stops() {
        let mut frames = new_loop();
        frames.start();
        frames.state_mut().lateral = 15.0;
        frames.state_mut().score = 77;

        let mut reported = Vec::new();
        let mut sink = |score: u64| reported.push(score);

        let status = frames.on_frame(&TickInput::default(), VIEW, &mut sink);
        assert_eq!(status, FrameStatus::Crashed { score: 77 });
        assert_eq!(frames.state().phase, GamePhase::Crashed);
        assert!(!frames.is_running());
        // No follow-up frame after the crash
        assert_eq!(frames.scheduler().requests, 1);

        // A stray frame after teardown must not mutate anything
        let status = frames.on_frame(&TickInput::LEFT, VIEW, &mut sink);
        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(frames.state().lateral, 15.0);
        assert_eq!(reported, vec![77]);
    }

    #[test]
    fn test_teardown_twice_after_crash() {
        let mut frames = new_loop();
        frames.start();
        frames.state_mut().lateral = 85.0;
        let mut sink = |_score: u64| {};
        frames.on_frame(&TickInput::default(), VIEW, &mut sink);

        // The crashing frame consumed the only handle
        assert_eq!(frames.scheduler().fired, 1);
        assert!(frames.scheduler().outstanding.is_empty());

        let requests = frames.scheduler().requests;
        let cancels = frames.scheduler().cancels;
        frames.teardown();
        frames.teardown();
        assert_eq!(frames.scheduler().requests, requests);
        assert_eq!(frames.scheduler().cancels, cancels);
        assert!(frames.scheduler().outstanding.is_empty());
        assert!(frames.token().is_cancelled());
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let mut frames = new_loop();
        frames.start();
        assert_eq!(frames.scheduler().outstanding.len(), 1);

        frames.teardown();
        assert!(frames.scheduler().outstanding.is_empty());
        assert_eq!(frames.scheduler().cancels, 1);

        let mut sink = |_score: u64| {};
        let before = frames.state().track.newest().id;
        assert_eq!(
            frames.on_frame(&TickInput::default(), VIEW, &mut sink),
            FrameStatus::Stopped
        );
        assert_eq!(frames.state().track.newest().id, before);
        assert_eq!(frames.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_after_crash() {
        let mut frames = new_loop();
        frames.start();
        frames.state_mut().lateral = 15.0;
        let mut sink = |_score: u64| {};
        frames.on_frame(&TickInput::default(), VIEW, &mut sink);

        frames.restart(12);
        assert_eq!(frames.state().phase, GamePhase::Waiting);
        assert_eq!(frames.state().seed, 12);
        assert!(!frames.token().is_cancelled());

        assert!(frames.start());
        assert_eq!(
            frames.on_frame(&TickInput::default(), VIEW, &mut sink),
            FrameStatus::Continued
        );
    }

    #[test]
    fn test_old_token_stays_cancelled_after_restart() {
        let mut frames = new_loop();
        frames.start();
        let old = frames.token().clone();
        frames.restart(3);
        assert!(old.is_cancelled());
        assert!(!frames.token().is_cancelled());
    }
}
