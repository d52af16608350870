//! Platform abstraction layer
//!
//! Everything the track loop needs from its host:
//! - Held-key input snapshots
//! - Frame scheduling and cancellation
//! - The crash outcome hand-off

pub mod frame;
pub mod input;

pub use frame::{
    CancelToken, FrameHandle, FrameLoop, FrameScheduler, FrameStatus, ManualScheduler, OutcomeSink,
};
pub use input::{Control, HeldKeys, control_for};
