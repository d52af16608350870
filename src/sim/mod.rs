//! Track & collision simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Input arrives as an explicit per-frame snapshot
//! - Seeded RNG only
//! - No rendering, scheduling or platform dependencies

pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{CollisionProbe, Contact};
pub use segment::TrackSegment;
pub use state::{DriftDirection, GamePhase, GameState, RunSummary};
pub use tick::{FrameOutcome, TickInput, Viewport, tick};
pub use track::Track;
