//! Rendering module
//!
//! Scene building is platform-independent; painting uses a 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use scene::{Align, Label, Quad, Scene, build};
