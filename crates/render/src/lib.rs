//! Presentation adapter for the bouncebox kernel.
//!
//! # Invariants
//! - The presentation layer never mutates simulation state directly; user
//!   actions become kernel `Control`s.
//! - Scene state derives from what the kernel pushes through `VisualBackend`.
//!
//! The scene here is headless: it keeps the boxes in memory so the CLI and
//! tests can drive the kernel without a GPU. A windowed backend implements
//! the same `VisualBackend` trait and `Renderer` interface.

mod panel;
mod renderer;
mod scene;

pub use panel::{ControlPanel, Slider};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{HeadlessScene, SceneBox};
