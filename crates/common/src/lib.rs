//! Shared types for the bouncebox workspace.
//!
//! Plain identifiers and value types used across the kernel, the presentation
//! adapters and the tooling crates. Nothing here owns any state.

pub mod types;

pub use types::{Axis, BoxVisual, EntityId, VisualHandle};
