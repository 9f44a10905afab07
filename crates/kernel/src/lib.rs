//! Simulation kernel: bounded motion, entity pool, fixed-step ticking.
//!
//! # Invariants
//! - World bounds stay within `0..=MAX_WORLD_BOUNDS`; invalid input is rejected
//!   before any mutation.
//! - Controls are applied between ticks, never during one.
//! - A pool resize replaces the whole generation in one step and disposes every
//!   old visual handle exactly once.

pub mod backend;
pub mod config;
pub mod control;
pub mod entity;
pub mod error;
pub mod motion;
pub mod pool;
pub mod sim;

pub use backend::VisualBackend;
pub use config::{ConfigError, SimConfig, SpeedRange};
pub use control::Control;
pub use entity::{Entity, Kinematics, SpawnParams};
pub use error::SimError;
pub use motion::{BoundedMotionEngine, MAX_WORLD_BOUNDS, MIN_LINEAR_SPEED, Reflections};
pub use pool::EntityPool;
pub use sim::{FrameReport, SimEvent, Simulation, TickStats};
