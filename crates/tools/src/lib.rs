//! Developer tooling: read-only inspection of a running simulation.
//!
//! # Invariants
//! - Tools never mutate the simulation they inspect.

pub mod inspector;

pub use inspector::{EntityInfo, SimInspector, SimSummary};
