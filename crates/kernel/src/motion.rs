//! Per-axis reflection inside a cube whose size can change between ticks.
//!
//! The floor at 0 reflects unconditionally. The ceiling at `world_bounds`
//! reflects only when the next step would widen the overshoot, so a box left
//! outside by a shrinking world keeps its inward velocity and travels back in
//! over several ticks instead of flipping every tick.

use bouncebox_common::Axis;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::Kinematics;
use crate::error::SimError;

/// Largest accepted world bounds.
///
/// Positions are `f32`. Up to this size a step of [`MIN_LINEAR_SPEED`] still
/// changes every coordinate a box can reach, so no box freezes in place.
pub const MAX_WORLD_BOUNDS: f64 = 10_000.0;

/// Smallest per-axis linear speed a config may sample.
pub const MIN_LINEAR_SPEED: f32 = 0.001;

/// Validate a requested bounds value and round it to the nearest whole unit.
///
/// Halves round up. Negative, NaN, infinite and values above
/// [`MAX_WORLD_BOUNDS`] are rejected.
pub fn round_bounds(value: f64) -> Result<f32, SimError> {
    if !value.is_finite() || value < 0.0 || value.round() > MAX_WORLD_BOUNDS {
        return Err(SimError::InvalidBounds { value });
    }
    // abs() folds -0.0 into 0.0
    let rounded = value.round().abs() as f32;
    if !rounded.is_finite() {
        return Err(SimError::InvalidBounds { value });
    }
    Ok(rounded)
}

/// Which axes had their velocity inverted during one move step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflections([bool; 3]);

impl Reflections {
    pub fn flipped(&self, axis: Axis) -> bool {
        self.0[axis.index()]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|f| *f)
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|f| **f).count()
    }
}

/// Owns the world bounds and advances kinematics one tick at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedMotionEngine {
    world_bounds: f32,
}

impl Default for BoundedMotionEngine {
    fn default() -> Self {
        Self {
            world_bounds: 100.0,
        }
    }
}

impl BoundedMotionEngine {
    pub fn new(world_bounds: f64) -> Result<Self, SimError> {
        Ok(Self {
            world_bounds: round_bounds(world_bounds)?,
        })
    }

    pub fn world_bounds(&self) -> f32 {
        self.world_bounds
    }

    /// Replace the bounds. Returns the stored (rounded) value.
    ///
    /// Entities are not moved; any left outside are brought back by later
    /// [`move_entity`](Self::move_entity) calls.
    pub fn set_world_bounds(&mut self, value: f64) -> Result<f32, SimError> {
        let rounded = round_bounds(value)?;
        self.world_bounds = rounded;
        Ok(rounded)
    }

    /// True when one step of `velocity` does not increase the distance past
    /// the ceiling.
    pub fn is_closing(&self, position: f32, velocity: f32) -> bool {
        let current = position - self.world_bounds;
        let next = (position + velocity) - self.world_bounds;
        next <= current
    }

    /// Resolve one axis. Returns the new velocity and whether it was flipped.
    pub fn reflect_axis(&self, position: f32, velocity: f32) -> (f32, bool) {
        if position < 0.0 {
            (-velocity, true)
        } else if position > self.world_bounds && !self.is_closing(position, velocity) {
            (-velocity, true)
        } else {
            (velocity, false)
        }
    }

    /// Resolve reflections on all three axes, then integrate position once.
    pub fn move_entity(&self, kinematics: &mut Kinematics) -> Reflections {
        let mut flips = [false; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            let (velocity, flipped) =
                self.reflect_axis(kinematics.position[i], kinematics.velocity[i]);
            kinematics.velocity[i] = velocity;
            flips[i] = flipped;
        }
        kinematics.position += kinematics.velocity;
        Reflections(flips)
    }

    /// Apply one rotation increment. Rotation has no boundary.
    pub fn rotate_entity(&self, kinematics: &mut Kinematics) {
        kinematics.rotation += kinematics.angular_velocity;
    }

    /// Move then rotate.
    pub fn advance(&self, kinematics: &mut Kinematics) -> Reflections {
        let flips = self.move_entity(kinematics);
        self.rotate_entity(kinematics);
        flips
    }

    pub fn contains(&self, position: Vec3) -> bool {
        Axis::ALL.iter().all(|a| {
            let p = position[a.index()];
            (0.0..=self.world_bounds).contains(&p)
        })
    }
}
