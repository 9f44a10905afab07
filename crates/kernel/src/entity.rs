use bouncebox_common::{EntityId, VisualHandle};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{SimConfig, SpeedRange};

/// The kinematic state the motion engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    /// Added to `rotation` every rotate step.
    pub angular_velocity: Vec3,
}

impl Kinematics {
    pub fn new(position: Vec3, velocity: Vec3, angular_velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            rotation: Vec3::ZERO,
            angular_velocity,
        }
    }
}

/// Sampling parameters for freshly spawned boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub speed: SpeedRange,
    pub spin: SpeedRange,
    pub box_size: f32,
}

impl From<&SimConfig> for SpawnParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            speed: config.speed,
            spin: config.spin,
            box_size: config.box_size,
        }
    }
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

impl SpawnParams {
    /// Sample kinematics and a color for a new box inside `[0, bounds]³`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, bounds: f32) -> (Kinematics, [f32; 3]) {
        let velocity = Vec3::new(
            self.speed.sample(rng),
            self.speed.sample(rng),
            self.speed.sample(rng),
        );
        let angular_velocity = Vec3::new(
            self.spin.sample(rng),
            self.spin.sample(rng),
            self.spin.sample(rng),
        );
        let position = Vec3::new(
            sample_coordinate(rng, bounds),
            sample_coordinate(rng, bounds),
            sample_coordinate(rng, bounds),
        );
        let color = [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()];
        (
            Kinematics::new(position, velocity, angular_velocity),
            color,
        )
    }
}

fn sample_coordinate<R: Rng + ?Sized>(rng: &mut R, bounds: f32) -> f32 {
    if bounds > 0.0 {
        rng.random_range(0.0..=bounds)
    } else {
        0.0
    }
}

/// A bouncing box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub handle: VisualHandle,
    pub color: [f32; 3],
    pub kinematics: Kinematics,
}

impl Entity {
    pub fn position(&self) -> Vec3 {
        self.kinematics.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.kinematics.velocity
    }

    pub fn rotation(&self) -> Vec3 {
        self.kinematics.rotation
    }
}
