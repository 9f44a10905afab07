use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::motion::{MIN_LINEAR_SPEED, round_bounds};

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] SimError),
    #[error("invalid {name} range {min}..{max}: bounds must be finite with {floor} <= min < max")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
        floor: f32,
    },
}

/// Half-open sampling range for per-axis speeds.
///
/// `min` is strictly positive so a freshly sampled component is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str, floor: f32) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min >= floor
            && self.min < self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
                floor,
            })
        }
    }

    /// Draw one value in `[min, max)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.random_range(self.min..self.max)
    }
}

/// Simulation configuration.
///
/// Every field has a default, so a config file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Initial edge length of the world cube.
    pub world_bounds: f64,
    /// Number of boxes spawned at startup.
    pub entity_count: usize,
    /// Upper limit accepted by count changes.
    pub max_entities: usize,
    pub seed: u64,
    pub motion_enabled: bool,
    pub rotation_enabled: bool,
    /// Per-axis linear speed, units per tick.
    pub speed: SpeedRange,
    /// Per-axis angular speed, radians per tick.
    pub spin: SpeedRange,
    /// Edge length handed to the backend for each box.
    pub box_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_bounds: 100.0,
            entity_count: 100,
            max_entities: 500,
            seed: 42,
            motion_enabled: true,
            rotation_enabled: true,
            speed: SpeedRange::new(0.05, 0.5),
            spin: SpeedRange::new(0.005, 0.1),
            box_size: 2.0,
        }
    }
}

impl SimConfig {
    /// Parse a config from YAML text. Does not validate.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        round_bounds(self.world_bounds)?;
        if self.entity_count > self.max_entities {
            return Err(SimError::CountExceedsLimit {
                requested: self.entity_count,
                limit: self.max_entities,
            }
            .into());
        }
        self.speed.validate("speed", MIN_LINEAR_SPEED)?;
        self.spin.validate("spin", 0.0)?;
        if !(self.box_size.is_finite() && self.box_size > 0.0) {
            return Err(ConfigError::InvalidRange {
                name: "box_size",
                min: self.box_size,
                max: self.box_size,
                floor: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SimConfig::from_yaml_str("world_bounds: 250\nentity_count: 3\n").unwrap();
        assert_eq!(config.world_bounds, 250.0);
        assert_eq!(config.entity_count, 3);
        assert_eq!(config.max_entities, 500);
        assert!(config.rotation_enabled);
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let config = SimConfig {
            seed: 9,
            motion_enabled: false,
            speed: SpeedRange::new(0.1, 0.2),
            ..SimConfig::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = SimConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_negative_bounds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"world_bounds: -5\n").unwrap();
        let err = SimConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(SimError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn count_above_limit_is_rejected() {
        let config = SimConfig {
            entity_count: 501,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(SimError::CountExceedsLimit { .. }))
        ));
    }

    #[test]
    fn zero_min_speed_is_rejected() {
        let config = SimConfig {
            speed: SpeedRange::new(0.0, 0.5),
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "speed", .. })
        ));
    }

    #[test]
    fn speed_below_floor_is_rejected() {
        let config = SimConfig {
            speed: SpeedRange::new(0.0005, 0.5),
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "speed", .. })
        ));
    }

    #[test]
    fn huge_bounds_are_rejected() {
        let config = SimConfig {
            world_bounds: 4e7,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(SimError::InvalidBounds { .. }))
        ));
    }

    #[test]
    fn inverted_spin_range_is_rejected() {
        let config = SimConfig {
            spin: SpeedRange::new(0.2, 0.1),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn samples_stay_in_range_and_nonzero() {
        let range = SpeedRange::new(0.05, 0.5);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!(v >= 0.05 && v < 0.5);
        }
    }
}
