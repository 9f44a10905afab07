use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier for an entity in the pool.
///
/// Ids are allocated from a per-simulation counter, so they are unique across
/// pool generations and reproducible for a given sequence of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to a visual owned by the presentation layer.
///
/// The core never interprets the value; it only hands it back to the backend
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// One of the three world axes. Reflection is resolved per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vec3`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Everything a backend needs to materialize a new box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxVisual {
    /// Edge length of the cube.
    pub size: f32,
    /// Emissive color, each channel in `[0, 1)`.
    pub color: [f32; 3],
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for BoxVisual {
    fn default() -> Self {
        Self {
            size: 2.0,
            color: [1.0, 1.0, 1.0],
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_indices_cover_vec3() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let picked: Vec<f32> = Axis::ALL.iter().map(|a| v[a.index()]).collect();
        assert_eq!(picked, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId(7).to_string(), "#7");
    }

    #[test]
    fn entity_ids_order_by_value() {
        let mut ids = vec![EntityId(3), EntityId(1), EntityId(2)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(1), EntityId(2), EntityId(3)]);
    }

    #[test]
    fn box_visual_default_matches_unit_box() {
        let v = BoxVisual::default();
        assert_eq!(v.size, 2.0);
        assert_eq!(v.position, Vec3::ZERO);
    }
}
