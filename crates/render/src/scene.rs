use std::collections::BTreeMap;

use bouncebox_common::{BoxVisual, VisualHandle};
use bouncebox_kernel::VisualBackend;
use glam::Vec3;

/// A box as the scene sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBox {
    pub size: f32,
    pub color: [f32; 3],
    pub position: Vec3,
    pub rotation: Vec3,
}

impl From<&BoxVisual> for SceneBox {
    fn from(v: &BoxVisual) -> Self {
        Self {
            size: v.size,
            color: v.color,
            position: v.position,
            rotation: v.rotation,
        }
    }
}

/// In-memory scene implementing [`VisualBackend`].
///
/// Handles are issued from a monotonically increasing counter and never
/// reused. Writes to a handle that is not live are counted as stale instead
/// of being applied.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    boxes: BTreeMap<VisualHandle, SceneBox>,
    next_handle: u64,
    created: u64,
    disposed: u64,
    stale: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxes currently in the scene.
    pub fn live(&self) -> usize {
        self.boxes.len()
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn disposed(&self) -> u64 {
        self.disposed
    }

    /// Writes or disposals aimed at handles that were not live.
    pub fn stale_accesses(&self) -> u64 {
        self.stale
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&SceneBox> {
        self.boxes.get(&handle)
    }

    pub fn boxes(&self) -> impl Iterator<Item = (VisualHandle, &SceneBox)> {
        self.boxes.iter().map(|(h, b)| (*h, b))
    }

    fn with_box(&mut self, handle: VisualHandle, f: impl FnOnce(&mut SceneBox)) {
        match self.boxes.get_mut(&handle) {
            Some(b) => f(b),
            None => {
                self.stale += 1;
                tracing::warn!(?handle, "write to stale visual handle");
            }
        }
    }
}

impl VisualBackend for HeadlessScene {
    fn create(&mut self, visual: &BoxVisual) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.boxes.insert(handle, SceneBox::from(visual));
        self.created += 1;
        handle
    }

    fn set_position(&mut self, handle: VisualHandle, position: Vec3) {
        self.with_box(handle, |b| b.position = position);
    }

    fn set_rotation(&mut self, handle: VisualHandle, rotation: Vec3) {
        self.with_box(handle, |b| b.rotation = rotation);
    }

    fn dispose(&mut self, handle: VisualHandle) {
        if self.boxes.remove(&handle).is_some() {
            self.disposed += 1;
        } else {
            self.stale += 1;
            tracing::warn!(?handle, "dispose of unknown visual handle");
        }
    }
}
