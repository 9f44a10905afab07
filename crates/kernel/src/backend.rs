use bouncebox_common::{BoxVisual, VisualHandle};
use glam::Vec3;

/// Capability interface onto the presentation layer's visuals.
///
/// The kernel holds only the handles this trait hands out. It pushes position
/// and rotation after each step and disposes a handle exactly once when its
/// entity leaves the pool.
pub trait VisualBackend {
    /// Materialize a new box and return a handle to it.
    fn create(&mut self, visual: &BoxVisual) -> VisualHandle;

    fn set_position(&mut self, handle: VisualHandle, position: Vec3);

    fn set_rotation(&mut self, handle: VisualHandle, rotation: Vec3);

    /// Release the visual. The handle is never used again afterwards.
    fn dispose(&mut self, handle: VisualHandle);
}
