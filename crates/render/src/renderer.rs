use glam::Vec3;

use crate::scene::HeadlessScene;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Background clear color.
    pub clear_color: [f32; 3],
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(50.0, 50.0, 50.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            clear_color: [0.8, 0.8, 0.8],
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene the kernel has been writing into and never
/// talks to the kernel itself.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` from `view`.
    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the scene.
///
/// Used for CLI output and for testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Maximum boxes listed individually. `None` lists all.
    pub limit: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Scene ({} boxes) ===\n", scene.live()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        let limit = self.limit.unwrap_or(usize::MAX);
        for (handle, b) in scene.boxes().take(limit) {
            out.push_str(&format!(
                "  [{:>4}] pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2})\n",
                handle.0,
                b.position.x,
                b.position.y,
                b.position.z,
                b.rotation.x,
                b.rotation.y,
                b.rotation.z,
                b.color[0],
                b.color[1],
                b.color[2],
            ));
        }
        if scene.live() > limit {
            out.push_str(&format!("  ... {} more\n", scene.live() - limit));
        }

        out
    }
}
