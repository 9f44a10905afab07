use bouncebox_kernel::{Control, SimConfig, Simulation, VisualBackend};

/// A horizontal slider with an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl Slider {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self {
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    /// Move the thumb; the value is clamped to the range.
    pub fn slide(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Value as shown in the slider's caption.
    pub fn display_value(&self) -> i64 {
        self.value.round() as i64
    }
}

/// Toolkit-independent model of the options panel.
///
/// Holds what the widgets show and turns clicks into kernel [`Control`]s.
/// Toggle buttons flip their own caption immediately; sliders only reach the
/// kernel when their "Apply" button is pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub visible: bool,
    pub rotation_on: bool,
    pub motion_on: bool,
    pub count: Slider,
    pub bounds: Slider,
}

impl ControlPanel {
    pub const CONTROLS_HELP: &'static str =
        "Controls\nUse the arrow keys to move and\nleft click to rotate the camera";

    /// Top of the world bounds slider, unless the config starts larger.
    pub const BOUNDS_SLIDER_MAX: f64 = 500.0;

    pub fn new(config: &SimConfig) -> Self {
        Self {
            visible: true,
            rotation_on: config.rotation_enabled,
            motion_on: config.motion_enabled,
            count: Slider::new(0.0, config.max_entities as f64, config.entity_count as f64),
            bounds: Slider::new(
                0.0,
                Self::BOUNDS_SLIDER_MAX.max(config.world_bounds),
                config.world_bounds,
            ),
        }
    }

    /// Refresh widget state from the simulation.
    pub fn sync<B: VisualBackend>(&mut self, sim: &Simulation<B>) {
        self.rotation_on = sim.rotation_enabled();
        self.motion_on = sim.motion_enabled();
        self.bounds.slide(f64::from(sim.world_bounds()));
    }

    pub fn visibility_label(&self) -> &'static str {
        if self.visible {
            "Hide Options"
        } else {
            "Show Options"
        }
    }

    pub fn rotation_label(&self) -> &'static str {
        if self.rotation_on {
            "Box Rotation: On"
        } else {
            "Box Rotation: Off"
        }
    }

    pub fn motion_label(&self) -> &'static str {
        if self.motion_on {
            "Box Movement: On"
        } else {
            "Box Movement: Off"
        }
    }

    pub fn count_label(&self) -> String {
        format!("Number of Boxes: {}", self.count.display_value())
    }

    pub fn bounds_label(&self) -> String {
        format!("World Bounds: {}", self.bounds.display_value())
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn click_rotation(&mut self) -> Control {
        self.rotation_on = !self.rotation_on;
        Control::ToggleRotation
    }

    pub fn click_motion(&mut self) -> Control {
        self.motion_on = !self.motion_on;
        Control::ToggleMotion
    }

    /// "Apply" under the box count slider. Sends the rounded slider value.
    pub fn apply_count(&self) -> Control {
        Control::SetEntityCount(self.count.value.round())
    }

    /// "Apply" under the world bounds slider.
    pub fn apply_bounds(&self) -> Control {
        Control::SetWorldBounds(self.bounds.value)
    }

    /// Every caption in top-to-bottom order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = vec![self.visibility_label().to_string()];
        if self.visible {
            labels.extend([
                self.rotation_label().to_string(),
                self.motion_label().to_string(),
                self.count_label(),
                self.bounds_label(),
                Self::CONTROLS_HELP.to_string(),
            ]);
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadlessScene;

    #[test]
    fn default_labels() {
        let panel = ControlPanel::new(&SimConfig::default());
        let labels = panel.labels();
        assert_eq!(labels[0], "Hide Options");
        assert_eq!(labels[1], "Box Rotation: On");
        assert_eq!(labels[2], "Box Movement: On");
        assert_eq!(labels[3], "Number of Boxes: 100");
        assert_eq!(labels[4], "World Bounds: 100");
    }

    #[test]
    fn hidden_panel_only_shows_toggle() {
        let mut panel = ControlPanel::new(&SimConfig::default());
        panel.toggle_visibility();
        assert_eq!(panel.labels(), vec!["Show Options".to_string()]);
    }

    #[test]
    fn slider_caption_rounds_and_clamps() {
        let mut panel = ControlPanel::new(&SimConfig::default());
        panel.bounds.slide(72.6);
        assert_eq!(panel.bounds_label(), "World Bounds: 73");
        panel.count.slide(900.0);
        assert_eq!(panel.count_label(), "Number of Boxes: 500");
        panel.count.slide(-4.0);
        assert_eq!(panel.count.value, 0.0);
    }

    #[test]
    fn slider_ranges_follow_config() {
        let panel = ControlPanel::new(&SimConfig::default());
        assert_eq!(panel.count.max, 500.0);
        assert_eq!(panel.bounds.max, ControlPanel::BOUNDS_SLIDER_MAX);

        let config = SimConfig {
            world_bounds: 2_000.0,
            max_entities: 50,
            entity_count: 10,
            ..SimConfig::default()
        };
        let panel = ControlPanel::new(&config);
        assert_eq!(panel.count.max, 50.0);
        assert_eq!(panel.bounds.max, 2_000.0);
        assert_eq!(panel.bounds_label(), "World Bounds: 2000");
    }

    #[test]
    fn clicks_drive_the_simulation() {
        let config = SimConfig {
            entity_count: 10,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(&config, HeadlessScene::new()).unwrap();
        let mut panel = ControlPanel::new(&config);

        sim.enqueue(panel.click_rotation());
        assert_eq!(panel.rotation_label(), "Box Rotation: Off");
        panel.count.slide(41.7);
        sim.enqueue(panel.apply_count());
        panel.bounds.slide(33.4);
        sim.enqueue(panel.apply_bounds());

        let report = sim.frame();
        assert_eq!(report.rejected, 0);
        assert!(!sim.rotation_enabled());
        assert_eq!(sim.entity_count(), 42);
        assert_eq!(sim.world_bounds(), 33.0);

        panel.sync(&sim);
        assert_eq!(panel.bounds_label(), "World Bounds: 33");
        assert!(!panel.rotation_on);
    }
}
