use bouncebox_common::EntityId;
use bouncebox_kernel::{Entity, Simulation, VisualBackend};
use serde::Serialize;

/// Simulation inspector for developer tooling.
///
/// Provides read-only queries against a simulation for debugging and
/// development UI.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary<B: VisualBackend>(sim: &Simulation<B>) -> SimSummary {
        let mut min_speed = f32::INFINITY;
        let mut max_speed: f32 = 0.0;
        for e in sim.pool().iter() {
            let v = e.velocity().abs();
            min_speed = min_speed.min(v.min_element());
            max_speed = max_speed.max(v.max_element());
        }
        if sim.pool().is_empty() {
            min_speed = 0.0;
        }

        SimSummary {
            tick: sim.tick_count(),
            seed: sim.seed(),
            world_bounds: sim.world_bounds(),
            entity_count: sim.entity_count(),
            outside: sim.count_outside(),
            generation: sim.pool().generation(),
            motion_enabled: sim.motion_enabled(),
            rotation_enabled: sim.rotation_enabled(),
            logged_events: sim.events().len(),
            pending_controls: sim.pending_controls().len(),
            min_axis_speed: min_speed,
            max_axis_speed: max_speed,
            state_hash: sim.state_hash(),
        }
    }

    pub fn inspect_entity<B: VisualBackend>(sim: &Simulation<B>, id: EntityId) -> Option<EntityInfo> {
        sim.pool()
            .get(id)
            .map(|e| EntityInfo::from_entity(e, sim.world_bounds()))
    }

    /// List all entity IDs in pool order.
    pub fn list_entities<B: VisualBackend>(sim: &Simulation<B>) -> Vec<EntityId> {
        sim.pool().iter().map(|e| e.id).collect()
    }

    /// Entities whose position lies outside the current bounds.
    pub fn outside_entities<B: VisualBackend>(sim: &Simulation<B>) -> Vec<EntityInfo> {
        let bounds = sim.world_bounds();
        sim.pool()
            .iter()
            .filter(|e| !sim.engine().contains(e.position()))
            .map(|e| EntityInfo::from_entity(e, bounds))
            .collect()
    }

    /// True when every coordinate is within one step of `[0, world_bounds]`.
    ///
    /// A bouncing box can sit up to one velocity step past a face on the tick
    /// it reflects, so this is the settled state after a shrink.
    pub fn settled<B: VisualBackend>(sim: &Simulation<B>) -> bool {
        let bounds = sim.world_bounds();
        sim.pool().iter().all(|e| {
            let p = e.position().to_array();
            let v = e.velocity().abs().to_array();
            p.iter()
                .zip(v)
                .all(|(c, reach)| *c >= -reach && *c <= bounds + reach)
        })
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    pub seed: u64,
    pub world_bounds: f32,
    pub entity_count: usize,
    /// Entities with a coordinate outside `[0, world_bounds]`.
    pub outside: usize,
    pub generation: u64,
    pub motion_enabled: bool,
    pub rotation_enabled: bool,
    /// Entries in the simulation event log.
    pub logged_events: usize,
    /// Controls queued for the next frame.
    pub pending_controls: usize,
    pub min_axis_speed: f32,
    pub max_axis_speed: f32,
    pub state_hash: u64,
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim: tick={} seed={} bounds={} boxes={} outside={} motion={} rotation={} hash={:#x}",
            self.tick,
            self.seed,
            self.world_bounds,
            self.entity_count,
            self.outside,
            on_off(self.motion_enabled),
            on_off(self.rotation_enabled),
            self.state_hash,
        )
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub rotation: [f32; 3],
    /// Distance past the nearest face per axis, zero when inside.
    pub overshoot: [f32; 3],
}

impl EntityInfo {
    fn from_entity(e: &Entity, bounds: f32) -> Self {
        let p = e.position();
        let overshoot = p.to_array().map(|c| {
            if c < 0.0 {
                -c
            } else if c > bounds {
                c - bounds
            } else {
                0.0
            }
        });
        Self {
            id: e.id,
            position: p.to_array(),
            velocity: e.velocity().to_array(),
            rotation: e.rotation().to_array(),
            overshoot,
        }
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2})",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncebox_kernel::SimConfig;
    use bouncebox_render::HeadlessScene;

    fn sim(entity_count: usize) -> Simulation<HeadlessScene> {
        let config = SimConfig {
            entity_count,
            ..SimConfig::default()
        };
        Simulation::new(&config, HeadlessScene::new()).unwrap()
    }

    #[test]
    fn summary_empty_pool() {
        let s = SimInspector::summary(&sim(0));
        assert_eq!(s.tick, 0);
        assert_eq!(s.entity_count, 0);
        assert_eq!(s.outside, 0);
        assert_eq!(s.min_axis_speed, 0.0);
    }

    #[test]
    fn summary_tracks_ticks_and_speeds() {
        let mut sim = sim(20);
        sim.run(3);
        let s = SimInspector::summary(&sim);
        assert_eq!(s.tick, 3);
        assert_eq!(s.entity_count, 20);
        assert!(s.min_axis_speed >= 0.05);
        assert!(s.max_axis_speed < 0.5);
    }

    #[test]
    fn outside_entities_after_shrink() {
        let mut sim = sim(50);
        sim.set_world_bounds(1.0).unwrap();
        let outside = SimInspector::outside_entities(&sim);
        assert_eq!(outside.len(), sim.count_outside());
        assert!(!outside.is_empty());
        assert!(outside.iter().all(|e| e.overshoot.iter().any(|o| *o > 0.0)));
    }

    #[test]
    fn settles_after_shrink() {
        let mut sim = sim(30);
        assert!(SimInspector::settled(&sim));
        sim.set_world_bounds(10.0).unwrap();
        assert!(!SimInspector::settled(&sim));
        sim.run(2100);
        assert!(SimInspector::settled(&sim));
    }

    #[test]
    fn inspect_entity_found_and_missing() {
        let sim = sim(3);
        let ids = SimInspector::list_entities(&sim);
        assert_eq!(ids.len(), 3);
        let info = SimInspector::inspect_entity(&sim, ids[0]).unwrap();
        assert_eq!(info.overshoot, [0.0, 0.0, 0.0]);
        assert!(SimInspector::inspect_entity(&sim, EntityId(9999)).is_none());
    }

    #[test]
    fn summary_display_and_json() {
        let s = SimInspector::summary(&sim(2));
        let text = format!("{s}");
        assert!(text.contains("boxes=2"));
        assert!(text.contains("motion=on"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["entity_count"], 2);
    }

    #[test]
    fn summary_separates_log_from_queue() {
        let mut sim = sim(2);
        sim.enqueue(bouncebox_kernel::Control::ToggleMotion);
        sim.enqueue(bouncebox_kernel::Control::SetWorldBounds(-3.0));
        let s = SimInspector::summary(&sim);
        assert_eq!(s.pending_controls, 2);
        assert_eq!(s.logged_events, sim.events().len());

        sim.frame();
        let s = SimInspector::summary(&sim);
        assert_eq!(s.pending_controls, 0);
        assert_eq!(s.logged_events, sim.events().len());
        assert!(!s.motion_enabled);
    }
}
