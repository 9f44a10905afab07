use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::backend::VisualBackend;
use crate::config::{ConfigError, SimConfig};
use crate::control::Control;
use crate::entity::SpawnParams;
use crate::error::SimError;
use crate::motion::BoundedMotionEngine;
use crate::pool::EntityPool;

/// A record of every discrete change made to the simulation.
///
/// Per-tick motion is not logged; only user-driven changes are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BoundsChanged {
        old: f32,
        new: f32,
    },
    PoolResized {
        generation: u64,
        old_len: usize,
        new_len: usize,
    },
    MotionToggled {
        enabled: bool,
    },
    RotationToggled {
        enabled: bool,
    },
    /// A queued control failed validation and was skipped.
    ControlRejected {
        control: Control,
        reason: String,
    },
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub tick: u64,
    pub moved: bool,
    pub rotated: bool,
    /// Axis velocity inversions across all entities.
    pub reflections: usize,
}

/// Result of one [`Simulation::frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub applied: usize,
    pub rejected: usize,
    pub stats: TickStats,
}

/// Single-threaded driver for the bouncing boxes.
///
/// Owns the motion engine, the entity pool and the presentation backend.
/// The presentation layer calls [`tick`](Self::tick) once per frame and
/// either applies controls directly between frames or queues them with
/// [`enqueue`](Self::enqueue) for the next [`frame`](Self::frame).
#[derive(Debug)]
pub struct Simulation<B: VisualBackend> {
    engine: BoundedMotionEngine,
    pool: EntityPool,
    backend: B,
    rng: Pcg32,
    spawn: SpawnParams,
    seed: u64,
    max_entities: usize,
    motion_enabled: bool,
    rotation_enabled: bool,
    tick: u64,
    pending: Vec<Control>,
    event_log: Vec<SimEvent>,
}

impl<B: VisualBackend> Simulation<B> {
    /// Validate `config` and spawn its initial boxes into `backend`.
    pub fn new(config: &SimConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            engine: BoundedMotionEngine::new(config.world_bounds)?,
            pool: EntityPool::new(),
            backend,
            rng: Pcg32::seed_from_u64(config.seed),
            spawn: SpawnParams::from(config),
            seed: config.seed,
            max_entities: config.max_entities,
            motion_enabled: config.motion_enabled,
            rotation_enabled: config.rotation_enabled,
            tick: 0,
            pending: Vec::new(),
            event_log: Vec::new(),
        };
        sim.resize(config.entity_count);
        tracing::info!(
            bounds = sim.engine.world_bounds(),
            entities = sim.pool.len(),
            seed = sim.seed,
            "simulation created"
        );
        Ok(sim)
    }

    pub fn engine(&self) -> &BoundedMotionEngine {
        &self.engine
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn world_bounds(&self) -> f32 {
        self.engine.world_bounds()
    }

    pub fn entity_count(&self) -> usize {
        self.pool.len()
    }

    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn pending_controls(&self) -> &[Control] {
        &self.pending
    }

    /// Validate, round and store new world bounds. Returns the stored value.
    pub fn set_world_bounds(&mut self, value: f64) -> Result<f32, SimError> {
        let old = self.engine.world_bounds();
        let new = self.engine.set_world_bounds(value)?;
        tracing::info!(before = old, after = new, "world bounds changed");
        self.event_log.push(SimEvent::BoundsChanged { old, new });
        Ok(new)
    }

    /// Replace every box with `n` new ones.
    pub fn set_entity_count(&mut self, n: usize) -> Result<(), SimError> {
        if n > self.max_entities {
            return Err(SimError::CountExceedsLimit {
                requested: n,
                limit: self.max_entities,
            });
        }
        self.resize(n);
        Ok(())
    }

    /// Same as [`set_entity_count`](Self::set_entity_count) for a raw widget value.
    pub fn set_entity_count_value(&mut self, value: f64) -> Result<(), SimError> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(SimError::InvalidCount { value });
        }
        if value > self.max_entities as f64 {
            return Err(SimError::CountExceedsLimit {
                requested: value as usize,
                limit: self.max_entities,
            });
        }
        self.set_entity_count(value as usize)
    }

    pub fn set_motion_enabled(&mut self, enabled: bool) {
        if self.motion_enabled != enabled {
            self.motion_enabled = enabled;
            tracing::info!(enabled, "box movement toggled");
            self.event_log.push(SimEvent::MotionToggled { enabled });
        }
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        if self.rotation_enabled != enabled {
            self.rotation_enabled = enabled;
            tracing::info!(enabled, "box rotation toggled");
            self.event_log.push(SimEvent::RotationToggled { enabled });
        }
    }

    /// Flip motion on/off. Returns the new state.
    pub fn toggle_motion(&mut self) -> bool {
        self.set_motion_enabled(!self.motion_enabled);
        self.motion_enabled
    }

    /// Flip rotation on/off. Returns the new state.
    pub fn toggle_rotation(&mut self) -> bool {
        self.set_rotation_enabled(!self.rotation_enabled);
        self.rotation_enabled
    }

    /// Apply a control immediately. Must not be called from inside a tick.
    pub fn apply(&mut self, control: Control) -> Result<(), SimError> {
        match control {
            Control::SetWorldBounds(value) => self.set_world_bounds(value).map(|_| ()),
            Control::SetEntityCount(value) => self.set_entity_count_value(value),
            Control::SetMotion(enabled) => {
                self.set_motion_enabled(enabled);
                Ok(())
            }
            Control::SetRotation(enabled) => {
                self.set_rotation_enabled(enabled);
                Ok(())
            }
            Control::ToggleMotion => {
                self.toggle_motion();
                Ok(())
            }
            Control::ToggleRotation => {
                self.toggle_rotation();
                Ok(())
            }
        }
    }

    /// Queue a control for the start of the next [`frame`](Self::frame).
    pub fn enqueue(&mut self, control: Control) {
        self.pending.push(control);
    }

    /// Apply every queued control in order, then run one tick.
    ///
    /// A rejected control is logged and skipped; later ones still apply.
    pub fn frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        for control in std::mem::take(&mut self.pending) {
            match self.apply(control) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    tracing::warn!(?control, "rejected control: {e}");
                    self.event_log.push(SimEvent::ControlRejected {
                        control,
                        reason: e.to_string(),
                    });
                    report.rejected += 1;
                }
            }
        }
        report.stats = self.tick();
        report
    }

    /// Advance one fixed step: move (if enabled), then rotate (if enabled).
    pub fn tick(&mut self) -> TickStats {
        self.tick += 1;
        let _span = tracing::info_span!("tick", tick = self.tick).entered();

        let mut stats = TickStats {
            tick: self.tick,
            ..TickStats::default()
        };
        if self.motion_enabled {
            stats.reflections = self.pool.tick_move(&self.engine, &mut self.backend);
            stats.moved = true;
        }
        if self.rotation_enabled {
            self.pool.tick_rotate(&self.engine, &mut self.backend);
            stats.rotated = true;
        }

        tracing::trace!(
            moved = stats.moved,
            rotated = stats.rotated,
            reflections = stats.reflections,
            "tick complete"
        );
        stats
    }

    /// Run `n` ticks back to back.
    pub fn run(&mut self, n: u64) -> u64 {
        let mut reflections = 0;
        for _ in 0..n {
            reflections += self.tick().reflections as u64;
        }
        reflections
    }

    /// Boxes with at least one coordinate outside the current bounds.
    pub fn count_outside(&self) -> usize {
        self.pool.count_outside(&self.engine)
    }

    /// Deterministic hash over tick, bounds, flags and every entity's kinematics.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.engine.world_bounds().to_le_bytes());
        mix(&mut h, &[self.motion_enabled as u8, self.rotation_enabled as u8]);
        for entity in self.pool.iter() {
            let k = &entity.kinematics;
            mix(&mut h, &entity.id.0.to_le_bytes());
            for v in [k.position, k.velocity, k.rotation, k.angular_velocity] {
                for c in v.to_array() {
                    mix(&mut h, &c.to_le_bytes());
                }
            }
        }
        h
    }

    /// Dispose every box and hand the backend back.
    pub fn shutdown(mut self) -> B {
        self.pool.clear(&mut self.backend);
        self.backend
    }

    fn resize(&mut self, n: usize) {
        let old_len = self.pool.len();
        self.pool.set_size(
            n,
            &self.engine,
            &self.spawn,
            &mut self.rng,
            &mut self.backend,
        );
        tracing::info!(before = old_len, after = n, "entity count changed");
        self.event_log.push(SimEvent::PoolResized {
            generation: self.pool.generation(),
            old_len,
            new_len: n,
        });
    }
}
