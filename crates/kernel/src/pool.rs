use bouncebox_common::{BoxVisual, EntityId};
use rand::Rng;

use crate::backend::VisualBackend;
use crate::entity::{Entity, SpawnParams};
use crate::motion::BoundedMotionEngine;

/// Owns every live entity.
///
/// Resizing builds a complete new generation, swaps it in with one
/// assignment and only then disposes the previous generation's visuals.
#[derive(Debug, Default)]
pub struct EntityPool {
    entities: Vec<Entity>,
    next_id: u64,
    generation: u64,
}

impl EntityPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of completed resizes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Replace the pool with exactly `n` freshly randomized entities.
    ///
    /// Positions are sampled inside the engine's current bounds.
    pub fn set_size<B, R>(
        &mut self,
        n: usize,
        engine: &BoundedMotionEngine,
        params: &SpawnParams,
        rng: &mut R,
        backend: &mut B,
    ) where
        B: VisualBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let bounds = engine.world_bounds();
        let mut next = Vec::with_capacity(n);
        for _ in 0..n {
            let (kinematics, color) = params.sample(rng, bounds);
            let id = EntityId(self.next_id);
            self.next_id += 1;
            let handle = backend.create(&BoxVisual {
                size: params.box_size,
                color,
                position: kinematics.position,
                rotation: kinematics.rotation,
            });
            next.push(Entity {
                id,
                handle,
                color,
                kinematics,
            });
        }

        let old = std::mem::replace(&mut self.entities, next);
        let disposed = old.len();
        for entity in old {
            backend.dispose(entity.handle);
        }
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            disposed,
            created = n,
            bounds,
            "entity pool resized"
        );
    }

    /// Dispose every entity, leaving the pool empty.
    pub fn clear<B: VisualBackend + ?Sized>(&mut self, backend: &mut B) {
        for entity in self.entities.drain(..) {
            backend.dispose(entity.handle);
        }
    }

    /// Move every entity one step and push the new positions to the backend.
    /// Returns the total number of axis reflections.
    pub fn tick_move<B: VisualBackend + ?Sized>(
        &mut self,
        engine: &BoundedMotionEngine,
        backend: &mut B,
    ) -> usize {
        let mut reflections = 0;
        for entity in &mut self.entities {
            reflections += engine.move_entity(&mut entity.kinematics).count();
            backend.set_position(entity.handle, entity.kinematics.position);
        }
        reflections
    }

    /// Rotate every entity one step and push the new rotations to the backend.
    pub fn tick_rotate<B: VisualBackend + ?Sized>(
        &mut self,
        engine: &BoundedMotionEngine,
        backend: &mut B,
    ) {
        for entity in &mut self.entities {
            engine.rotate_entity(&mut entity.kinematics);
            backend.set_rotation(entity.handle, entity.kinematics.rotation);
        }
    }

    /// Entities with at least one coordinate outside `[0, bounds]`.
    pub fn count_outside(&self, engine: &BoundedMotionEngine) -> usize {
        self.entities
            .iter()
            .filter(|e| !engine.contains(e.kinematics.position))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::CountingBackend;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::BTreeSet;

    fn resize(
        pool: &mut EntityPool,
        n: usize,
        engine: &BoundedMotionEngine,
        backend: &mut CountingBackend,
    ) {
        let mut rng = Pcg32::seed_from_u64(5);
        pool.set_size(n, engine, &SpawnParams::default(), &mut rng, backend);
    }

    #[test]
    fn resize_is_exact() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        for n in [0, 1, 500] {
            resize(&mut pool, n, &engine, &mut backend);
            assert_eq!(pool.len(), n);
            assert_eq!(backend.live.len(), n);
        }
        assert_eq!(backend.created, 501);
    }

    #[test]
    fn previous_generation_disposed_exactly_once() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();

        resize(&mut pool, 20, &engine, &mut backend);
        let first: BTreeSet<_> = pool.iter().map(|e| e.handle).collect();
        resize(&mut pool, 7, &engine, &mut backend);
        let second: BTreeSet<_> = pool.iter().map(|e| e.handle).collect();
        resize(&mut pool, 0, &engine, &mut backend);

        let disposed: Vec<_> = backend.disposed.clone();
        let unique: BTreeSet<_> = disposed.iter().copied().collect();
        assert_eq!(disposed.len(), 27);
        assert_eq!(unique.len(), 27);
        assert!(first.is_subset(&unique));
        assert!(second.is_subset(&unique));
        assert!(pool.is_empty());
        assert!(backend.live.is_empty());
        assert_eq!(pool.generation(), 3);
    }

    #[test]
    fn new_generation_uses_fresh_ids() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 3, &engine, &mut backend);
        let old_ids: Vec<_> = pool.iter().map(|e| e.id).collect();
        resize(&mut pool, 3, &engine, &mut backend);
        for id in old_ids {
            assert!(pool.get(id).is_none());
        }
    }

    #[test]
    fn spawn_positions_follow_current_bounds() {
        let mut engine = BoundedMotionEngine::default();
        engine.set_world_bounds(10.0).unwrap();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 200, &engine, &mut backend);
        assert_eq!(pool.count_outside(&engine), 0);
        assert!(pool.iter().all(|e| e.position().max_element() <= 10.0));
    }

    #[test]
    fn tick_move_pushes_positions() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 4, &engine, &mut backend);

        pool.tick_move(&engine, &mut backend);
        assert_eq!(backend.position_writes, 4);
        assert_eq!(backend.rotation_writes, 0);
        for e in pool.iter() {
            assert_eq!(backend.live[&e.handle].0, e.position());
        }
    }

    #[test]
    fn tick_rotate_leaves_positions_alone() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 4, &engine, &mut backend);
        let before: Vec<_> = pool.iter().map(|e| e.position()).collect();

        pool.tick_rotate(&engine, &mut backend);
        let after: Vec<_> = pool.iter().map(|e| e.position()).collect();
        assert_eq!(before, after);
        assert_eq!(backend.rotation_writes, 4);
        assert!(pool.iter().all(|e| e.rotation().min_element() > 0.0));
    }

    #[test]
    fn empty_pool_does_no_work() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 0, &engine, &mut backend);
        assert_eq!(pool.tick_move(&engine, &mut backend), 0);
        pool.tick_rotate(&engine, &mut backend);
        assert_eq!(backend.position_writes + backend.rotation_writes, 0);
    }

    #[test]
    fn clear_disposes_everything() {
        let engine = BoundedMotionEngine::default();
        let mut backend = CountingBackend::default();
        let mut pool = EntityPool::new();
        resize(&mut pool, 5, &engine, &mut backend);
        pool.clear(&mut backend);
        assert!(pool.is_empty());
        assert_eq!(backend.disposed.len(), 5);
    }
}
