//! Particle pool: spawning, per-tick integration and culling.
//!
//! The pool owns every live particle, the spawn timer and the RNG. A tick
//! reads one consistent snapshot: the [`Population`] aggregate is computed
//! before any particle moves, every survivor is written into a fresh
//! collection, and the collection is swapped in at the end. Update order
//! therefore never affects the outcome.
//!
//! # Lifecycle
//!
//! ```text
//! spawn_if_due / spawn_at ──► active ──tick──► active ...
//!                               │
//!                               └─ non-finite | d > 30 | scale floor | consumed
//!                                    ──► inactive (removed)
//! ```

use crate::config::SimConfig;
use crate::emitter::{Emitter, SpawnTimer};
use crate::forces::{self, Population};
use crate::guard;
use crate::particle::{Particle, ParticleId, ParticleInstance};
use crate::spawn::SpawnContext;
use crate::visuals::Palette;
use glam::Vec3;

/// Hard population ceiling. Spawns are skipped while the pool is full.
pub const MAX_PARTICLES: usize = 120;

/// Owner of the live particle set.
#[derive(Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    next_id: ParticleId,
    timer: SpawnTimer,
    emitter: Emitter,
    ctx: SpawnContext,
    capacity: usize,
}

impl ParticlePool {
    /// Empty pool seeded from the clock.
    pub fn new() -> Self {
        Self::with_context(SpawnContext::from_entropy())
    }

    /// Empty pool with a deterministic RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::with_context(SpawnContext::seeded(seed))
    }

    pub fn with_context(ctx: SpawnContext) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            next_id: 0,
            timer: SpawnTimer::new(),
            emitter: Emitter::default(),
            ctx,
            capacity: MAX_PARTICLES,
        }
    }

    /// Lower the population ceiling. Values above [`MAX_PARTICLES`] are clamped.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(MAX_PARTICLES);
        self
    }

    // ========== Spawning ==========

    /// Advance the spawn timer and emit at most one particle from the ring.
    ///
    /// When the timer fires while the pool is full, the spawn is dropped (not
    /// queued) and the timer still resets.
    pub fn spawn_if_due(&mut self, dt: f32, config: &SimConfig) -> Option<ParticleId> {
        if !self.timer.advance(dt, config.spawn_rate, &mut self.ctx) {
            return None;
        }
        self.spawn_from(self.emitter, config)
    }

    /// Spawn one particle at an impact point, aimed at the barrier.
    pub fn spawn_at(&mut self, point: Vec3, config: &SimConfig) -> Option<ParticleId> {
        if !point.is_finite() {
            return None;
        }
        self.spawn_from(Emitter::Impact { point }, config)
    }

    fn spawn_from(&mut self, emitter: Emitter, config: &SimConfig) -> Option<ParticleId> {
        if self.particles.len() >= self.capacity {
            tracing::trace!(len = self.particles.len(), "pool full, spawn skipped");
            return None;
        }

        let (min_speed, max_speed) = config.speed_band();
        let (position, velocity) = emitter.emit(&mut self.ctx, min_speed, max_speed);
        let color = Palette::for_theme(config.theme).projectile();

        let id = self.next_id;
        self.next_id += 1;
        self.particles.push(Particle::new(id, position, velocity, color));
        Some(id)
    }

    // ========== Integration ==========

    /// Advance every particle by `dt` under the configured technique and
    /// remove those that became inactive.
    ///
    /// `dt` is clamped again here, so callers may pass raw frame deltas.
    pub fn tick(&mut self, dt: f32, config: &SimConfig) {
        let dt = guard::clamp_delta(dt);
        let population = Population::from_particles(&self.particles);
        let before = self.particles.len();

        let mut next = Vec::with_capacity(before);
        for mut particle in self.particles.drain(..) {
            if !guard::check_before(&mut particle) {
                continue;
            }

            let step = forces::apply(
                config.technique,
                &particle,
                &population,
                dt,
                &config.tuning,
                &mut self.ctx,
            );
            particle.position = step.position;
            particle.velocity = step.velocity;
            particle.scale = step.scale;
            if step.consumed {
                particle.deactivate();
                continue;
            }

            guard::check_after(&mut particle);
            if particle.active {
                next.push(particle);
            }
        }
        self.particles = next;

        tracing::trace!(
            technique = %config.technique,
            active = population.active,
            trapped = population.trapped,
            removed = before - self.particles.len(),
            "tick"
        );
    }

    // ========== Accessors ==========

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for hosts that inject state (e.g. tests, editors).
    ///
    /// Inactive or non-finite particles placed here are removed on the next tick.
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    /// Aggregate over the current set.
    pub fn population(&self) -> Population {
        Population::from_particles(&self.particles)
    }

    /// Render records for every live particle.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(Particle::to_instance).collect()
    }

    /// Remove every particle and reset the spawn timer. Ids keep increasing.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.timer.reset();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::Technique;
    use glam::Vec4;

    fn config(technique: Technique) -> SimConfig {
        SimConfig {
            technique,
            spawn_rate: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_at_assigns_increasing_ids() {
        let mut pool = ParticlePool::seeded(1);
        let cfg = config(Technique::Neutral);
        let a = pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg).unwrap();
        let b = pool.spawn_at(Vec3::new(0.0, 0.0, 10.0), &cfg).unwrap();
        assert!(b > a);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_spawn_at_rejects_non_finite_point() {
        let mut pool = ParticlePool::seeded(1);
        assert!(pool.spawn_at(Vec3::splat(f32::NAN), &config(Technique::Red)).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_spawn_uses_theme_color() {
        let mut pool = ParticlePool::seeded(2);
        let cfg = SimConfig {
            theme: crate::technique::Theme::Light,
            ..config(Technique::Neutral)
        };
        pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg);
        assert_eq!(pool.particles()[0].color, Palette::LIGHT.projectile());
    }

    #[test]
    fn test_capacity_limit() {
        let mut pool = ParticlePool::seeded(3).with_capacity_limit(5);
        let cfg = config(Technique::Neutral);
        for _ in 0..10 {
            pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg);
        }
        assert_eq!(pool.len(), 5);
        assert_eq!(ParticlePool::seeded(3).with_capacity_limit(500).capacity(), MAX_PARTICLES);
    }

    #[test]
    fn test_spawn_if_due_eventually_spawns() {
        let mut pool = ParticlePool::seeded(4);
        let cfg = config(Technique::Neutral);
        let spawned = (0..60).filter_map(|_| pool.spawn_if_due(1.0 / 60.0, &cfg)).count();
        // 10/s for one second with ±30% interval jitter
        assert!((6..=15).contains(&spawned), "spawned {}", spawned);
    }

    #[test]
    fn test_tick_removes_inactive() {
        let mut pool = ParticlePool::seeded(5);
        let cfg = config(Technique::Neutral);
        pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg);
        pool.spawn_at(Vec3::new(-10.0, 0.0, 0.0), &cfg);
        pool.particles_mut()[0].active = false;
        pool.tick(1.0 / 60.0, &cfg);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.particles()[0].id, 1);
    }

    #[test]
    fn test_tick_culls_out_of_bounds() {
        let mut pool = ParticlePool::seeded(6);
        pool.particles_mut().push(Particle::new(
            0,
            Vec3::new(29.99, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec4::ONE,
        ));
        pool.tick(0.05, &config(Technique::Red));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_spawn_at_with_unbounded_speed_band() {
        let mut pool = ParticlePool::seeded(1);
        let cfg = SimConfig {
            min_speed: f32::NEG_INFINITY,
            max_speed: 5.0,
            ..config(Technique::Neutral)
        };
        assert!(pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg).is_some());
        let speed = pool.particles()[0].velocity.length();
        assert!(speed.is_finite() && speed <= 5.0 + 1e-4, "speed {}", speed);
    }

    #[test]
    fn test_spawn_if_due_with_non_finite_speeds() {
        for max_speed in [f32::INFINITY, f32::NAN] {
            let mut pool = ParticlePool::seeded(8);
            let cfg = SimConfig {
                spawn_rate: 1000.0,
                max_speed,
                ..config(Technique::Red)
            };
            assert!(pool.spawn_if_due(0.1, &cfg).is_some());
            let p = &pool.particles()[0];
            assert!(p.velocity.is_finite());
            assert!(p.velocity.length() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_clear_keeps_ids_unique() {
        let mut pool = ParticlePool::seeded(7);
        let cfg = config(Technique::Blue);
        let first = pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg).unwrap();
        pool.clear();
        let second = pool.spawn_at(Vec3::new(10.0, 0.0, 0.0), &cfg).unwrap();
        assert!(second > first);
    }
}
