//! Simulation builder and frame driver.

use crate::config::SimConfig;
use crate::forces::Population;
use crate::guard;
use crate::particle::{ParticleId, ParticleInstance};
use crate::pool::ParticlePool;
use crate::technique::{Technique, Theme};
use crate::time::{Clock, SystemClock, Time};
use glam::Vec3;

/// State handed to the presentation layer after each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub technique: Technique,
    pub theme: Theme,
    /// One record per live particle, keyed by `id`.
    pub instances: Vec<ParticleInstance>,
    /// Aggregate after the tick.
    pub population: Population,
    /// Clamped delta that was integrated.
    pub delta: f32,
}

/// A barrier simulation.
///
/// Use method chaining to configure, then drive it once per host frame with
/// [`frame`](Self::frame) (clock-driven) or [`step`](Self::step) (explicit delta).
///
/// ```ignore
/// let mut sim = Simulation::new()
///     .with_config(SimConfig { technique: Technique::Red, ..Default::default() })
///     .with_seed(42);
///
/// loop {
///     let frame = sim.frame();
///     renderer.draw(&frame.instances);
/// }
/// ```
pub struct Simulation<C: Clock = SystemClock> {
    config: SimConfig,
    pool: ParticlePool,
    time: Time<C>,
}

impl Simulation<SystemClock> {
    /// Create a new simulation with default settings on the wall clock.
    pub fn new() -> Self {
        let config = SimConfig::default();
        Self {
            pool: pool_for(&config),
            config,
            time: Time::new(),
        }
    }
}

impl Default for Simulation<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Simulation<C> {
    /// Replace the configuration. A new seed in the config reseeds the pool;
    /// a config without a seed keeps the current one.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        let mut config = config.sanitized();
        if config.seed.is_some() && config.seed != self.config.seed {
            self.pool = pool_for(&config);
        }
        config.seed = config.seed.or(self.config.seed);
        self.config = config;
        self
    }

    /// Make the run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.pool = ParticlePool::seeded(seed);
        self
    }

    /// Drive frame timing from another clock.
    pub fn with_clock<D: Clock>(self, clock: D) -> Simulation<D> {
        Simulation {
            config: self.config,
            pool: self.pool,
            time: Time::with_clock(clock),
        }
    }

    /// Advance by the time the clock reports since the last frame.
    pub fn frame(&mut self) -> Frame {
        let (_, delta) = self.time.update();
        self.advance(delta)
    }

    /// Advance by an explicit raw delta in seconds. The delta is clamped.
    pub fn step(&mut self, raw_delta: f32) -> Frame {
        self.advance(guard::clamp_delta(raw_delta))
    }

    fn advance(&mut self, dt: f32) -> Frame {
        self.pool.spawn_if_due(dt, &self.config);
        self.pool.tick(dt, &self.config);

        Frame {
            technique: self.config.technique,
            theme: self.config.theme,
            instances: self.pool.instances(),
            population: self.pool.population(),
            delta: dt,
        }
    }

    /// Spawn a projectile from an impact point (e.g. a click on the scene).
    pub fn impact(&mut self, point: Vec3) -> Option<ParticleId> {
        self.pool.spawn_at(point, &self.config)
    }

    pub fn set_technique(&mut self, technique: Technique) {
        if technique != self.config.technique {
            tracing::debug!(from = %self.config.technique, to = %technique, "technique changed");
            self.config.technique = technique;
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
    }

    /// Set the spawn rate. Out-of-range values disable spawning.
    pub fn set_spawn_rate(&mut self, rate: f32) {
        self.config.spawn_rate = rate;
        self.config = std::mem::take(&mut self.config).sanitized();
    }

    pub fn set_speed_range(&mut self, min: f32, max: f32) {
        self.config.min_speed = min;
        self.config.max_speed = max;
        self.config = std::mem::take(&mut self.config).sanitized();
    }

    /// Remove all particles.
    pub fn reset(&mut self) {
        self.pool.clear();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Mutable configuration; read again on the next frame.
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    pub fn time(&self) -> &Time<C> {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time<C> {
        &mut self.time
    }
}

fn pool_for(config: &SimConfig) -> ParticlePool {
    match config.seed {
        Some(seed) => ParticlePool::seeded(seed),
        None => ParticlePool::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    #[test]
    fn test_step_spawns_over_time() {
        let mut sim = Simulation::new().with_seed(1);
        sim.set_spawn_rate(20.0);
        let mut frame = sim.step(0.0);
        for _ in 0..60 {
            frame = sim.step(1.0 / 60.0);
        }
        assert!(!frame.instances.is_empty());
        assert_eq!(frame.population.active, frame.instances.len());
    }

    #[test]
    fn test_step_clamps_delta() {
        let mut sim = Simulation::new().with_seed(2);
        let frame = sim.step(3.0);
        assert_eq!(frame.delta, guard::MAX_DELTA);
    }

    #[test]
    fn test_manual_clock_frames() {
        let mut sim = Simulation::new()
            .with_seed(3)
            .with_clock(ManualClock::new());
        sim.time_mut().clock_mut().advance(0.05);
        let frame = sim.frame();
        assert!((frame.delta - 0.05).abs() < 1e-6);
        assert_eq!(sim.time().frame(), 1);
    }

    #[test]
    fn test_set_spawn_rate_negative_disables() {
        let mut sim = Simulation::new().with_seed(4);
        sim.set_spawn_rate(-5.0);
        assert_eq!(sim.config().spawn_rate, 0.0);
        for _ in 0..120 {
            sim.step(1.0 / 60.0);
        }
        assert!(sim.pool().is_empty());
    }

    #[test]
    fn test_impact_and_reset() {
        let mut sim = Simulation::new().with_seed(5);
        assert!(sim.impact(Vec3::new(0.0, 8.0, 0.0)).is_some());
        assert_eq!(sim.pool().len(), 1);
        sim.reset();
        assert!(sim.pool().is_empty());
    }

    #[test]
    fn test_seeded_runs_match() {
        let run = |seed| {
            let mut sim = Simulation::new().with_seed(seed);
            sim.set_technique(Technique::Purple);
            sim.set_spawn_rate(30.0);
            let mut frame = sim.step(0.0);
            for _ in 0..120 {
                frame = sim.step(1.0 / 60.0);
            }
            frame.instances
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_config_mut_non_finite_speeds_spawn_safely() {
        let mut sim = Simulation::new().with_seed(6);
        sim.config_mut().max_speed = f32::INFINITY;
        assert!(sim.impact(Vec3::new(10.0, 0.0, 0.0)).is_some());

        sim.config_mut().spawn_rate = 60.0;
        sim.config_mut().min_speed = f32::NAN;
        for _ in 0..30 {
            sim.step(1.0 / 60.0);
        }
        assert!(sim.pool().len() > 1);
        assert!(sim
            .pool()
            .particles()
            .iter()
            .all(|p| p.position.is_finite() && p.velocity.is_finite()));
    }
}
