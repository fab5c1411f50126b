//! Spawn context: the simulation's single source of randomness.
//!
//! Every random draw in the crate (spawn angle, speed, interval jitter and
//! the positional jitter applied by force fields) goes through one
//! [`SpawnContext`]. Seeding it makes a whole run reproducible.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Seeded RNG with helpers for the spawn patterns the barrier uses.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(42);
/// let position = ctx.random_on_band(14.0, 6.0);
/// let velocity = ctx.aimed_at_origin(position, 3.0, 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Deterministic context for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context seeded from the wall clock, different each program execution.
    pub fn from_entropy() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max]`. Returns `min` for an empty range.
    ///
    /// A non-finite bound collapses the range onto the other bound, or onto
    /// 0 when neither is finite.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        match (min.is_finite(), max.is_finite()) {
            (true, true) if max > min => self.rng.gen_range(min..=max),
            (true, _) => min,
            (false, true) => max,
            (false, false) => 0.0,
        }
    }

    // ========== Position helpers ==========

    /// Random point on a vertical band around the Y axis.
    ///
    /// Uniform angle on a circle of `radius` in the XZ plane, with a Y offset
    /// uniform in `[-half_height, half_height]`.
    pub fn random_on_band(&mut self, radius: f32, half_height: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let y = self.random_range(-half_height, half_height);
        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    }

    // ========== Direction/velocity helpers ==========

    /// Velocity pointing from `position` at the origin with a speed drawn
    /// uniformly from `[min_speed, max_speed]`.
    ///
    /// A particle already at the origin gets a random direction instead.
    pub fn aimed_at_origin(&mut self, position: Vec3, min_speed: f32, max_speed: f32) -> Vec3 {
        let speed = self.random_range(min_speed, max_speed);
        let inward = -position;
        if inward.length_squared() > 0.0001 {
            inward.normalize() * speed
        } else {
            self.random_direction() * speed
        }
    }

    /// Random unit vector (uniformly distributed on unit sphere).
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let z: f32 = self.rng.gen_range(-1.0..1.0);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    /// Isotropic jitter: each component uniform in `[-0.5, 0.5) * intensity`.
    pub fn jitter(&mut self, intensity: f32) -> Vec3 {
        if intensity <= 0.0 {
            return Vec3::ZERO;
        }
        Vec3::new(
            self.rng.gen::<f32>() - 0.5,
            self.rng.gen::<f32>() - 0.5,
            self.rng.gen::<f32>() - 0.5,
        ) * intensity
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::from_entropy()
    }
}
