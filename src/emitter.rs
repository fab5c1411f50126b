//! Particle emitters and the spawn timer.
//!
//! # Emitter Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Emitter::Ring`] | Random point on the spawn ring around the barrier |
//! | [`Emitter::Impact`] | Fixed point, e.g. where the user clicked |
//!
//! Both aim new particles at the origin with a speed drawn from the
//! configured band.

use crate::spawn::SpawnContext;
use glam::Vec3;

/// Radius of the spawn ring, in world units.
pub const RING_RADIUS: f32 = 14.0;

/// Vertical spread of the spawn ring (Y offset in `[-h, h]`).
pub const RING_HALF_HEIGHT: f32 = 6.0;

/// Interval jitter: each interval is `base * (1 ± 0.3)`.
pub const INTERVAL_JITTER: f32 = 0.3;

/// Where a new particle comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Emitter {
    /// Spawn band around the barrier.
    Ring {
        /// Horizontal radius.
        radius: f32,
        /// Half of the vertical extent.
        half_height: f32,
    },
    /// A single point in space.
    Impact {
        /// Spawn location.
        point: Vec3,
    },
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter::Ring {
            radius: RING_RADIUS,
            half_height: RING_HALF_HEIGHT,
        }
    }
}

impl Emitter {
    /// Draw an initial `(position, velocity)` pair.
    pub fn emit(&self, ctx: &mut SpawnContext, min_speed: f32, max_speed: f32) -> (Vec3, Vec3) {
        let position = match *self {
            Emitter::Ring { radius, half_height } => ctx.random_on_band(radius, half_height),
            Emitter::Impact { point } => point,
        };
        let velocity = ctx.aimed_at_origin(position, min_speed, max_speed);
        (position, velocity)
    }
}

/// Accumulates frame time and fires at randomized intervals.
///
/// The next interval is drawn every time the timer fires, so spawns never
/// fall into a visible rhythm.
#[derive(Clone, Debug, Default)]
pub struct SpawnTimer {
    elapsed: f32,
    /// Current target interval; `None` until the first draw.
    interval: Option<f32>,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` at `rate` particles/second. Returns `true` when a spawn is due.
    ///
    /// A rate that is zero, negative or non-finite disables the timer and
    /// clears any accumulated time.
    pub fn advance(&mut self, dt: f32, rate: f32, ctx: &mut SpawnContext) -> bool {
        if !(rate.is_finite() && rate > 0.0) {
            self.reset();
            return false;
        }

        self.elapsed += dt;
        let interval = *self
            .interval
            .get_or_insert_with(|| jittered_interval(rate, ctx));

        if self.elapsed > interval {
            self.elapsed = 0.0;
            self.interval = Some(jittered_interval(rate, ctx));
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.interval = None;
    }

    /// Time accumulated since the last spawn.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

fn jittered_interval(rate: f32, ctx: &mut SpawnContext) -> f32 {
    let base = 1.0 / rate;
    base * ctx.random_range(1.0 - INTERVAL_JITTER, 1.0 + INTERVAL_JITTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_emitter_geometry() {
        let mut ctx = SpawnContext::seeded(11);
        for _ in 0..50 {
            let (pos, vel) = Emitter::default().emit(&mut ctx, 2.0, 4.0);
            let horizontal = Vec3::new(pos.x, 0.0, pos.z).length();
            assert!((horizontal - RING_RADIUS).abs() < 0.001);
            assert!(pos.y.abs() <= RING_HALF_HEIGHT);
            // Heading inward
            assert!(vel.dot(pos) < 0.0);
        }
    }

    #[test]
    fn test_impact_emitter_uses_point() {
        let mut ctx = SpawnContext::seeded(12);
        let point = Vec3::new(0.0, 5.0, 0.0);
        let (pos, vel) = Emitter::Impact { point }.emit(&mut ctx, 1.0, 1.0);
        assert_eq!(pos, point);
        assert!((vel - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_timer_fires_within_jitter_window() {
        let mut ctx = SpawnContext::seeded(13);
        let mut timer = SpawnTimer::new();
        let dt = 0.001;
        let mut steps = 0;
        while !timer.advance(dt, 2.0, &mut ctx) {
            steps += 1;
            assert!(steps < 10_000);
        }
        // base interval 0.5s, jittered into [0.35, 0.65]
        let fired_at = (steps + 1) as f32 * dt;
        assert!(fired_at >= 0.35 - 0.01 && fired_at <= 0.65 + 0.01);
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_timer_disabled_rates() {
        let mut ctx = SpawnContext::seeded(14);
        let mut timer = SpawnTimer::new();
        for rate in [0.0, -3.0, f32::NAN] {
            for _ in 0..100 {
                assert!(!timer.advance(0.1, rate, &mut ctx));
            }
            assert_eq!(timer.elapsed(), 0.0);
        }
    }
}
