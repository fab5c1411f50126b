//! Numerical stability guard.
//!
//! Runs every tick regardless of technique. Nothing here fails: an unstable
//! particle is simply deactivated and disappears at the end of the tick.

use crate::particle::Particle;

/// Largest frame delta ever integrated, in seconds.
///
/// A stalled or backgrounded host can report deltas of several seconds; those
/// would teleport particles straight through the barrier.
pub const MAX_DELTA: f32 = 0.1;

/// Particles farther than this from the origin are culled.
pub const MAX_DISTANCE: f32 = 30.0;

/// Particles smaller than this are culled.
pub const MIN_SCALE: f32 = 0.01;

/// Clamp a raw frame delta into `[0, MAX_DELTA]`. Non-finite input yields 0.
#[inline]
pub fn clamp_delta(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_DELTA)
    } else {
        0.0
    }
}

/// Pre-integration check. Returns `false` (and deactivates) if the particle
/// must not be integrated this tick.
pub fn check_before(p: &mut Particle) -> bool {
    if !p.active {
        return false;
    }
    if !p.position.is_finite() {
        p.deactivate();
        return false;
    }
    true
}

/// Post-integration check: non-finite state, out of bounds, or shrunk away.
pub fn check_after(p: &mut Particle) {
    if !p.position.is_finite() || !p.velocity.is_finite() || !p.scale.is_finite() {
        p.deactivate();
        return;
    }
    if p.position.length() > MAX_DISTANCE || p.scale < MIN_SCALE {
        p.deactivate();
    }
}
