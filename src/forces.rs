//! Force-field policy.
//!
//! Each [`Technique`] maps a particle's current state, the tick-start
//! [`Population`] and the clamped delta to a [`Step`]: the particle's next
//! position, velocity and scale, and whether the technique consumed it.
//! All distances are measured from the origin (the barrier center).
//!
//! | Technique | Radii | Shrink | Consumed when |
//! |-----------|-------|--------|---------------|
//! | Neutral | band 1.35..3.5 | ×0.90 crowded / ×0.995 calm | never |
//! | Blue | pull < 15, trap < 3.0 | density-based < 2.5 | scale < 0.1 |
//! | Red | repel < 4.5, floor 1.7 | none | never |
//! | Purple | pull everywhere, crumble < 2.5 | ×0.92 | scale < 0.05 or d < 0.5 |
//!
//! The only randomness is positional jitter, drawn from the caller's
//! [`SpawnContext`].

use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::technique::Technique;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Aggregate over the pool, computed once before any particle is updated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Population {
    /// Number of active particles.
    pub active: usize,
    /// Active particles within [`TRAP_RADIUS`] of the origin.
    pub trapped: usize,
}

/// Radius used to count trapped particles for density shrinking.
pub const TRAP_RADIUS: f32 = 2.5;

/// Above this many active particles the pool counts as crowded.
pub const CROWDED_THRESHOLD: usize = 40;

impl Population {
    pub fn from_particles<'a>(particles: impl IntoIterator<Item = &'a Particle>) -> Self {
        particles
            .into_iter()
            .filter(|p| p.active)
            .fold(Self::default(), |mut acc, p| {
                acc.active += 1;
                if p.position.length() < TRAP_RADIUS {
                    acc.trapped += 1;
                }
                acc
            })
    }

    #[inline]
    pub fn is_crowded(&self) -> bool {
        self.active > CROWDED_THRESHOLD
    }
}

/// Outcome of one force-field evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub position: Vec3,
    pub velocity: Vec3,
    pub scale: f32,
    /// Technique-specific removal (absorbed, erased).
    pub consumed: bool,
}

// =============================================================================
// Tuning
// =============================================================================

/// Zeno's paradox parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralTuning {
    pub stopping_radius: f32,
    pub interaction_radius: f32,
    /// Smallest displacement factor; particles are slowed, never frozen.
    pub min_factor: f32,
    /// Jitter applies while `0 < ratio < jitter_ratio`.
    pub jitter_ratio: f32,
    pub jitter_intensity: f32,
    pub crowded_shrink: f32,
    pub crowded_ratio: f32,
    pub calm_shrink: f32,
    pub calm_ratio: f32,
}

impl Default for NeutralTuning {
    fn default() -> Self {
        Self {
            stopping_radius: 1.35,
            interaction_radius: 3.5,
            min_factor: 0.0001,
            jitter_ratio: 0.3,
            jitter_intensity: 0.08,
            crowded_shrink: 0.90,
            crowded_ratio: 0.5,
            calm_shrink: 0.995,
            calm_ratio: 0.1,
        }
    }
}

/// Accumulation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueTuning {
    pub attraction_radius: f32,
    pub pull_strength: f32,
    pub core_radius: f32,
    /// Added to `core_radius` to get the trapping radius.
    pub trap_margin: f32,
    pub trap_damping: f32,
    pub jitter_base: f32,
    pub jitter_peak: f32,
    /// Density shrinking starts above this many trapped particles.
    pub density_threshold: usize,
    pub density_cap: usize,
    pub shrink_base: f32,
    pub shrink_per_particle: f32,
    pub shrink_floor: f32,
    pub min_scale: f32,
}

impl Default for BlueTuning {
    fn default() -> Self {
        Self {
            attraction_radius: 15.0,
            pull_strength: 20.0,
            core_radius: 2.0,
            trap_margin: 1.0,
            trap_damping: 0.85,
            jitter_base: 0.05,
            jitter_peak: 0.6,
            density_threshold: 8,
            density_cap: 50,
            shrink_base: 0.99,
            shrink_per_particle: 0.005,
            shrink_floor: 0.8,
            min_scale: 0.1,
        }
    }
}

impl BlueTuning {
    /// Scale multiplier for a trapped particle given the tick's trapped count.
    /// Returns 1.0 when the core is not dense enough to shrink.
    pub fn density_shrink(&self, trapped: usize) -> f32 {
        if trapped <= self.density_threshold {
            return 1.0;
        }
        let excess = (trapped - self.density_threshold).min(self.density_cap) as f32;
        (self.shrink_base - excess * self.shrink_per_particle).max(self.shrink_floor)
    }
}

/// Bouncy wall parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedTuning {
    pub repulsion_radius: f32,
    pub core_radius: f32,
    pub static_force: f32,
    pub reflect_gain: f32,
    /// Distance beyond `core_radius` that particles can never cross.
    pub floor_margin: f32,
    pub floor_restitution: f32,
}

impl Default for RedTuning {
    fn default() -> Self {
        Self {
            repulsion_radius: 4.5,
            core_radius: 1.5,
            static_force: 80.0,
            reflect_gain: 40.0,
            floor_margin: 0.2,
            floor_restitution: 0.8,
        }
    }
}

/// Crumble and erase parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurpleTuning {
    pub pull_strength: f32,
    /// Softening added to the squared distance.
    pub softening: f32,
    pub min_dist_sq: f32,
    pub crumble_radius: f32,
    pub damping: f32,
    pub jitter_intensity: f32,
    pub shrink: f32,
    pub min_scale: f32,
    pub erase_radius: f32,
}

impl Default for PurpleTuning {
    fn default() -> Self {
        Self {
            pull_strength: 30.0,
            softening: 0.1,
            min_dist_sq: 0.1,
            crumble_radius: 2.5,
            damping: 0.92,
            jitter_intensity: 0.2,
            shrink: 0.92,
            min_scale: 0.05,
            erase_radius: 0.5,
        }
    }
}

/// Complete constant set for all techniques.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceTuning {
    pub neutral: NeutralTuning,
    pub blue: BlueTuning,
    pub red: RedTuning,
    pub purple: PurpleTuning,
}

// =============================================================================
// Policy
// =============================================================================

/// Evaluate the technique's force field for one particle.
///
/// `dt` must already be clamped by the stability guard.
pub fn apply(
    technique: Technique,
    particle: &Particle,
    population: &Population,
    dt: f32,
    tuning: &ForceTuning,
    ctx: &mut SpawnContext,
) -> Step {
    match technique {
        Technique::Neutral => neutral(particle, population, dt, &tuning.neutral, ctx),
        Technique::Blue => blue(particle, population, dt, &tuning.blue, ctx),
        Technique::Red => red(particle, dt, &tuning.red),
        Technique::Purple => purple(particle, dt, &tuning.purple, ctx),
    }
}

/// Position within the Neutral band: 0 at the stopping radius, 1 at the
/// interaction radius.
pub fn neutral_ratio(dist: f32, t: &NeutralTuning) -> f32 {
    ((dist - t.stopping_radius) / (t.interaction_radius - t.stopping_radius)).clamp(0.0, 1.0)
}

fn neutral(
    p: &Particle,
    population: &Population,
    dt: f32,
    t: &NeutralTuning,
    ctx: &mut SpawnContext,
) -> Step {
    let dist = p.position.length();
    let mut displacement = p.velocity * dt;
    let mut scale = p.scale;

    if dist < t.interaction_radius {
        let ratio = neutral_ratio(dist, t);
        displacement *= ratio.powi(3).max(t.min_factor);

        if ratio > 0.0 && ratio < t.jitter_ratio {
            displacement += ctx.jitter(t.jitter_intensity * (1.0 - ratio / t.jitter_ratio));
        }

        if population.is_crowded() {
            if ratio < t.crowded_ratio {
                scale *= t.crowded_shrink;
            }
        } else if ratio < t.calm_ratio {
            scale *= t.calm_shrink;
        }
    }

    Step {
        position: p.position + displacement,
        velocity: p.velocity,
        scale,
        consumed: false,
    }
}

fn blue(
    p: &Particle,
    population: &Population,
    dt: f32,
    t: &BlueTuning,
    ctx: &mut SpawnContext,
) -> Step {
    let dist = p.position.length();
    let mut velocity = p.velocity;
    let mut jitter = Vec3::ZERO;
    let mut scale = p.scale;

    if dist < t.attraction_radius {
        let inward = if dist < 0.1 { Vec3::ZERO } else { -p.position / dist };
        velocity += inward * t.pull_strength * dt;
    }

    let trap_radius = t.core_radius + t.trap_margin;
    if dist < trap_radius {
        velocity *= t.trap_damping;
        let closeness = (1.0 - dist / trap_radius).clamp(0.0, 1.0);
        jitter = ctx.jitter(t.jitter_base + closeness.powi(4) * t.jitter_peak);
    }

    if dist < TRAP_RADIUS {
        scale *= t.density_shrink(population.trapped);
    }

    Step {
        position: p.position + velocity * dt + jitter,
        velocity,
        scale,
        consumed: scale < t.min_scale,
    }
}

fn red(p: &Particle, dt: f32, t: &RedTuning) -> Step {
    let dist = p.position.length();
    let mut velocity = p.velocity;

    if dist >= t.repulsion_radius {
        return Step {
            position: p.position + velocity * dt,
            velocity,
            scale: p.scale,
            consumed: false,
        };
    }

    // A particle dead center has no radial direction; push it straight up.
    let outward = if dist > 1e-6 { p.position / dist } else { Vec3::Y };

    let span = t.repulsion_radius - t.core_radius;
    let depth = 1.0 - ((dist - t.core_radius) / span).clamp(0.0, 1.0);
    let intensity = depth.powi(3);

    let approach_speed = -velocity.dot(outward);
    let mut force = t.static_force * intensity;
    if approach_speed > 0.0 {
        force += approach_speed * (1.0 + t.reflect_gain * intensity);
    }
    let dv = outward * force * dt;
    if dv.is_finite() {
        velocity += dv;
    }

    let mut position = p.position + velocity * dt;

    let floor = t.core_radius + t.floor_margin;
    if dist < floor {
        position = outward * floor;
        if velocity.dot(outward) < 0.0 {
            velocity = outward * velocity.length() * t.floor_restitution;
        }
    }

    Step {
        position,
        velocity,
        scale: p.scale,
        consumed: false,
    }
}

fn purple(p: &Particle, dt: f32, t: &PurpleTuning, ctx: &mut SpawnContext) -> Step {
    let dist_sq = p.position.length_squared();
    let dist = dist_sq.sqrt();
    let mut velocity = p.velocity;
    let mut scale = p.scale;

    let pull = t.pull_strength / (dist_sq.max(t.min_dist_sq) + t.softening);
    let inward = if dist > 1e-6 { -p.position / dist } else { Vec3::ZERO };
    velocity += inward * pull * dt;

    let mut displacement = velocity * dt;

    if dist < t.crumble_radius {
        velocity *= t.damping;
        displacement *= t.damping;
        displacement += ctx.jitter(t.jitter_intensity * (1.0 - dist / t.crumble_radius));
        scale *= t.shrink;
    }

    Step {
        position: p.position + displacement,
        velocity,
        scale,
        consumed: scale < t.min_scale || dist < t.erase_radius,
    }
}
