//! Particle data and the render record handed to the presentation layer.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Identity of a particle within one pool. Assigned monotonically, never reused.
pub type ParticleId = u64;

/// A projectile travelling toward the barrier.
///
/// Particles are created by [`ParticlePool`](crate::pool::ParticlePool) and
/// mutated once per tick by the force-field policy. Once `active` is false the
/// particle is terminal: it is not updated again and is dropped from the pool
/// at the end of the tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Visual size multiplier (1.0 = normal).
    pub scale: f32,
    pub active: bool,
    /// RGBA color fixed at spawn time.
    pub color: Vec4,
}

impl Particle {
    pub fn new(id: ParticleId, position: Vec3, velocity: Vec3, color: Vec4) -> Self {
        Self {
            id,
            position,
            velocity,
            scale: 1.0,
            active: true,
            color,
        }
    }

    /// Distance from the barrier center.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.position.length()
    }

    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Render record for this particle.
    pub fn to_instance(&self) -> ParticleInstance {
        ParticleInstance {
            position: self.position.to_array(),
            scale: self.scale,
            color: self.color.to_array(),
            id_lo: self.id as u32,
            id_hi: (self.id >> 32) as u32,
            _pad: [0; 2],
        }
    }
}

/// Per-particle render state, laid out for direct upload as an instance buffer.
///
/// 48 bytes, 16-byte aligned fields. The 64-bit id is split into two words
/// since shaders have no portable 64-bit integer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
    pub id_lo: u32,
    pub id_hi: u32,
    pub _pad: [u32; 2],
}

impl ParticleInstance {
    /// The full particle id.
    #[inline]
    pub fn id(&self) -> ParticleId {
        (u64::from(self.id_hi) << 32) | u64::from(self.id_lo)
    }
}
