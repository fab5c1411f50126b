//! # barrier-sim
//!
//! Per-frame particle simulation of projectiles meeting a force-field barrier.
//!
//! Projectiles spawn on a ring around the origin and fly inward. One of four
//! selectable techniques decides what the barrier does to them: slow them
//! asymptotically, trap them, bounce them off, or crumble them away. The
//! crate only simulates. Drawing is left to the host, which reads a
//! [`Frame`] of per-particle render records after every step.
//!
//! ## Quick Start
//!
//! ```ignore
//! use barrier_sim::prelude::*;
//!
//! let mut sim = Simulation::new()
//!     .with_config(SimConfig {
//!         technique: Technique::Blue,
//!         spawn_rate: 8.0,
//!         ..Default::default()
//!     })
//!     .with_seed(42);
//!
//! loop {
//!     let frame = sim.frame();
//!     upload_instances(bytemuck::cast_slice(&frame.instances));
//! }
//! ```
//!
//! ## Techniques
//!
//! | Technique | Effect |
//! |-----------|--------|
//! | [`Technique::Neutral`] | Motion scales by `ratio³` inside the band, never reaching the core |
//! | [`Technique::Blue`] | Inward pull, sticky damping and density-based shrinking near the core |
//! | [`Technique::Red`] | Static plus reflective repulsion and a hard floor at the shell |
//! | [`Technique::Purple`] | Inverse-square pull, crumbling and erasure at the center |
//!
//! ## Stability
//!
//! Frame deltas are clamped to [`guard::MAX_DELTA`]. Particles with
//! non-finite state, beyond [`guard::MAX_DISTANCE`], or shrunk below
//! [`guard::MIN_SCALE`] are removed. The simulation never returns an error.

pub mod config;
pub mod emitter;
pub mod error;
pub mod forces;
pub mod guard;
pub mod particle;
pub mod pool;
mod simulation;
pub mod spawn;
pub mod technique;
pub mod time;
pub mod visuals;

pub use bytemuck;
pub use config::SimConfig;
pub use emitter::{Emitter, SpawnTimer};
pub use error::ConfigError;
pub use forces::{ForceTuning, Population, Step};
pub use glam::{Vec3, Vec4};
pub use particle::{Particle, ParticleId, ParticleInstance};
pub use pool::{ParticlePool, MAX_PARTICLES};
pub use simulation::{Frame, Simulation};
pub use spawn::SpawnContext;
pub use technique::{Technique, Theme};
pub use visuals::Palette;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use barrier_sim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::forces::{ForceTuning, Population};
    pub use crate::particle::{Particle, ParticleInstance};
    pub use crate::pool::ParticlePool;
    pub use crate::simulation::{Frame, Simulation};
    pub use crate::technique::{Technique, Theme};
    pub use crate::time::{Clock, ManualClock, SystemClock, Time};
    pub use crate::visuals::Palette;
    pub use crate::{Vec3, Vec4};
}
