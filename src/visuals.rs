//! Theme-derived colors.
//!
//! Colors never feed back into the physics. A particle's color is chosen once
//! at spawn from the active [`Theme`] and stays fixed; the barrier accent
//! follows the selected [`Technique`].
//!
//! ```ignore
//! let palette = Palette::for_theme(Theme::Light);
//! let projectile = palette.projectile();
//! let accent = palette.technique_color(Technique::Blue);
//! ```

use crate::technique::{Technique, Theme};
use glam::{Vec3, Vec4};

/// Color set for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Projectile RGB.
    pub projectile_rgb: Vec3,
    /// Projectile opacity.
    pub projectile_alpha: f32,
    /// Scene background, for hosts that want to match it.
    pub background: Vec3,
    /// Opacity of the barrier shell.
    pub barrier_alpha: f32,
}

impl Palette {
    pub const DARK: Palette = Palette {
        projectile_rgb: Vec3::new(0.92, 0.94, 1.0),
        projectile_alpha: 0.9,
        background: Vec3::new(0.02, 0.02, 0.05),
        barrier_alpha: 0.35,
    };

    pub const LIGHT: Palette = Palette {
        projectile_rgb: Vec3::new(0.12, 0.12, 0.18),
        projectile_alpha: 0.8,
        background: Vec3::new(0.95, 0.95, 0.97),
        barrier_alpha: 0.5,
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::DARK,
            Theme::Light => Self::LIGHT,
        }
    }

    /// RGBA color assigned to newly spawned projectiles.
    pub fn projectile(&self) -> Vec4 {
        self.projectile_rgb.extend(self.projectile_alpha)
    }

    /// Barrier accent color for a technique.
    ///
    /// Neutral follows the projectile color so it reads on either background.
    pub fn technique_color(&self, technique: Technique) -> Vec4 {
        let rgb = match technique {
            Technique::Neutral => self.projectile_rgb,
            Technique::Blue => Vec3::new(0.2, 0.45, 1.0),
            Technique::Red => Vec3::new(1.0, 0.18, 0.15),
            Technique::Purple => Vec3::new(0.62, 0.2, 0.95),
        };
        rgb.extend(self.barrier_alpha)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}
