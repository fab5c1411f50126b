//! Technique and theme selection.
//!
//! A [`Technique`] picks the force-field profile that governs every particle
//! near the barrier. A [`Theme`] only affects colors and never the physics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Force-field profile applied to all particles.
///
/// | Technique | Behavior |
/// |-----------|----------|
/// | [`Technique::Neutral`] | Zeno's paradox: approach slows asymptotically, never arrives |
/// | [`Technique::Blue`] | Accumulation: particles are pulled in and trapped near the core |
/// | [`Technique::Red`] | Bouncy wall: particles are repelled off a hard shell |
/// | [`Technique::Purple`] | Crumble and erase: particles fall in and are consumed |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    #[default]
    Neutral,
    Blue,
    Red,
    Purple,
}

impl Technique {
    /// All techniques in display order.
    pub const ALL: [Technique; 4] = [
        Technique::Neutral,
        Technique::Blue,
        Technique::Red,
        Technique::Purple,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Technique::Neutral => "Neutral",
            Technique::Blue => "Blue",
            Technique::Red => "Red",
            Technique::Purple => "Purple",
        }
    }

    /// Short description shown next to the technique selector.
    pub fn description(&self) -> &'static str {
        match self {
            Technique::Neutral => "Infinity: approach slows forever and never touches",
            Technique::Blue => "Lapse: pulls projectiles in and holds them",
            Technique::Red => "Reversal: repels projectiles off the shell",
            Technique::Purple => "Hollow: crumbles and erases whatever falls in",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["Neutral", "Blue", "Red", "Purple"]
    }

    /// Parse a technique name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Technique::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cosmetic color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Technique::from_name("purple"), Some(Technique::Purple));
        assert_eq!(Technique::from_name(" RED "), Some(Technique::Red));
        assert_eq!(Technique::from_name("green"), None);
    }

    #[test]
    fn test_variants_match_all() {
        let names: Vec<&str> = Technique::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, Technique::variants());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Technique::Blue).unwrap();
        assert_eq!(json, "\"Blue\"");
        let theme: Theme = serde_json::from_str("\"Light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }
}
