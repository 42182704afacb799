//! Particle records and their kind tags

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed set of particle kinds; each selects a force rule and a render style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Slow background dust, replenished on a timer
    Ambient,
    /// Trail left behind the pointer
    PointerFollow,
    /// Plain click explosion
    Click,
    /// Click particles that reach back toward the pointer
    ClickConnect,
    /// Floaty amber particles spawned with a click
    Drift,
    /// Burst around a hovered card
    Hover,
    /// Spawned at the viewport edge while scrolling
    Scroll,
    /// Particles orbiting the profile picture
    Orbit,
    /// Sparkles next to text, floating slightly upward
    Text,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 9] = [
        ParticleKind::Ambient,
        ParticleKind::PointerFollow,
        ParticleKind::Click,
        ParticleKind::ClickConnect,
        ParticleKind::Drift,
        ParticleKind::Hover,
        ParticleKind::Scroll,
        ParticleKind::Orbit,
        ParticleKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::Ambient => "ambient",
            ParticleKind::PointerFollow => "pointer_follow",
            ParticleKind::Click => "click",
            ParticleKind::ClickConnect => "click_connect",
            ParticleKind::Drift => "drift",
            ParticleKind::Hover => "hover",
            ParticleKind::Scroll => "scroll",
            ParticleKind::Orbit => "orbit",
            ParticleKind::Text => "text",
        }
    }
}

/// 8-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS `rgba()` string with the given opacity
    pub fn css(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Orbit state carried only by [`ParticleKind::Orbit`] particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Center of the particle's own orbit (its spawn point)
    pub home: Vec2,
    pub angle: f32,
    pub radius: f32,
    /// Radians per tick; negative orbits clockwise
    pub speed: f32,
}

impl Orbit {
    /// Point on the orbit circle for the current angle
    pub fn target(&self) -> Vec2 {
        self.home + crate::polar_to_cartesian(self.radius, self.angle)
    }
}

/// A single live particle. Positions are world (document) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Drives the per-particle pulse phase; collisions are harmless
    pub id: u32,
    pub pos: Vec2,
    /// World units per tick
    pub vel: Vec2,
    /// Base radius; drawn scaled by remaining life
    pub size: f32,
    /// Ticks remaining
    pub life: u32,
    /// Ticks at creation
    pub max_life: u32,
    pub color: Rgb,
    pub kind: ParticleKind,
    pub orbit: Option<Orbit>,
    /// Pointer attraction strength used instead of the kind default
    pub attraction_override: Option<f32>,
}

impl Particle {
    /// Remaining life in [0, 1]
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Reset both remaining and total life
    pub fn set_lifetime(&mut self, ticks: u32) {
        self.life = ticks;
        self.max_life = ticks;
    }

    /// Cap remaining life so the particle fades out soon
    pub fn expire_within(&mut self, ticks: u32) {
        self.life = self.life.min(ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_roundtrip() {
        let c = Rgb::from_hex("#8b5cf6").unwrap();
        assert_eq!(c, Rgb::new(0x8b, 0x5c, 0xf6));
        assert_eq!(c.to_string(), "#8b5cf6");
        assert!(Rgb::from_hex("#12345").is_none());
        assert!(Rgb::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_rgb_css_clamps_alpha() {
        let c = Rgb::new(245, 158, 11);
        assert_eq!(c.css(2.0), "rgba(245, 158, 11, 1.000)");
        assert_eq!(c.css(-1.0), "rgba(245, 158, 11, 0.000)");
    }

    #[test]
    fn test_rgb_serde_as_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn test_expire_within_only_shortens() {
        let mut p = Particle {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 1.0,
            life: 100,
            max_life: 100,
            color: Rgb::new(0, 0, 0),
            kind: ParticleKind::Orbit,
            orbit: None,
            attraction_override: None,
        };
        p.expire_within(30);
        assert_eq!(p.life, 30);
        p.expire_within(60);
        assert_eq!(p.life, 30);
        assert!((p.alpha() - 0.3).abs() < 1e-6);
    }
}
