//! Folio Particles - canvas particle field for a portfolio site
//!
//! Core modules:
//! - `sim`: Deterministic particle simulation (factory, store, per-tick integration)
//! - `controller`: Event bridge and frame scheduling around one particle field
//! - `renderer`: Drawing-surface abstraction and the per-frame draw pass
//! - `config`: Per-page engine tuning
//! - `settings`: User preferences (theme, reduced motion)
//! - `platform`: Browser glue (canvas, listeners, animation frames)

pub mod config;
pub mod controller;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{FieldConfig, PagePreset};
pub use controller::{ClickTarget, FrameEnv, ParticleController, Viewport};
pub use settings::{Settings, Theme};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine-wide constants
pub mod consts {
    /// Nominal display refresh rate; all per-tick constants assume it
    pub const TICKS_PER_SECOND: f32 = 60.0;

    /// Particles further than this outside the viewport are not drawn
    pub const CULL_MARGIN: f32 = 50.0;

    /// Velocity multiplier applied when a particle hits a document edge
    pub const EDGE_RESTITUTION: f32 = -0.8;

    /// Lifetime jitter around a kind's base life (±20%)
    pub const LIFE_VARIATION: f32 = 0.2;
    /// Lifetimes never drop below this fraction of the base life
    pub const LIFE_FLOOR: f32 = 0.5;

    /// Orbit radius range for orbiting particles
    pub const ORBIT_RADIUS_MIN: f32 = 20.0;
    pub const ORBIT_RADIUS_SPAN: f32 = 30.0;
    /// Orbit angular speed range (radians per tick, sign chosen at random)
    pub const ORBIT_SPEED_MIN: f32 = 0.01;
    pub const ORBIT_SPEED_SPAN: f32 = 0.02;

    /// Pulse frequency of glowing outlines (radians per millisecond)
    pub const PULSE_RATE: f64 = 0.005;
}

/// Axis-aligned rectangle in screen (viewport) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center_and_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.center(), Vec2::new(60.0, 45.0));
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(110.0, 70.0)));
        assert!(!r.contains(Vec2::new(111.0, 45.0)));
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }
}
