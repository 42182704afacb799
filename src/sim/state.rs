//! Particle store and field state
//!
//! One `ParticleField` per mounted page. It owns the live particles, the
//! seeded RNG, the tracked pointer and the profile anchor.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::factory::ParticleFactory;
use super::particle::{Particle, ParticleKind};
use crate::config::{FieldConfig, RingBurst};
use crate::settings::Theme;
use crate::{Rect, polar_to_cartesian};

/// Default home-region radius before any anchor element has been measured
pub const DEFAULT_ANCHOR_RADIUS: f32 = 100.0;

/// Point the orbiting particles gather around, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub center: Vec2,
    /// Radius of the home region; particles beyond it are pulled back
    pub radius: f32,
}

impl Anchor {
    /// Measure an anchor from its on-screen rectangle
    pub fn from_rect(rect: Rect, scroll: Vec2, extra: f32) -> Self {
        Self {
            center: rect.center() + scroll,
            radius: rect.width.min(rect.height) / 2.0 + extra,
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: DEFAULT_ANCHOR_RADIUS,
        }
    }
}

/// The particle store plus everything the simulation reads each tick
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub config: FieldConfig,
    pub theme: Theme,
    /// Live particles; order carries no meaning
    pub particles: Vec<Particle>,
    /// Last known pointer position (screen coordinates)
    pub pointer: Vec2,
    /// Current page scroll offset
    pub scroll: Vec2,
    pub anchor: Anchor,
    rng: Pcg32,
    next_id: u32,
}

impl ParticleField {
    pub fn new(config: FieldConfig, theme: Theme, seed: u64) -> Self {
        Self {
            config,
            theme,
            particles: Vec::new(),
            pointer: Vec2::ZERO,
            scroll: Vec2::ZERO,
            anchor: Anchor::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new particle id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Pointer position in world coordinates
    pub fn pointer_world(&self) -> Vec2 {
        self.pointer + self.scroll
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Re-measure the anchor from its current screen rectangle
    pub fn track_anchor(&mut self, rect: Rect) {
        let extra = self
            .config
            .orbit
            .map(|o| o.home_region_extra)
            .unwrap_or(DEFAULT_ANCHOR_RADIUS);
        self.anchor = Anchor::from_rect(rect, self.scroll, extra);
    }

    /// Build a particle without inserting it
    pub fn create(&mut self, origin: Vec2, kind: ParticleKind) -> Particle {
        let id = self.next_entity_id();
        let factory = ParticleFactory::new(
            &self.config.kinds,
            self.config.palette(self.theme),
            self.config.accent,
        );
        factory.create(&mut self.rng, id, origin, kind)
    }

    /// Create and insert one particle at a world position
    pub fn spawn(&mut self, origin: Vec2, kind: ParticleKind) {
        let particle = self.create(origin, kind);
        self.particles.push(particle);
    }

    /// Spawn a radial burst around `center`; returns how many were added
    pub fn spawn_ring(&mut self, center: Vec2, burst: &RingBurst, kind: ParticleKind) -> usize {
        for i in 0..burst.count {
            let offset = self.ring_offset(burst, i);
            self.spawn(center + offset, kind);
        }
        burst.count
    }

    fn ring_offset(&mut self, burst: &RingBurst, slot: usize) -> Vec2 {
        let angle = if burst.evenly_spaced {
            slot as f32 / burst.count as f32 * TAU + self.rng.random::<f32>() * burst.angle_jitter
        } else {
            self.rng.random_range(0.0..TAU)
        };
        let distance = self.rng.random::<f32>() * burst.distance_jitter + burst.min_distance;
        polar_to_cartesian(distance, angle)
    }

    /// One orbit particle somewhere inside the anchor's home region
    pub fn spawn_orbit_near_anchor(&mut self) {
        let spawn_extra = self.config.orbit.map(|o| o.spawn_extra).unwrap_or_default();
        let angle = self.rng.random_range(0.0..TAU);
        let distance = self.rng.random::<f32>() * self.anchor.radius + spawn_extra;
        let origin = self.anchor.center + polar_to_cartesian(distance, angle);
        self.spawn(origin, ParticleKind::Orbit);
    }

    /// Large radial orbit burst around the anchor. Some particles get double
    /// life and all of them a stronger pull toward the pointer.
    pub fn spawn_profile_burst(&mut self) -> usize {
        let burst = self.config.orbit.unwrap_or_default().burst;
        let center = self.anchor.center;
        let count = burst.ring.count;

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU
                + self.rng.random::<f32>() * burst.ring.angle_jitter;
            let distance =
                self.rng.random::<f32>() * burst.ring.distance_jitter + burst.ring.min_distance;
            let mut particle =
                self.create(center + polar_to_cartesian(distance, angle), ParticleKind::Orbit);

            let speed = burst.speed_min + self.rng.random::<f32>() * burst.speed_jitter;
            particle.vel = polar_to_cartesian(speed, angle);
            let life = if self.rng.random::<f32>() < burst.double_life_chance {
                burst.life * 2
            } else {
                burst.life
            };
            particle.set_lifetime(life);
            particle.attraction_override = Some(burst.attraction);
            self.particles.push(particle);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_from_rect() {
        let anchor = Anchor::from_rect(
            Rect::new(100.0, 50.0, 200.0, 160.0),
            Vec2::new(0.0, 400.0),
            100.0,
        );
        assert_eq!(anchor.center, Vec2::new(200.0, 530.0));
        assert_eq!(anchor.radius, 180.0);
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut field = ParticleField::new(FieldConfig::home(), Theme::Dark, 1);
        let a = field.next_entity_id();
        let b = field.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_spawn_ring_distances() {
        let mut field = ParticleField::new(FieldConfig::home(), Theme::Dark, 5);
        let burst = field.config.hover_burst;
        let center = Vec2::new(500.0, 500.0);
        let n = field.spawn_ring(center, &burst, ParticleKind::Hover);
        assert_eq!(n, 12);
        assert_eq!(field.count(ParticleKind::Hover), 12);
        for p in &field.particles {
            let d = p.pos.distance(center);
            assert!(d >= burst.min_distance - 1e-3);
            assert!(d <= burst.min_distance + burst.distance_jitter + 1e-3);
        }
    }

    #[test]
    fn test_profile_burst() {
        let mut field = ParticleField::new(FieldConfig::home(), Theme::Dark, 99);
        field.anchor = Anchor {
            center: Vec2::new(600.0, 400.0),
            radius: 200.0,
        };
        let n = field.spawn_profile_burst();
        assert_eq!(n, 45);
        assert_eq!(field.count(ParticleKind::Orbit), 45);

        let burst = field.config.orbit.unwrap().burst;
        let mut doubled = 0;
        for p in &field.particles {
            assert_eq!(p.attraction_override, Some(burst.attraction));
            assert!(p.max_life == burst.life || p.max_life == burst.life * 2);
            if p.max_life == burst.life * 2 {
                doubled += 1;
            }
            let speed = p.vel.length();
            assert!(speed >= burst.speed_min - 1e-3);
            assert!(speed <= burst.speed_min + burst.speed_jitter + 1e-3);
            // Burst particles fly outward from the anchor
            assert!((p.pos - field.anchor.center).dot(p.vel) > 0.0);
        }
        assert!(doubled < n);
    }

    #[test]
    fn test_orbit_spawns_inside_home_region() {
        let mut field = ParticleField::new(FieldConfig::home(), Theme::Dark, 3);
        field.anchor = Anchor {
            center: Vec2::new(300.0, 300.0),
            radius: 150.0,
        };
        for _ in 0..30 {
            field.spawn_orbit_near_anchor();
        }
        for p in &field.particles {
            assert!(p.pos.distance(field.anchor.center) <= 150.0 + 40.0 + 1e-3);
        }
    }
}
