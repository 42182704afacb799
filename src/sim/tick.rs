//! Per-tick force integration
//!
//! Advances every live particle by one frame: kind-specific forces, a single
//! position step, damping, lifetime decay and edge reflection.

use glam::Vec2;

use super::particle::{Particle, ParticleKind};
use super::state::{Anchor, ParticleField};
use crate::config::{Attraction, KindTuning, OrbitConfig};
use crate::consts::*;

/// External inputs for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Pointer position in world coordinates
    pub pointer: Vec2,
    /// Document extent: the larger of viewport and scrollable content, per axis
    pub extent: Vec2,
}

/// What a tick removed and added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub expired: usize,
    /// Orbit particles spawned because none were left
    pub replenished: usize,
}

/// Advance the field by one frame
pub fn tick(field: &mut ParticleField, input: &TickInput) -> TickStats {
    let orbit_cfg = field.config.orbit.unwrap_or_default();
    let anchor = field.anchor;

    let before = field.particles.len();
    {
        let kinds = &field.config.kinds;
        for particle in field.particles.iter_mut() {
            step_particle(particle, kinds.get(particle.kind), &orbit_cfg, anchor, input);
        }
    }
    field.particles.retain(Particle::is_alive);
    let expired = before - field.particles.len();

    let replenished = replenish_orbits(field);

    TickStats {
        expired,
        replenished,
    }
}

/// Anti-starvation: a field with orbiting particles never runs out of them
fn replenish_orbits(field: &mut ParticleField) -> usize {
    let Some(orbit) = field.config.orbit else {
        return 0;
    };
    if field.count(ParticleKind::Orbit) > 0 {
        return 0;
    }
    for _ in 0..orbit.emergency {
        field.spawn_orbit_near_anchor();
    }
    log::warn!(
        "Orbit population hit zero, spawned {} replacements",
        orbit.emergency
    );
    orbit.emergency
}

fn step_particle(
    p: &mut Particle,
    tuning: &KindTuning,
    orbit_cfg: &OrbitConfig,
    anchor: Anchor,
    input: &TickInput,
) {
    match p.kind {
        ParticleKind::Orbit => orbit_forces(p, tuning, orbit_cfg, anchor, input.pointer),
        _ => {
            if let Some(attraction) = tuning.attraction {
                attract(p, input.pointer, attraction);
            }
            p.vel.y += tuning.gravity;
        }
    }

    p.pos += p.vel;
    p.vel *= tuning.damping;

    p.life = p.life.saturating_sub(1);

    reflect_at_edges(p, input.extent);
}

/// Pull toward `target`, strongest at zero distance and fading to nothing at the radius
fn attract(p: &mut Particle, target: Vec2, attraction: Attraction) -> bool {
    let to_target = target - p.pos;
    let distance = to_target.length();
    if distance >= attraction.radius {
        return false;
    }
    let strength = (attraction.radius - distance) / attraction.radius * attraction.strength;
    p.vel += to_target.normalize_or_zero() * strength;
    true
}

fn orbit_forces(
    p: &mut Particle,
    tuning: &KindTuning,
    cfg: &OrbitConfig,
    anchor: Anchor,
    pointer: Vec2,
) {
    let mut attraction = tuning.attraction.unwrap_or(Attraction {
        radius: 0.0,
        strength: 0.0,
    });
    if let Some(strength) = p.attraction_override {
        attraction.strength = strength;
    }

    if !attract(p, pointer, attraction) {
        if let Some(orbit) = p.orbit.as_mut() {
            orbit.angle += orbit.speed;
            let target = orbit.target();
            p.vel += (target - p.pos) * cfg.orbit_pull;
        }
    }

    let from_anchor = anchor.center - p.pos;
    if from_anchor.length() > anchor.radius {
        p.vel += from_anchor.normalize_or_zero() * cfg.return_strength;
    }
}

/// Bounce off the document edges, losing some energy, and clamp inside
fn reflect_at_edges(p: &mut Particle, extent: Vec2) {
    if p.pos.x <= 0.0 || p.pos.x >= extent.x {
        p.vel.x *= EDGE_RESTITUTION;
        p.pos.x = p.pos.x.clamp(0.0, extent.x.max(0.0));
    }
    if p.pos.y <= 0.0 || p.pos.y >= extent.y {
        p.vel.y *= EDGE_RESTITUTION;
        p.pos.y = p.pos.y.clamp(0.0, extent.y.max(0.0));
    }
}
