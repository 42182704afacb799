//! Deterministic particle simulation
//!
//! Everything that moves lives here. This module must stay platform-free:
//! - Seeded RNG only
//! - One fixed step per frame
//! - No rendering or DOM dependencies

pub mod factory;
pub mod particle;
pub mod state;
pub mod tick;

pub use factory::{ParticleFactory, random_lifetime};
pub use particle::{Orbit, Particle, ParticleKind, Rgb};
pub use state::{Anchor, DEFAULT_ANCHOR_RADIUS, ParticleField};
pub use tick::{TickInput, TickStats, tick};
