//! Particle factory
//!
//! Maps (origin, kind) to a fresh particle with randomized kinematics. The
//! caller supplies the RNG, so a seeded generator gives reproducible output.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::particle::{Orbit, Particle, ParticleKind, Rgb};
use crate::config::KindTable;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Everything needed to build particles for one field
#[derive(Debug, Clone, Copy)]
pub struct ParticleFactory<'a> {
    pub kinds: &'a KindTable,
    pub palette: &'a [Rgb],
    pub accent: Rgb,
}

impl<'a> ParticleFactory<'a> {
    pub fn new(kinds: &'a KindTable, palette: &'a [Rgb], accent: Rgb) -> Self {
        Self {
            kinds,
            palette,
            accent,
        }
    }

    /// Build one particle at `origin` (world coordinates)
    pub fn create<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: u32,
        origin: Vec2,
        kind: ParticleKind,
    ) -> Particle {
        let tuning = self.kinds.get(kind);

        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random::<f32>() * tuning.base_speed + tuning.min_speed;
        let size = rng.random::<f32>() * tuning.size_jitter + tuning.size_base;
        let life = random_lifetime(rng, tuning.base_life);

        let color = match kind {
            ParticleKind::Drift => self.accent,
            _ if self.palette.is_empty() => self.accent,
            _ => self.palette[rng.random_range(0..self.palette.len())],
        };

        let orbit = (kind == ParticleKind::Orbit).then(|| {
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            Orbit {
                home: origin,
                angle: rng.random_range(0.0..TAU),
                radius: rng.random::<f32>() * ORBIT_RADIUS_SPAN + ORBIT_RADIUS_MIN,
                speed: (rng.random::<f32>() * ORBIT_SPEED_SPAN + ORBIT_SPEED_MIN) * direction,
            }
        });

        Particle {
            id,
            pos: origin,
            vel: polar_to_cartesian(speed, angle),
            size,
            life,
            max_life: life,
            color,
            kind,
            orbit,
            attraction_override: None,
        }
    }
}

/// Base life jittered by ±20%, never below half the base
pub fn random_lifetime<R: Rng + ?Sized>(rng: &mut R, base: u32) -> u32 {
    let base_f = base as f32;
    let jitter = (rng.random::<f32>() - 0.5) * 2.0 * LIFE_VARIATION * base_f;
    let life = (base_f + jitter).floor().max(0.0) as u32;
    life.max((base_f * LIFE_FLOOR).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kind_strategy() -> impl Strategy<Value = ParticleKind> {
        prop::sample::select(ParticleKind::ALL.to_vec())
    }

    #[test]
    fn test_drift_uses_accent_color() {
        let cfg = FieldConfig::home();
        let factory = ParticleFactory::new(&cfg.kinds, &cfg.palette_dark, cfg.accent);
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..20 {
            let p = factory.create(&mut rng, id, Vec2::ZERO, ParticleKind::Drift);
            assert_eq!(p.color, cfg.accent);
        }
    }

    #[test]
    fn test_palette_colors_only() {
        let cfg = FieldConfig::home();
        let factory = ParticleFactory::new(&cfg.kinds, &cfg.palette_light, cfg.accent);
        let mut rng = Pcg32::seed_from_u64(11);
        for id in 0..50 {
            let p = factory.create(&mut rng, id, Vec2::ZERO, ParticleKind::Click);
            assert!(cfg.palette_light.contains(&p.color));
        }
    }

    #[test]
    fn test_only_orbit_kind_has_orbit() {
        let cfg = FieldConfig::home();
        let factory = ParticleFactory::new(&cfg.kinds, &cfg.palette_dark, cfg.accent);
        let mut rng = Pcg32::seed_from_u64(3);
        let origin = Vec2::new(400.0, 300.0);
        let p = factory.create(&mut rng, 1, origin, ParticleKind::Orbit);
        let orbit = p.orbit.expect("orbit particles carry orbit state");
        assert_eq!(orbit.home, origin);
        assert!((ORBIT_RADIUS_MIN..=ORBIT_RADIUS_MIN + ORBIT_RADIUS_SPAN).contains(&orbit.radius));
        assert!(orbit.speed.abs() >= ORBIT_SPEED_MIN);
        assert!(orbit.speed.abs() <= ORBIT_SPEED_MIN + ORBIT_SPEED_SPAN);

        let q = factory.create(&mut rng, 2, origin, ParticleKind::Hover);
        assert!(q.orbit.is_none());
    }

    #[test]
    fn test_same_seed_same_particle() {
        let cfg = FieldConfig::home();
        let factory = ParticleFactory::new(&cfg.kinds, &cfg.palette_dark, cfg.accent);
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        let pa = factory.create(&mut a, 9, Vec2::ONE, ParticleKind::Scroll);
        let pb = factory.create(&mut b, 9, Vec2::ONE, ParticleKind::Scroll);
        assert_eq!(pa, pb);
    }

    proptest! {
        #[test]
        fn prop_lifetime_and_speed_bounds(seed in any::<u64>(), kind in kind_strategy()) {
            let cfg = FieldConfig::home();
            let factory = ParticleFactory::new(&cfg.kinds, &cfg.palette_dark, cfg.accent);
            let tuning = cfg.kinds.get(kind);
            let mut rng = Pcg32::seed_from_u64(seed);

            for id in 0..16 {
                let p = factory.create(&mut rng, id, Vec2::new(10.0, 10.0), kind);
                let base = tuning.base_life as f32;
                prop_assert!(p.life as f32 >= (base * 0.5).floor());
                prop_assert!(p.life as f32 <= base * 1.2);
                prop_assert_eq!(p.life, p.max_life);

                let speed = p.vel.length();
                prop_assert!(speed >= tuning.min_speed - 1e-4);
                prop_assert!(speed <= tuning.base_speed + tuning.min_speed + 1e-4);

                prop_assert!(p.size >= tuning.size_base);
                prop_assert!(p.size <= tuning.size_base + tuning.size_jitter);
            }
        }
    }
}
