//! Per-frame draw pass
//!
//! Reads the particle store and issues draw calls; never mutates it.

use glam::Vec2;

use super::surface::Surface;
use crate::config::{ACCENT, PairLinkConfig};
use crate::consts::{CULL_MARGIN, PULSE_RATE};
use crate::settings::Theme;
use crate::sim::{ParticleField, ParticleKind, Rgb};

const VIOLET: Rgb = Rgb::new(139, 92, 246);
const BLUE: Rgb = Rgb::new(59, 130, 246);

/// Ring drawn around a particle's disc
#[derive(Debug, Clone, Copy)]
struct Outline {
    scale: f32,
    width: f32,
    /// Multiplier on the boosted particle alpha
    opacity: f32,
    /// Drawn only while remaining life is above this
    min_alpha: f32,
    pulse: bool,
    /// Fixed color; `None` uses the particle's own
    color: Option<Rgb>,
}

/// Line from a particle to the pointer
#[derive(Debug, Clone, Copy)]
struct PointerLink {
    color: Rgb,
    width: f32,
    opacity_dark: f32,
    opacity_light: f32,
}

fn outline(kind: ParticleKind) -> Option<Outline> {
    let o = match kind {
        ParticleKind::Click => Outline {
            scale: 1.5,
            width: 1.0,
            opacity: 128.0 / 255.0,
            min_alpha: 0.5,
            pulse: false,
            color: None,
        },
        ParticleKind::Text => Outline {
            scale: 2.0,
            width: 0.5,
            opacity: 100.0 / 255.0,
            min_alpha: 0.3,
            pulse: false,
            color: None,
        },
        ParticleKind::Orbit => Outline {
            scale: 1.8,
            width: 1.0,
            opacity: 0.4,
            min_alpha: 0.0,
            pulse: true,
            color: None,
        },
        ParticleKind::ClickConnect => Outline {
            scale: 2.2,
            width: 1.5,
            opacity: 0.5,
            min_alpha: 0.0,
            pulse: false,
            color: None,
        },
        ParticleKind::Hover => Outline {
            scale: 2.0,
            width: 1.2,
            opacity: 0.45,
            min_alpha: 0.0,
            pulse: false,
            color: Some(ACCENT),
        },
        ParticleKind::Drift => Outline {
            scale: 1.8,
            width: 1.0,
            opacity: 0.4,
            min_alpha: 0.0,
            pulse: true,
            color: Some(ACCENT),
        },
        ParticleKind::Ambient | ParticleKind::PointerFollow | ParticleKind::Scroll => {
            return None;
        }
    };
    Some(o)
}

fn pointer_link(kind: ParticleKind) -> Option<PointerLink> {
    let link = match kind {
        ParticleKind::Orbit => PointerLink {
            color: VIOLET,
            width: 2.0,
            opacity_dark: 0.7,
            opacity_light: 0.9,
        },
        ParticleKind::ClickConnect => PointerLink {
            color: BLUE,
            width: 2.5,
            opacity_dark: 0.8,
            opacity_light: 0.95,
        },
        ParticleKind::Hover => PointerLink {
            color: ACCENT,
            width: 2.0,
            opacity_dark: 0.8,
            opacity_light: 0.95,
        },
        ParticleKind::Drift => PointerLink {
            color: ACCENT,
            width: 2.5,
            opacity_dark: 0.9,
            opacity_light: 0.98,
        },
        _ => return None,
    };
    Some(link)
}

/// Pulse factor in [0, 1], phase-shifted per particle
fn pulse(time_ms: f64, id: u32) -> f32 {
    (((time_ms * PULSE_RATE + id as f64).sin() + 1.0) * 0.5) as f32
}

fn on_screen(p: Vec2, extent: Vec2) -> bool {
    p.x >= -CULL_MARGIN
        && p.x <= extent.x + CULL_MARGIN
        && p.y >= -CULL_MARGIN
        && p.y <= extent.y + CULL_MARGIN
}

/// Draw one frame. Returns the number of particles that survived the cull.
pub fn draw<S: Surface + ?Sized>(field: &ParticleField, surface: &mut S, time_ms: f64) -> usize {
    surface.clear();

    let extent = surface.size();
    let theme = field.theme;
    let pointer = field.pointer;
    let mut visible: Vec<(Vec2, ParticleKind)> = Vec::with_capacity(field.len());

    for p in &field.particles {
        let screen = p.pos - field.scroll;
        if !on_screen(screen, extent) {
            continue;
        }

        let alpha = p.alpha();
        let size = p.size * alpha;
        let boosted = theme.boost(alpha);
        surface.soft_disc(screen, size, p.color, boosted);

        if let Some(o) = outline(p.kind).filter(|o| alpha > o.min_alpha) {
            let mut a = boosted * o.opacity;
            if o.pulse {
                a *= pulse(time_ms, p.id);
            }
            surface.ring(screen, size * o.scale, o.color.unwrap_or(p.color), a, o.width);
        }

        let radius = field.config.kinds.get(p.kind).attraction.map(|a| a.radius);
        if let (Some(link), Some(radius)) = (pointer_link(p.kind), radius) {
            let d = screen.distance(pointer);
            if d < radius {
                let a = (radius - d) / radius * theme.link_opacity(link.opacity_dark, link.opacity_light);
                surface.line(screen, pointer, link.color, a, link.width);
            }
        }

        let ambient_link = field.config.ambient_links.filter(|_| p.kind == ParticleKind::Ambient);
        if let Some(link) = ambient_link {
            let d = screen.distance(pointer);
            if d < link.radius {
                let a = (link.radius - d) / link.radius * link.opacity;
                surface.line(screen, pointer, VIOLET, a, link.width);
            }
        }

        visible.push((screen, p.kind));
    }

    if let Some(links) = &field.config.pair_links {
        draw_pair_links(surface, &visible, links, theme);
    }

    visible.len()
}

/// O(n²) over visible particles; populations are capped small
fn draw_pair_links<S: Surface + ?Sized>(
    surface: &mut S,
    visible: &[(Vec2, ParticleKind)],
    links: &PairLinkConfig,
    theme: Theme,
) {
    let base = theme.link_opacity(links.opacity_dark, links.opacity_light);
    for (i, &(a, kind_a)) in visible.iter().enumerate() {
        for &(b, kind_b) in &visible[i + 1..] {
            let d = a.distance(b);
            if d >= links.distance {
                continue;
            }
            let both_orbit = kind_a == ParticleKind::Orbit && kind_b == ParticleKind::Orbit;
            let mut alpha = (1.0 - d / links.distance) * base;
            let mut width = 1.0;
            if both_orbit {
                alpha *= links.orbit_boost;
                width = 1.5;
            }
            surface.line(a, b, VIOLET, alpha.min(1.0), width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::renderer::surface::{DrawCommand, RecordingSurface};
    use crate::sim::Particle;

    fn particle(id: u32, pos: Vec2, kind: ParticleKind) -> Particle {
        Particle {
            id,
            pos,
            vel: Vec2::ZERO,
            size: 4.0,
            life: 100,
            max_life: 100,
            color: Rgb::new(10, 20, 30),
            kind,
            orbit: None,
            attraction_override: None,
        }
    }

    fn bare_field() -> ParticleField {
        let mut config = FieldConfig::home();
        config.pair_links = None;
        let mut field = ParticleField::new(config, Theme::Dark, 1);
        field.pointer = Vec2::new(-1000.0, -1000.0);
        field
    }

    #[test]
    fn test_clear_comes_first() {
        let field = bare_field();
        let mut surface = RecordingSurface::new(800, 600);
        surface.soft_disc(Vec2::ZERO, 1.0, ACCENT, 1.0);
        assert_eq!(draw(&field, &mut surface, 0.0), 0);
        assert_eq!(surface.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_scroll_offset_and_cull() {
        let mut field = bare_field();
        field.scroll = Vec2::new(0.0, 500.0);
        field.particles = vec![
            particle(1, Vec2::new(100.0, 600.0), ParticleKind::Ambient),
            particle(2, Vec2::new(100.0, 300.0), ParticleKind::Ambient),
            particle(3, Vec2::new(-60.0, 600.0), ParticleKind::Ambient),
            particle(4, Vec2::new(-40.0, 600.0), ParticleKind::Ambient),
        ];
        let mut surface = RecordingSurface::new(800, 600);
        assert_eq!(draw(&field, &mut surface, 0.0), 2);
        assert_eq!(surface.discs(), 2);
        match &surface.commands[1] {
            DrawCommand::SoftDisc { center, .. } => assert_eq!(*center, Vec2::new(100.0, 100.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_disc_fades_with_life() {
        let mut field = bare_field();
        let mut p = particle(1, Vec2::new(50.0, 50.0), ParticleKind::Ambient);
        p.life = 20;
        field.particles = vec![p];
        let mut surface = RecordingSurface::new(200, 200);
        draw(&field, &mut surface, 0.0);
        match &surface.commands[1] {
            DrawCommand::SoftDisc { radius, alpha, .. } => {
                assert!((radius - 0.8).abs() < 1e-6);
                assert!((alpha - 0.3).abs() < 1e-6);
            }
            other => panic!("unexpected command {other:?}"),
        }

        field.set_theme(Theme::Light);
        draw(&field, &mut surface, 0.0);
        match &surface.commands[1] {
            DrawCommand::SoftDisc { alpha, .. } => assert!((alpha - 0.6).abs() < 1e-6),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_click_ring_only_while_young() {
        let mut field = bare_field();
        let young = particle(1, Vec2::new(50.0, 50.0), ParticleKind::Click);
        let mut old = particle(2, Vec2::new(90.0, 50.0), ParticleKind::Click);
        old.life = 40;
        field.particles = vec![young, old];
        let mut surface = RecordingSurface::new(200, 200);
        draw(&field, &mut surface, 0.0);
        assert_eq!(surface.discs(), 2);
        assert_eq!(surface.rings(), 1);
    }

    #[test]
    fn test_plain_kinds_have_no_decoration() {
        let mut field = bare_field();
        field.pointer = Vec2::new(50.0, 50.0);
        field.particles = vec![
            particle(1, Vec2::new(50.0, 50.0), ParticleKind::Ambient),
            particle(2, Vec2::new(60.0, 50.0), ParticleKind::Scroll),
            particle(3, Vec2::new(70.0, 50.0), ParticleKind::PointerFollow),
        ];
        let mut surface = RecordingSurface::new(200, 200);
        draw(&field, &mut surface, 0.0);
        assert_eq!(surface.rings(), 0);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn test_pointer_link_fades_with_distance() {
        let mut field = bare_field();
        field.pointer = Vec2::new(100.0, 175.0);
        field.particles = vec![particle(1, Vec2::new(100.0, 100.0), ParticleKind::ClickConnect)];
        let mut surface = RecordingSurface::new(400, 400);
        draw(&field, &mut surface, 0.0);

        let lines: Vec<_> = surface.lines().cloned().collect();
        assert_eq!(lines.len(), 1);
        match &lines[0] {
            DrawCommand::Line {
                from,
                to,
                color,
                alpha,
                width,
            } => {
                assert_eq!(*from, Vec2::new(100.0, 100.0));
                assert_eq!(*to, field.pointer);
                assert_eq!(*color, BLUE);
                assert!((alpha - 0.4).abs() < 1e-5);
                assert_eq!(*width, 2.5);
            }
            other => panic!("unexpected command {other:?}"),
        }

        // Outside the 150 px radius
        field.pointer = Vec2::new(100.0, 260.0);
        draw(&field, &mut surface, 0.0);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn test_ambient_pointer_link_on_gallery() {
        let mut field = ParticleField::new(FieldConfig::gallery(), Theme::Dark, 1);
        field.pointer = Vec2::new(140.0, 100.0);
        field.particles = vec![particle(1, Vec2::new(100.0, 100.0), ParticleKind::Ambient)];
        let mut surface = RecordingSurface::new(400, 400);
        draw(&field, &mut surface, 0.0);

        let lines: Vec<_> = surface.lines().cloned().collect();
        assert_eq!(lines.len(), 1);
        match &lines[0] {
            DrawCommand::Line {
                color, alpha, width, ..
            } => {
                assert_eq!(*color, VIOLET);
                assert!((alpha - 0.18).abs() < 1e-5);
                assert_eq!(*width, 1.0);
            }
            other => panic!("unexpected command {other:?}"),
        }

        // Outside the 100 px radius
        field.pointer = Vec2::new(210.0, 100.0);
        draw(&field, &mut surface, 0.0);
        assert_eq!(surface.lines().count(), 0);

        // Home draws no ambient pointer links
        let mut home = bare_field();
        home.pointer = Vec2::new(140.0, 100.0);
        home.particles = field.particles.clone();
        draw(&home, &mut surface, 0.0);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn test_pulse_stays_in_unit_range() {
        for id in 0..50 {
            let v = pulse(id as f64 * 137.0, id);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_pair_links_boost_orbit_pairs() {
        let mut field = bare_field();
        field.config.pair_links = Some(PairLinkConfig::default());
        field.particles = vec![
            particle(1, Vec2::new(100.0, 100.0), ParticleKind::Orbit),
            particle(2, Vec2::new(150.0, 100.0), ParticleKind::Orbit),
            particle(3, Vec2::new(100.0, 300.0), ParticleKind::Ambient),
            particle(4, Vec2::new(100.0, 350.0), ParticleKind::Ambient),
            // Too far from everything
            particle(5, Vec2::new(390.0, 10.0), ParticleKind::Ambient),
        ];
        let mut surface = RecordingSurface::new(400, 400);
        draw(&field, &mut surface, 0.0);

        let pairs: Vec<_> = surface
            .lines()
            .filter_map(|c| match c {
                DrawCommand::Line {
                    color, alpha, width, ..
                } if *color == VIOLET => Some((*alpha, *width)),
                _ => None,
            })
            .collect();
        assert_eq!(pairs.len(), 2);
        let (orbit_alpha, orbit_width) = pairs[0];
        let (plain_alpha, plain_width) = pairs[1];
        assert_eq!(orbit_width, 1.5);
        assert_eq!(plain_width, 1.0);
        assert!((orbit_alpha - 0.375).abs() < 1e-5);
        assert!((plain_alpha - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_offscreen_particles_do_not_link() {
        let mut field = bare_field();
        field.config.pair_links = Some(PairLinkConfig::default());
        field.particles = vec![
            particle(1, Vec2::new(10.0, 10.0), ParticleKind::Ambient),
            particle(2, Vec2::new(-70.0, 10.0), ParticleKind::Ambient),
        ];
        let mut surface = RecordingSurface::new(400, 400);
        draw(&field, &mut surface, 0.0);
        assert_eq!(surface.lines().count(), 0);
    }
}
