//! Event bridge and frame scheduling
//!
//! `ParticleController` owns one particle field for one mounted page. Host
//! events arrive through the `handle_*` methods; the host's frame callback
//! calls `frame`, which runs the periodic spawners, one simulation tick and
//! one draw. Everything here is platform-free; the browser glue in
//! `platform` only translates DOM events into these calls.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::Rect;
use crate::config::FieldConfig;
use crate::renderer::{Surface, draw};
use crate::settings::{Settings, Theme};
use crate::sim::{Anchor, DEFAULT_ANCHOR_RADIUS, ParticleField, ParticleKind, TickInput, tick};

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Current scroll offset
    pub scroll: Vec2,
    /// Full scrollable document size
    pub document: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll: Vec2::ZERO,
            document: Vec2::new(width, height),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Area particles may occupy: the document, but never less than the viewport
    pub fn extent(&self) -> Vec2 {
        self.document.max(self.size())
    }
}

/// Host state sampled at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEnv {
    /// Frame timestamp in milliseconds
    pub now_ms: f64,
    pub viewport: Viewport,
    /// Live screen rectangle of the anchor element, when the page has one
    pub anchor: Option<Rect>,
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Empty page area
    Plain,
    /// A link or button; the page is about to navigate or act
    Interactive,
    /// The anchor element (profile picture)
    Anchor,
}

/// Fixed-period timer driven by frame timestamps.
/// Armed on its first poll; a late poll fires once and re-arms from `now`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IntervalTimer {
    period_ms: f64,
    next_ms: Option<f64>,
}

impl IntervalTimer {
    fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_ms: None,
        }
    }

    fn due(&mut self, now_ms: f64) -> bool {
        match self.next_ms {
            None => {
                self.next_ms = Some(now_ms + self.period_ms);
                false
            }
            Some(next) if now_ms >= next => {
                let advanced = next + self.period_ms;
                self.next_ms = Some(if advanced > now_ms {
                    advanced
                } else {
                    now_ms + self.period_ms
                });
                true
            }
            Some(_) => false,
        }
    }
}

/// One particle field plus everything that feeds it
#[derive(Debug, Clone)]
pub struct ParticleController {
    field: ParticleField,
    settings: Settings,
    viewport: Viewport,
    mounted: bool,
    frames: u64,
    last_trail_ms: Option<f64>,
    last_scroll_y: f32,
    last_hover_spawn_ms: Option<f64>,
    pointer_near_anchor: bool,
    ambient_timer: IntervalTimer,
    orbit_timer: Option<IntervalTimer>,
}

impl ParticleController {
    /// Mount a field: seed ambient particles and, on pages with an anchor,
    /// the initial orbit population.
    pub fn new(
        config: FieldConfig,
        settings: Settings,
        seed: u64,
        viewport: Viewport,
        anchor: Option<Rect>,
    ) -> Self {
        let ambient_timer = IntervalTimer::new(config.ambient.interval_ms);
        let orbit_timer = config.orbit.map(|o| IntervalTimer::new(o.manage_interval_ms));

        let mut field = ParticleField::new(config, settings.theme, seed);
        field.scroll = viewport.scroll;
        field.anchor = Anchor {
            center: viewport.scroll + viewport.size() / 2.0,
            radius: DEFAULT_ANCHOR_RADIUS,
        };
        if let Some(rect) = anchor {
            field.track_anchor(rect);
        }

        let mut controller = Self {
            field,
            settings,
            viewport,
            mounted: true,
            frames: 0,
            last_trail_ms: None,
            last_scroll_y: viewport.scroll.y,
            last_hover_spawn_ms: None,
            pointer_near_anchor: false,
            ambient_timer,
            orbit_timer,
        };

        for _ in 0..controller.field.config.ambient.initial {
            controller.add_ambient();
        }
        if let Some(orbit) = controller.field.config.orbit {
            for _ in 0..orbit.initial {
                controller.field.spawn_orbit_near_anchor();
            }
        }

        info!(
            "Particle field mounted: {}x{}, {} particles, seed {}",
            viewport.width,
            viewport.height,
            controller.field.len(),
            seed
        );
        controller
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Frames rendered since mount
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if !self.mounted {
            return;
        }
        self.settings.theme = theme;
        self.field.set_theme(theme);
        debug!("Particle theme set to {}", theme.as_str());
    }

    /// Track the pointer (screen coordinates) and drop a trail particle,
    /// at most one per trail interval. Returns whether one was spawned.
    pub fn handle_pointer_move(&mut self, screen: Vec2, now_ms: f64) -> bool {
        if !self.mounted {
            return false;
        }
        self.field.pointer = screen;

        if !self.settings.pointer_trail() {
            return false;
        }
        let throttle = self.field.config.pointer_trail_ms;
        if self.last_trail_ms.is_some_and(|last| now_ms - last <= throttle) {
            return false;
        }
        self.field
            .spawn(screen + self.field.scroll, ParticleKind::PointerFollow);
        self.last_trail_ms = Some(now_ms);
        true
    }

    /// Returns how many particles the click spawned
    pub fn handle_click(&mut self, screen: Vec2, target: ClickTarget) -> usize {
        if !self.mounted {
            return 0;
        }
        match target {
            ClickTarget::Interactive => 0,
            ClickTarget::Anchor if self.field.config.orbit.is_some() => self.spawn_profile_burst(),
            ClickTarget::Anchor | ClickTarget::Plain => {
                self.spawn_click_burst(screen + self.field.scroll)
            }
        }
    }

    fn spawn_click_burst(&mut self, world: Vec2) -> usize {
        let click = self.field.config.click;
        let mut spawned = self
            .field
            .spawn_ring(world, &click.connect, ParticleKind::ClickConnect);
        spawned += self
            .field
            .spawn_ring(world, &click.drift, ParticleKind::Drift);
        for _ in 0..click.plain_count {
            self.field.spawn(world, ParticleKind::Click);
        }
        spawned + click.plain_count
    }

    /// New scroll offset. Fast scrolling sprinkles particles along the edge
    /// the content is moving in from.
    pub fn handle_scroll(&mut self, scroll: Vec2) -> usize {
        if !self.mounted {
            return 0;
        }
        let delta = (scroll.y - self.last_scroll_y).abs();
        let downward = scroll.y > self.last_scroll_y;
        self.last_scroll_y = scroll.y;
        self.viewport.scroll = scroll;
        self.field.scroll = scroll;

        let Some(cfg) = self.field.config.scroll else {
            return 0;
        };
        if !self.settings.scroll_bursts() || delta <= cfg.threshold {
            return 0;
        }

        let count = ((delta / cfg.px_per_particle).floor() as usize).min(cfg.max_particles);
        let (width, height) = (self.viewport.width, self.viewport.height);
        for _ in 0..count {
            let rng = self.field.rng();
            let x = rng.random::<f32>() * width;
            let band = rng.random::<f32>() * cfg.edge_band;
            let y = if downward {
                height - cfg.edge_band + band
            } else {
                band
            };
            self.field.spawn(Vec2::new(x, y) + scroll, ParticleKind::Scroll);
        }
        count
    }

    /// The drawing surface follows on the next frame
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        if !self.mounted {
            return;
        }
        self.viewport.width = width;
        self.viewport.height = height;
        debug!("Viewport resized to {}x{}", width, height);
    }

    /// Hover burst around an element's screen rectangle
    pub fn spawn_hover_burst(&mut self, rect: Rect) -> usize {
        if !self.mounted {
            return 0;
        }
        let burst = self.field.config.hover_burst;
        let center = rect.center() + self.field.scroll;
        self.field.spawn_ring(center, &burst, ParticleKind::Hover)
    }

    /// Radial orbit burst around the anchor; a no-op on pages without one
    pub fn spawn_profile_burst(&mut self) -> usize {
        if !self.mounted || self.field.config.orbit.is_none() {
            return 0;
        }
        let n = self.field.spawn_profile_burst();
        info!("Profile burst: {} particles", n);
        n
    }

    /// Run one frame. Without a surface nothing happens and `false` is returned.
    pub fn frame<S: Surface + ?Sized>(&mut self, env: &FrameEnv, surface: Option<&mut S>) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(surface) = surface else {
            return false;
        };

        self.viewport = env.viewport;
        self.field.scroll = env.viewport.scroll;
        let size = env.viewport.size();
        if surface.size() != size {
            surface.resize(size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        }

        if self.field.config.orbit.is_some() {
            if let Some(rect) = env.anchor {
                self.field.track_anchor(rect);
            }
            self.spawn_hover_orbits(env.now_ms);
        }

        if self.ambient_timer.due(env.now_ms) {
            self.add_ambient();
        }
        let orbit_due = self
            .orbit_timer
            .as_mut()
            .is_some_and(|t| t.due(env.now_ms));
        if orbit_due {
            self.manage_orbits();
        }

        let input = TickInput {
            pointer: self.field.pointer_world(),
            extent: env.viewport.extent(),
        };
        tick(&mut self.field, &input);
        draw(&self.field, surface, env.now_ms);

        self.frames += 1;
        true
    }

    /// Unmount. Every later call is a no-op.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        info!(
            "Particle field unmounted after {} frames, {} particles live",
            self.frames,
            self.field.len()
        );
    }

    /// One ambient particle somewhere in the visible viewport, unless the
    /// field is already at its cap
    fn add_ambient(&mut self) {
        if self.field.len() >= self.field.config.ambient.cap {
            return;
        }
        let (width, height) = (self.viewport.width, self.viewport.height);
        let rng = self.field.rng();
        let pos = Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height);
        self.field.spawn(pos + self.viewport.scroll, ParticleKind::Ambient);
    }

    fn spawn_hover_orbits(&mut self, now_ms: f64) {
        let Some(orbit) = self.field.config.orbit else {
            return;
        };
        let anchor = self.field.anchor;
        let distance = self.field.pointer_world().distance(anchor.center);
        self.pointer_near_anchor = distance < anchor.radius + orbit.hover_buffer;
        if !self.pointer_near_anchor {
            return;
        }
        if self
            .last_hover_spawn_ms
            .is_some_and(|last| now_ms - last <= orbit.hover_interval_ms)
        {
            return;
        }
        let count = self
            .field
            .rng()
            .random_range(orbit.hover_spawn_min..=orbit.hover_spawn_max.max(orbit.hover_spawn_min));
        for _ in 0..count {
            self.field.spawn_orbit_near_anchor();
        }
        self.last_hover_spawn_ms = Some(now_ms);
    }

    /// Keep the orbit population between its floor and ceiling
    fn manage_orbits(&mut self) {
        let Some(cfg) = self.field.config.orbit else {
            return;
        };
        let count = self.field.count(ParticleKind::Orbit);
        let max = if self.pointer_near_anchor {
            cfg.max_population_hovered
        } else {
            cfg.max_population
        };

        if count < cfg.min_population {
            for _ in count..cfg.min_population {
                self.field.spawn_orbit_near_anchor();
            }
        }
        if count < max && self.field.rng().random::<f32>() < cfg.add_chance {
            self.field.spawn_orbit_near_anchor();
        }
        if count > max
            && self.field.rng().random::<f32>() < cfg.cull_chance
            && count > cfg.min_population + cfg.cull_margin
        {
            let shortest = self
                .field
                .particles
                .iter_mut()
                .filter(|p| p.kind == ParticleKind::Orbit)
                .min_by_key(|p| p.life);
            if let Some(p) = shortest {
                p.expire_within(cfg.cull_life);
            }
        }
    }
}
