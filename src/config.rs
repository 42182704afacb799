//! Per-page engine tuning
//!
//! One engine, parameterised per page. Force constants are shared by every
//! preset; presets differ in palette, population caps and which features are
//! switched on.

use serde::{Deserialize, Serialize};

use crate::sim::{ParticleKind, Rgb};

/// Pointer attraction applied within `radius` (world units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub radius: f32,
    /// Velocity gained per tick at zero distance; falls off linearly to 0 at `radius`
    pub strength: f32,
}

/// Spawn and force parameters for one particle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindTuning {
    /// Random speed span added on top of `min_speed`
    pub base_speed: f32,
    pub min_speed: f32,
    pub size_base: f32,
    pub size_jitter: f32,
    /// Lifetime in ticks before ±20% jitter
    pub base_life: u32,
    pub attraction: Option<Attraction>,
    /// Per-tick velocity multiplier
    pub damping: f32,
    /// Added to vertical velocity each tick (positive is down)
    pub gravity: f32,
}

impl KindTuning {
    const fn ballistic(base_speed: f32, size_jitter: f32, base_life: u32, gravity: f32) -> Self {
        Self {
            base_speed,
            min_speed: 1.0,
            size_base: 2.0,
            size_jitter,
            base_life,
            attraction: None,
            damping: 0.99,
            gravity,
        }
    }
}

/// Tuning for every kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTable {
    pub ambient: KindTuning,
    pub pointer_follow: KindTuning,
    pub click: KindTuning,
    pub click_connect: KindTuning,
    pub drift: KindTuning,
    pub hover: KindTuning,
    pub scroll: KindTuning,
    pub orbit: KindTuning,
    pub text: KindTuning,
}

impl KindTable {
    pub fn get(&self, kind: ParticleKind) -> &KindTuning {
        match kind {
            ParticleKind::Ambient => &self.ambient,
            ParticleKind::PointerFollow => &self.pointer_follow,
            ParticleKind::Click => &self.click,
            ParticleKind::ClickConnect => &self.click_connect,
            ParticleKind::Drift => &self.drift,
            ParticleKind::Hover => &self.hover,
            ParticleKind::Scroll => &self.scroll,
            ParticleKind::Orbit => &self.orbit,
            ParticleKind::Text => &self.text,
        }
    }
}

impl Default for KindTable {
    fn default() -> Self {
        Self {
            ambient: KindTuning {
                base_speed: 1.0,
                min_speed: 1.0,
                size_base: 2.0,
                size_jitter: 4.0,
                base_life: 240,
                attraction: Some(Attraction {
                    radius: 120.0,
                    strength: 0.03,
                }),
                damping: 0.995,
                gravity: 0.02,
            },
            pointer_follow: KindTuning::ballistic(3.0, 4.0, 90, 0.1),
            click: KindTuning::ballistic(8.0, 6.0, 180, 0.1),
            click_connect: KindTuning {
                base_speed: 1.5,
                min_speed: 0.5,
                size_base: 1.5,
                size_jitter: 4.0,
                base_life: 270,
                attraction: Some(Attraction {
                    radius: 150.0,
                    strength: 0.08,
                }),
                damping: 0.98,
                gravity: 0.05,
            },
            drift: KindTuning {
                base_speed: 0.8,
                min_speed: 0.2,
                size_base: 1.0,
                size_jitter: 2.5,
                base_life: 160,
                attraction: Some(Attraction {
                    radius: 300.0,
                    strength: 0.08,
                }),
                damping: 0.98,
                gravity: 0.005,
            },
            hover: KindTuning {
                base_speed: 1.0,
                min_speed: 0.3,
                size_base: 1.2,
                size_jitter: 3.5,
                base_life: 200,
                attraction: Some(Attraction {
                    radius: 200.0,
                    strength: 0.06,
                }),
                damping: 0.97,
                gravity: 0.03,
            },
            scroll: KindTuning::ballistic(4.0, 4.0, 120, 0.1),
            orbit: KindTuning {
                base_speed: 0.5,
                min_speed: 0.2,
                size_base: 1.0,
                size_jitter: 3.0,
                base_life: 450,
                attraction: Some(Attraction {
                    radius: 120.0,
                    strength: 0.03,
                }),
                damping: 0.95,
                gravity: 0.0,
            },
            // Regular gravity minus a slight upward float
            text: KindTuning::ballistic(2.0, 5.0, 150, 0.05),
        }
    }
}

/// Radial burst layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingBurst {
    pub count: usize,
    pub min_distance: f32,
    pub distance_jitter: f32,
    /// Random angle added to each slot (radians)
    pub angle_jitter: f32,
    /// Slots evenly spaced around the circle; otherwise uniform random angles
    pub evenly_spaced: bool,
}

/// What a click on a plain area spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickConfig {
    pub connect: RingBurst,
    pub drift: RingBurst,
    /// Plain click particles, all spawned at the click point
    pub plain_count: usize,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            connect: RingBurst {
                count: 8,
                min_distance: 20.0,
                distance_jitter: 60.0,
                angle_jitter: 0.3,
                evenly_spaced: true,
            },
            drift: RingBurst {
                count: 4,
                min_distance: 10.0,
                distance_jitter: 40.0,
                angle_jitter: 0.0,
                evenly_spaced: false,
            },
            plain_count: 15,
        }
    }
}

/// Edge spawns while scrolling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Deltas at or below this (px) spawn nothing
    pub threshold: f32,
    pub px_per_particle: f32,
    pub max_particles: usize,
    /// Height of the top/bottom band particles spawn in
    pub edge_band: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            px_per_particle: 20.0,
            max_particles: 8,
            edge_band: 100.0,
        }
    }
}

/// Ambient seeding and replenishment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub initial: usize,
    /// Replenishment stops while the whole field holds at least this many
    pub cap: usize,
    pub interval_ms: f64,
}

/// Large burst fired by clicking the profile picture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileBurstConfig {
    pub ring: RingBurst,
    pub speed_min: f32,
    pub speed_jitter: f32,
    pub life: u32,
    /// Fraction of burst particles that live twice as long
    pub double_life_chance: f32,
    pub attraction: f32,
}

impl Default for ProfileBurstConfig {
    fn default() -> Self {
        Self {
            ring: RingBurst {
                count: 45,
                min_distance: 120.0,
                distance_jitter: 500.0,
                angle_jitter: 0.5,
                evenly_spaced: true,
            },
            speed_min: 5.0,
            speed_jitter: 4.0,
            life: 600,
            double_life_chance: 0.3,
            attraction: 0.08,
        }
    }
}

/// Orbiting particles around the profile picture (home page only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    pub min_population: usize,
    pub max_population: usize,
    pub max_population_hovered: usize,
    pub initial: usize,
    /// Spawned immediately whenever a tick leaves no orbit particles
    pub emergency: usize,
    pub manage_interval_ms: f64,
    pub add_chance: f32,
    pub cull_chance: f32,
    /// Culling only happens above `min_population + cull_margin`
    pub cull_margin: usize,
    pub cull_life: u32,
    /// Pointer counts as hovering within home radius + this
    pub hover_buffer: f32,
    pub hover_interval_ms: f64,
    pub hover_spawn_min: usize,
    pub hover_spawn_max: usize,
    /// Home region radius is half the smaller anchor side plus this
    pub home_region_extra: f32,
    /// Spawn distance is `rand * home_radius + spawn_extra`
    pub spawn_extra: f32,
    pub return_strength: f32,
    pub orbit_pull: f32,
    pub burst: ProfileBurstConfig,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_population: 15,
            max_population: 20,
            max_population_hovered: 30,
            initial: 18,
            emergency: 8,
            manage_interval_ms: 400.0,
            add_chance: 0.7,
            cull_chance: 0.05,
            cull_margin: 3,
            cull_life: 30,
            hover_buffer: 50.0,
            hover_interval_ms: 200.0,
            hover_spawn_min: 2,
            hover_spawn_max: 3,
            home_region_extra: 100.0,
            spawn_extra: 40.0,
            return_strength: 0.01,
            orbit_pull: 0.02,
            burst: ProfileBurstConfig::default(),
        }
    }
}

/// Lines between nearby visible particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairLinkConfig {
    pub distance: f32,
    pub opacity_dark: f32,
    pub opacity_light: f32,
    /// Opacity multiplier when both ends are orbit particles
    pub orbit_boost: f32,
}

impl Default for PairLinkConfig {
    fn default() -> Self {
        Self {
            distance: 100.0,
            opacity_dark: 0.5,
            opacity_light: 0.8,
            orbit_boost: 1.5,
        }
    }
}

/// Faint line from each ambient particle to a nearby pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLinkConfig {
    pub radius: f32,
    /// Opacity at zero distance, fading linearly to 0 at `radius`
    pub opacity: f32,
    pub width: f32,
}

impl Default for AmbientLinkConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            opacity: 0.3,
            width: 1.0,
        }
    }
}

/// Complete engine configuration for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub kinds: KindTable,
    pub palette_dark: Vec<Rgb>,
    pub palette_light: Vec<Rgb>,
    /// Fixed color of drift particles
    pub accent: Rgb,
    pub ambient: AmbientConfig,
    /// Minimum spacing between pointer-trail spawns
    pub pointer_trail_ms: f64,
    pub click: ClickConfig,
    pub scroll: Option<ScrollConfig>,
    pub hover_burst: RingBurst,
    pub orbit: Option<OrbitConfig>,
    pub pair_links: Option<PairLinkConfig>,
    pub ambient_links: Option<AmbientLinkConfig>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::home()
    }
}

const DARK_PALETTE: [&str; 15] = [
    "#8b5cf6", "#a855f7", "#9333ea", "#7c3aed", "#6d28d9", "#3b82f6", "#2563eb", "#1d4ed8",
    "#1e40af", "#1e3a8a", "#1e293b", "#334155", "#475569", "#64748b", "#475569",
];

const LIGHT_PALETTE: [&str; 15] = [
    "#1e1e1e", "#2d2d2d", "#3d3d3d", "#4a4a4a", "#5a5a5a", "#1a1a1a", "#2a2a2a", "#3a3a3a",
    "#4d4d4d", "#5d5d5d", "#0f0f0f", "#1f1f1f", "#2f2f2f", "#3f3f3f", "#4f4f4f",
];

/// Amber used for drift particles and hover glows
pub const ACCENT: Rgb = Rgb::new(0xf5, 0x9e, 0x0b);

fn palette(hex: &[&str]) -> Vec<Rgb> {
    hex.iter().filter_map(|h| Rgb::from_hex(h)).collect()
}

impl FieldConfig {
    /// Landing page: orbiting particles, pair links, scroll bursts
    pub fn home() -> Self {
        Self {
            kinds: KindTable::default(),
            palette_dark: palette(&DARK_PALETTE),
            palette_light: palette(&LIGHT_PALETTE),
            accent: ACCENT,
            ambient: AmbientConfig {
                initial: 15,
                cap: 30,
                interval_ms: 800.0,
            },
            pointer_trail_ms: 50.0,
            click: ClickConfig::default(),
            scroll: Some(ScrollConfig::default()),
            hover_burst: RingBurst {
                count: 12,
                min_distance: 40.0,
                distance_jitter: 80.0,
                angle_jitter: 0.3,
                evenly_spaced: true,
            },
            orbit: Some(OrbitConfig::default()),
            pair_links: Some(PairLinkConfig::default()),
            ambient_links: None,
        }
    }

    /// Projects, photos and not-found pages
    pub fn gallery() -> Self {
        Self {
            palette_dark: palette(&DARK_PALETTE[..10]),
            ambient: AmbientConfig {
                initial: 15,
                cap: 35,
                interval_ms: 600.0,
            },
            scroll: None,
            hover_burst: RingBurst {
                count: 6,
                min_distance: 30.0,
                distance_jitter: 60.0,
                angle_jitter: 0.3,
                evenly_spaced: true,
            },
            orbit: None,
            pair_links: None,
            ambient_links: Some(AmbientLinkConfig::default()),
            ..Self::home()
        }
    }

    /// Parse a JSON config; missing fields fall back to the home preset.
    /// Inverted orbit ranges are rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        config
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(orbit) = &self.orbit {
            if orbit.hover_spawn_min > orbit.hover_spawn_max {
                return Err(format!(
                    "orbit hover spawn range {}..={} is inverted",
                    orbit.hover_spawn_min, orbit.hover_spawn_max
                ));
            }
            if orbit.min_population > orbit.max_population {
                return Err(format!(
                    "orbit population range {}..={} is inverted",
                    orbit.min_population, orbit.max_population
                ));
            }
        }
        Ok(())
    }

    pub fn palette(&self, theme: crate::Theme) -> &[Rgb] {
        match theme {
            crate::Theme::Dark => &self.palette_dark,
            crate::Theme::Light => &self.palette_light,
        }
    }
}

/// Page the field is mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PagePreset {
    #[default]
    Home,
    Projects,
    Photos,
    NotFound,
}

impl PagePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PagePreset::Home => "home",
            PagePreset::Projects => "projects",
            PagePreset::Photos => "photos",
            PagePreset::NotFound => "not-found",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" | "" => Some(PagePreset::Home),
            "projects" => Some(PagePreset::Projects),
            "photos" => Some(PagePreset::Photos),
            "not-found" | "not_found" | "404" => Some(PagePreset::NotFound),
            _ => None,
        }
    }

    pub fn config(&self) -> FieldConfig {
        match self {
            PagePreset::Home => FieldConfig::home(),
            PagePreset::Projects | PagePreset::Photos | PagePreset::NotFound => {
                FieldConfig::gallery()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_parse_fully() {
        let home = FieldConfig::home();
        assert_eq!(home.palette_dark.len(), 15);
        assert_eq!(home.palette_light.len(), 15);
        assert_eq!(FieldConfig::gallery().palette_dark.len(), 10);
    }

    #[test]
    fn test_gallery_shares_force_constants() {
        assert_eq!(FieldConfig::home().kinds, FieldConfig::gallery().kinds);
        assert!(FieldConfig::gallery().orbit.is_none());
        assert!(FieldConfig::gallery().pair_links.is_none());
    }

    #[test]
    fn test_only_ballistic_kinds_lack_attraction() {
        let kinds = KindTable::default();
        for kind in ParticleKind::ALL {
            let ballistic = matches!(
                kind,
                ParticleKind::PointerFollow
                    | ParticleKind::Click
                    | ParticleKind::Scroll
                    | ParticleKind::Text
            );
            assert_eq!(kinds.get(kind).attraction.is_none(), ballistic, "{kind:?}");
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(PagePreset::from_str("Projects"), Some(PagePreset::Projects));
        assert_eq!(PagePreset::from_str("404"), Some(PagePreset::NotFound));
        assert_eq!(PagePreset::from_str(""), Some(PagePreset::Home));
        assert_eq!(PagePreset::from_str("blog"), None);
    }

    #[test]
    fn test_partial_json_overlays_home() {
        let cfg = FieldConfig::from_json(r##"{"accent": "#ff0000", "pair_links": null}"##).unwrap();
        assert_eq!(cfg.accent, Rgb::new(255, 0, 0));
        assert!(cfg.pair_links.is_none());
        assert_eq!(cfg.ambient, FieldConfig::home().ambient);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg = FieldConfig::gallery();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(FieldConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        let mut json = serde_json::to_value(FieldConfig::home()).unwrap();
        json["orbit"]["hover_spawn_min"] = 3.into();
        json["orbit"]["hover_spawn_max"] = 2.into();
        let err = FieldConfig::from_json(&json.to_string()).unwrap_err();
        assert!(err.to_string().contains("inverted"));
        json["orbit"]["hover_spawn_max"] = 3.into();
        assert!(FieldConfig::from_json(&json.to_string()).is_ok());

        let mut orbit = OrbitConfig::default();
        orbit.min_population = 40;
        let config = FieldConfig {
            orbit: Some(orbit),
            ..FieldConfig::home()
        };
        assert!(config.validate().is_err());
        assert!(FieldConfig::gallery().validate().is_ok());
    }

    #[test]
    fn test_ambient_links_on_gallery_only() {
        assert_eq!(FieldConfig::gallery().ambient_links, Some(AmbientLinkConfig::default()));
        assert!(FieldConfig::home().ambient_links.is_none());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(FieldConfig::from_json(r#"{"accent": 7}"#).is_err());
    }
}
