//! User preferences for the particle field
//!
//! Read from the host page on mount, separate from per-page engine tuning.

use serde::{Deserialize, Serialize};

/// Color theme of the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    /// First theme name found in a whitespace-separated class list
    pub fn from_class_list(classes: &str) -> Option<Self> {
        classes.split_whitespace().find_map(Self::from_str)
    }

    /// Opacity boost for particle fills and outlines.
    /// Dark particles on a light page need much more ink to read.
    pub fn boost(&self, alpha: f32) -> f32 {
        match self {
            Theme::Dark => (alpha * 1.5).min(1.0),
            Theme::Light => (alpha * 3.0).min(1.0),
        }
    }

    /// Pick the dark or light variant of a link opacity
    pub fn link_opacity(&self, dark: f32, light: f32) -> f32 {
        match self {
            Theme::Dark => dark,
            Theme::Light => light,
        }
    }
}

/// Particle field preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    /// Master switch; a disabled field is never mounted
    pub enabled: bool,
    /// Suppress motion-triggered spawns (pointer trail, scroll)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            enabled: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Pointer-trail spawns allowed
    pub fn pointer_trail(&self) -> bool {
        !self.reduced_motion
    }

    /// Scroll-edge spawns allowed
    pub fn scroll_bursts(&self) -> bool {
        !self.reduced_motion
    }

    /// Apply overrides read from the host page. Unrecognized values are ignored.
    pub fn with_overrides(
        mut self,
        theme: Option<&str>,
        enabled: Option<&str>,
        reduced_motion: bool,
    ) -> Self {
        if let Some(theme) = theme.and_then(Theme::from_class_list) {
            self.theme = theme;
        }
        if let Some(flag) = enabled.and_then(parse_flag) {
            self.enabled = flag;
        }
        self.reduced_motion |= reduced_motion;
        self
    }

    /// Read settings from the current document (WASM only):
    /// `<html class="dark|light">` or `data-theme`, `data-particles="off"` on
    /// `<body>`, and the `prefers-reduced-motion` media query.
    #[cfg(target_arch = "wasm32")]
    pub fn from_page() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let document = window.document();
        let root = document.as_ref().and_then(|d| d.document_element());
        let body = document.as_ref().and_then(|d| d.body());

        let theme = root.as_ref().and_then(|r| {
            r.get_attribute("data-theme")
                .or_else(|| Some(r.class_name()))
        });
        let enabled = body.as_ref().and_then(|b| b.get_attribute("data-particles"));
        let reduced_motion = window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|m| m.matches());

        let settings =
            Self::default().with_overrides(theme.as_deref(), enabled.as_deref(), reduced_motion);
        log::info!(
            "Particle settings: theme {}, enabled {}, reduced motion {}",
            settings.theme.as_str(),
            settings.enabled,
            settings.reduced_motion
        );
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_page() -> Self {
        Self::default()
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_boost_caps_at_one() {
        assert!((Theme::Dark.boost(0.4) - 0.6).abs() < 1e-6);
        assert!((Theme::Light.boost(0.2) - 0.6).abs() < 1e-6);
        assert_eq!(Theme::Light.boost(0.9), 1.0);
        assert_eq!(Theme::Dark.boost(1.0), 1.0);
    }

    #[test]
    fn test_reduced_motion_disables_motion_spawns() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.pointer_trail());
        assert!(!settings.scroll_bursts());
        assert!(Settings::default().pointer_trail());
    }

    #[test]
    fn test_page_overrides() {
        let s = Settings::default().with_overrides(Some("font-sans light"), Some("off"), false);
        assert_eq!(s.theme, Theme::Light);
        assert!(!s.enabled);
        assert!(!s.reduced_motion);

        let s = Settings::default().with_overrides(Some("antialiased"), Some("maybe"), true);
        assert_eq!(s, Settings {
            reduced_motion: true,
            ..Default::default()
        });
        assert_eq!(Theme::from_class_list("dark scroll-smooth"), Some(Theme::Dark));
        assert_eq!(Theme::from_class_list(""), None);
    }

    #[test]
    fn test_settings_json() {
        let settings = Settings {
            theme: Theme::Light,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
    }
}
