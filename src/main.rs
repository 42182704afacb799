//! Folio Particles entry point
//!
//! On the web this only installs logging; pages mount through
//! `mount_particles()`. Natively it runs a scripted headless session per page
//! preset and prints a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
use folio_particles::PagePreset;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Folio particles loaded, waiting for mount_particles()");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Folio particles (native) starting...");
    log::info!("Native mode runs a scripted session per page preset - use the wasm build in a browser");

    let summaries: Vec<_> = [
        PagePreset::Home,
        PagePreset::Projects,
        PagePreset::Photos,
        PagePreset::NotFound,
    ]
    .into_iter()
    .map(|preset| headless::run(preset, SEED, FRAMES))
    .collect();

    match serde_json::to_string_pretty(&summaries) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
const SEED: u64 = 42;
#[cfg(not(target_arch = "wasm32"))]
const FRAMES: u64 = 600;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::BTreeMap;

    use glam::Vec2;
    use serde::Serialize;

    use folio_particles::consts::TICKS_PER_SECOND;
    use folio_particles::renderer::RecordingSurface;
    use folio_particles::sim::ParticleKind;
    use folio_particles::{
        ClickTarget, FrameEnv, PagePreset, ParticleController, Rect, Settings, Viewport,
    };

    const FRAME_MS: f64 = 1000.0 / TICKS_PER_SECOND as f64;

    /// Profile picture placement used by the scripted session
    const ANCHOR: Rect = Rect {
        x: 540.0,
        y: 160.0,
        width: 200.0,
        height: 200.0,
    };

    #[derive(Debug, Serialize)]
    pub struct Summary {
        page: &'static str,
        seed: u64,
        frames: u64,
        particles: usize,
        by_kind: BTreeMap<&'static str, usize>,
        spawned: BTreeMap<&'static str, usize>,
        last_frame: FrameSummary,
    }

    #[derive(Debug, Serialize)]
    pub struct FrameSummary {
        width: u32,
        height: u32,
        discs: usize,
        rings: usize,
        lines: usize,
    }

    /// Drive a controller through a fixed script of user input
    pub fn run(preset: PagePreset, seed: u64, frames: u64) -> Summary {
        let mut viewport = Viewport {
            document: Vec2::new(1280.0, 2400.0),
            ..Viewport::new(1280.0, 720.0)
        };
        let mut controller =
            ParticleController::new(
            preset.config(),
            Settings::default(),
            seed,
            viewport,
            Some(ANCHOR),
        );
        let mut surface = RecordingSurface::new(1280, 720);
        let mut spawned: BTreeMap<&'static str, usize> = BTreeMap::new();

        for frame in 0..frames {
            let now = frame as f64 * FRAME_MS;

            // Pointer sweeps left to right across the upper half
            let t = (frame % 240) as f32 / 240.0;
            let pointer = Vec2::new(t * viewport.width, 200.0 + (t * 6.0).sin() * 80.0);
            if controller.handle_pointer_move(pointer, now) {
                *spawned.entry("pointer").or_default() += 1;
            }

            match frame {
                60 => {
                    *spawned.entry("click").or_default() +=
                        controller.handle_click(Vec2::new(300.0, 500.0), ClickTarget::Plain);
                }
                90 => {
                    *spawned.entry("link_click").or_default() +=
                        controller.handle_click(Vec2::new(320.0, 500.0), ClickTarget::Interactive);
                }
                120 => {
                    viewport.scroll.y = 240.0;
                    *spawned.entry("scroll").or_default() += controller.handle_scroll(viewport.scroll);
                }
                180 => {
                    *spawned.entry("hover").or_default() +=
                        controller.spawn_hover_burst(Rect::new(100.0, 80.0, 180.0, 32.0));
                }
                240 => {
                    *spawned.entry("profile").or_default() +=
                        controller.handle_click(ANCHOR.center(), ClickTarget::Anchor);
                }
                300 => {
                    viewport.width = 1024.0;
                    viewport.height = 640.0;
                    controller.handle_resize(viewport.width, viewport.height);
                }
                _ => {}
            }

            let anchor = Rect {
                y: ANCHOR.y - viewport.scroll.y,
                ..ANCHOR
            };
            let env = FrameEnv {
                now_ms: now,
                viewport,
                anchor: Some(anchor),
            };
            controller.frame(&env, Some(&mut surface));
        }
        controller.teardown();

        let field = controller.field();
        let by_kind = ParticleKind::ALL
            .iter()
            .map(|&kind| (kind.as_str(), field.count(kind)))
            .filter(|&(_, n)| n > 0)
            .collect();

        Summary {
            page: preset.as_str(),
            seed,
            frames: controller.frames(),
            particles: field.len(),
            by_kind,
            spawned,
            last_frame: FrameSummary {
                width: surface.width,
                height: surface.height,
                discs: surface.discs(),
                rings: surface.rings(),
                lines: surface.lines().count(),
            },
        }
    }
}
