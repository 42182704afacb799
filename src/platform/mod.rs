//! Browser glue (wasm32 only)
//!
//! Translates DOM events into `ParticleController` calls:
//! - Canvas overlay and 2D drawing
//! - Window listeners (pointer, click, scroll, resize), removed on unmount
//! - requestAnimationFrame loop, cancelled on unmount
//! - `mount_particles()`, returning the handle that carries the trigger operations

pub mod canvas;
pub mod frame;
pub mod listeners;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, MouseEvent, Window};

use self::canvas::CanvasSurface;
use self::frame::FrameDriver;
use self::listeners::Listeners;
use crate::controller::{ClickTarget, FrameEnv, ParticleController, Viewport};
use crate::renderer::Surface;
use crate::{FieldConfig, PagePreset, Rect, Settings, Theme};

/// Selector of the element orbit particles gather around
const ANCHOR_SELECTOR: &str = "[data-profile-picture]";
/// Clicks inside these never spawn a burst
const INTERACTIVE_SELECTOR: &str = "a, button";

/// State shared between listeners and the frame loop
struct Mounted {
    controller: ParticleController,
    surface: Option<CanvasSurface>,
    anchor: Option<Element>,
}

impl Mounted {
    fn frame(&mut self, now_ms: f64) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let env = FrameEnv {
            now_ms,
            viewport: read_viewport(&window),
            anchor: self.anchor.as_ref().map(element_rect),
        };
        self.controller.frame(&env, self.surface.as_mut());
        self.controller.is_mounted()
    }

    fn click_target(&self, event: &MouseEvent) -> ClickTarget {
        let element = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok());
        if let Some(el) = &element {
            if matches!(el.closest(INTERACTIVE_SELECTOR), Ok(Some(_))) {
                return ClickTarget::Interactive;
            }
        }
        let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        match &self.anchor {
            Some(anchor) if element_rect(anchor).contains(point) => ClickTarget::Anchor,
            _ => ClickTarget::Plain,
        }
    }
}

/// One mounted particle field, owned by the page that mounted it.
/// Dropping it (or `free()` from JS) unmounts.
#[wasm_bindgen]
pub struct ParticleFieldHandle {
    state: Rc<RefCell<Mounted>>,
    listeners: Listeners,
    driver: Option<FrameDriver>,
}

impl ParticleFieldHandle {
    pub fn mount(config: FieldConfig, settings: Settings) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut surface = CanvasSurface::attach(&document)?;
        let viewport = read_viewport(&window);
        surface.resize(viewport.width as u32, viewport.height as u32);

        let anchor = document.query_selector(ANCHOR_SELECTOR).ok().flatten();
        let controller = ParticleController::new(
            config,
            settings,
            js_sys::Date::now() as u64,
            viewport,
            anchor.as_ref().map(element_rect),
        );

        let state = Rc::new(RefCell::new(Mounted {
            controller,
            surface: Some(surface),
            anchor,
        }));
        let listeners = register_listeners(&window, &state)?;

        let frame_state = state.clone();
        let driver = FrameDriver::start(move |time| frame_state.borrow_mut().frame(time));

        Ok(Self {
            state,
            listeners,
            driver: Some(driver),
        })
    }
}

#[wasm_bindgen]
impl ParticleFieldHandle {
    /// Hover burst around an element
    pub fn hover_burst_at(&self, element: &Element) -> usize {
        let rect = element_rect(element);
        self.state.borrow_mut().controller.spawn_hover_burst(rect)
    }

    pub fn profile_burst(&self) -> usize {
        self.state.borrow_mut().controller.spawn_profile_burst()
    }

    /// Follow a theme switch on the page ("dark" or "light")
    pub fn set_theme(&self, theme: &str) {
        match Theme::from_str(theme) {
            Some(theme) => self.state.borrow_mut().controller.set_theme(theme),
            None => warn!("Unknown theme '{}'", theme),
        }
    }

    /// Remove listeners, cancel the pending frame, drop the canvas
    pub fn unmount(&mut self) {
        self.listeners.clear();
        if let Some(driver) = self.driver.take() {
            driver.cancel();
        }
        let mut state = self.state.borrow_mut();
        if !state.controller.is_mounted() {
            return;
        }
        state.controller.teardown();
        if let Some(surface) = state.surface.take() {
            surface.detach();
        }
    }
}

impl Drop for ParticleFieldHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn register_listeners(
    window: &Window,
    state: &Rc<RefCell<Mounted>>,
) -> Result<Listeners, JsValue> {
    let mut listeners = Listeners::default();

    {
        let state = state.clone();
        listeners.add(window, "mousemove", move |event: Event| {
            if let Some(e) = event.dyn_ref::<MouseEvent>() {
                let pos = Vec2::new(e.client_x() as f32, e.client_y() as f32);
                state
                    .borrow_mut()
                    .controller
                    .handle_pointer_move(pos, event.time_stamp());
            }
        })?;
    }

    {
        let state = state.clone();
        listeners.add(window, "click", move |event: Event| {
            if let Some(e) = event.dyn_ref::<MouseEvent>() {
                let mut state = state.borrow_mut();
                let target = state.click_target(e);
                let pos = Vec2::new(e.client_x() as f32, e.client_y() as f32);
                state.controller.handle_click(pos, target);
            }
        })?;
    }

    {
        let state = state.clone();
        listeners.add(window, "scroll", move |_event: Event| {
            if let Some(w) = web_sys::window() {
                let scroll = Vec2::new(
                    w.scroll_x().unwrap_or(0.0) as f32,
                    w.scroll_y().unwrap_or(0.0) as f32,
                );
                state.borrow_mut().controller.handle_scroll(scroll);
            }
        })?;
    }

    {
        let state = state.clone();
        listeners.add(window, "resize", move |_event: Event| {
            if let Some(w) = web_sys::window() {
                let viewport = read_viewport(&w);
                state
                    .borrow_mut()
                    .controller
                    .handle_resize(viewport.width, viewport.height);
            }
        })?;
    }

    Ok(listeners)
}

fn read_viewport(window: &Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let scroll = Vec2::new(
        window.scroll_x().unwrap_or(0.0) as f32,
        window.scroll_y().unwrap_or(0.0) as f32,
    );
    let document = window
        .document()
        .and_then(|d| d.document_element())
        .map(|root| Vec2::new(root.scroll_width() as f32, root.scroll_height() as f32))
        .unwrap_or(Vec2::new(width, height));

    Viewport {
        width,
        height,
        scroll,
        document,
    }
}

fn element_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

fn page_config(document: &Document) -> FieldConfig {
    let body = document.body();
    if let Some(json) = body
        .as_ref()
        .and_then(|b| b.get_attribute("data-particle-config"))
    {
        match FieldConfig::from_json(&json) {
            Ok(config) => return config,
            Err(e) => warn!("Invalid particle config, using page preset: {}", e),
        }
    }

    let page = body
        .and_then(|b| b.get_attribute("data-particle-page"))
        .unwrap_or_default();
    let preset = PagePreset::from_str(&page).unwrap_or_else(|| {
        warn!("Unknown particle page '{}', using home preset", page);
        PagePreset::Home
    });
    info!("Particle preset: {}", preset.as_str());
    preset.config()
}

/// Mount on the current document. The caller keeps the returned handle for
/// the two trigger operations and unmounts through it. Returns `None` when the
/// page disabled particles.
#[wasm_bindgen]
pub fn mount_particles() -> Result<Option<ParticleFieldHandle>, JsValue> {
    let settings = Settings::from_page();
    if !settings.enabled {
        info!("Particles disabled on this page");
        return Ok(None);
    }
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    ParticleFieldHandle::mount(page_config(&document), settings).map(Some)
}
