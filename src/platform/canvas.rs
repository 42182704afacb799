//! `Surface` over a 2D canvas context

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::renderer::Surface;
use crate::sim::Rgb;

/// Full-viewport overlay that never intercepts input
const OVERLAY_STYLE: &str = "position:fixed;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:0";

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Create an overlay canvas and append it to `<body>`
    pub fn attach(document: &web_sys::Document) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_attribute("style", OVERLAY_STYLE)?;
        canvas.set_attribute("aria-hidden", "true")?;
        body.append_child(&canvas)?;
        Self::new(canvas)
    }

    /// Remove the canvas from the document
    pub fn detach(&self) {
        self.canvas.remove();
    }

    fn circle(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn soft_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius as f64) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.css(alpha));
        let _ = gradient.add_color_stop(1.0, &color.css(0.0));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle(center, radius);
        self.ctx.fill();
    }

    fn ring(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32, width: f32) {
        self.ctx.set_stroke_style_str(&color.css(alpha));
        self.ctx.set_line_width(width as f64);
        self.circle(center, radius);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) {
        self.ctx.set_stroke_style_str(&color.css(alpha));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
