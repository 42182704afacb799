//! Drawing surface abstraction
//!
//! The renderer only ever talks to a `Surface`. The browser implements it on
//! top of a 2D canvas; tests and the native binary use `RecordingSurface`.

use glam::Vec2;
use serde::Serialize;

use crate::sim::Rgb;

/// Minimal immediate-mode 2D target, in screen pixels
pub trait Surface {
    /// Current pixel size
    fn size(&self) -> Vec2;
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    /// Filled disc fading from `alpha` at the center to transparent at `radius`
    fn soft_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    fn ring(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32, width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    SoftDisc {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Ring {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
        width: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        alpha: f32,
        width: f32,
    },
}

/// Surface that keeps the draw calls of the current frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn discs(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::SoftDisc { .. }))
            .count()
    }

    pub fn rings(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ring { .. }))
            .count()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Starts a new frame: previous commands are dropped
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn soft_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::SoftDisc {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn ring(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            color,
            alpha,
            width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            alpha,
            width,
        });
    }
}
