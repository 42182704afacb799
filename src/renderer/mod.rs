//! 2D rendering module
//!
//! Immediate-mode drawing over a `Surface`: soft discs for particles, thin
//! rings for decorated kinds, and straight connection lines.

pub mod draw;
pub mod surface;

pub use draw::draw;
pub use surface::{DrawCommand, RecordingSurface, Surface};
