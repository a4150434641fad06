//! Drawing surfaces.
//!
//! The scene paints through the [`Canvas`] trait, which exposes just the
//! primitives the backdrop needs. Three backends implement it:
//!
//! - [`PixelCanvas`]: CPU rasterizer over an RGBA image (headless runs, snapshots)
//! - [`RecordingCanvas`]: keeps a log of draw calls (tests, benches)
//! - `GpuCanvas`: wgpu renderer used by the window host
//!
//! Colors are straight (non-premultiplied) RGBA in `[0, 1]`. Coordinates
//! are pixels with the origin at the top-left corner.

mod pixel;

use glam::{Vec2, Vec4};

pub use pixel::PixelCanvas;

/// Size of the drawable area in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size as floats.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Viewport {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A surface the backdrop can paint on.
pub trait Canvas {
    /// Current drawable size.
    fn size(&self) -> Viewport;

    /// Make the drawable size exactly `width` x `height`.
    fn resize(&mut self, width: u32, height: u32);

    /// Paint every pixel with an opaque color. Starts each frame.
    fn fill(&mut self, color: Vec4);

    /// Radial gradient from `color` at the center to transparent at `radius`.
    fn glow(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Solid disc.
    fn disc(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Line whose color runs from `start` at `from` to `end` at `to`.
    fn gradient_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Vec4, end: Vec4);

    /// Darken towards the edges.
    ///
    /// `inner` and `outer` are fractions of the center-to-corner distance:
    /// nothing changes inside `inner`, `color` is fully applied at `outer`.
    fn vignette(&mut self, inner: f32, outer: f32, color: Vec4);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill(Vec4),
    Glow { center: Vec2, radius: f32, color: Vec4 },
    Disc { center: Vec2, radius: f32, color: Vec4 },
    Line { from: Vec2, to: Vec2, width: f32, start: Vec4, end: Vec4 },
    Vignette { inner: f32, outer: f32, color: Vec4 },
}

/// A canvas that only remembers what it was asked to draw.
///
/// `fill` discards earlier commands, mirroring how an opaque fill hides
/// everything under it.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    size: Viewport,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Viewport::new(width, height),
            commands: Vec::new(),
        }
    }

    /// Commands since the last fill.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Viewport::new(width, height);
    }

    fn fill(&mut self, color: Vec4) {
        self.commands.clear();
        self.commands.push(DrawCommand::Fill(color));
    }

    fn glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Glow { center, radius, color });
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Disc { center, radius, color });
    }

    fn gradient_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Vec4, end: Vec4) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            start,
            end,
        });
    }

    fn vignette(&mut self, inner: f32, outer: f32, color: Vec4) {
        self.commands.push(DrawCommand::Vignette { inner, outer, color });
    }
}
