//! Pointer tracking and window event translation.
//!
//! The backdrop records where the pointer is, normalized to the viewport
//! with the origin at the center (`-0.5..0.5` on both axes, y down). Nothing
//! in the rendering path reads it yet; it is kept for a parallax effect.

use glam::Vec2;
use winit::event::WindowEvent;

use crate::canvas::Viewport;
use crate::signal::Signal;

/// Last known pointer position.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Vec2,
    normalized: Vec2,
    delta: Vec2,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in physical pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Pointer position relative to the viewport center, roughly `-0.5..0.5`.
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }

    /// Movement of the last update in pixels.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Record a move to `(x, y)`. A zero-sized viewport leaves the
    /// normalized position unchanged.
    pub fn move_to(&mut self, x: f32, y: f32, viewport: Viewport) {
        let new_pos = Vec2::new(x, y);
        self.delta = new_pos - self.position;
        self.position = new_pos;

        if !viewport.is_empty() {
            self.normalized = new_pos / viewport.size() - Vec2::splat(0.5);
        }
    }
}

/// Translate a winit window event into a backdrop signal, if it is one.
pub(crate) fn signal_from_window_event(event: &WindowEvent) -> Option<Signal> {
    match event {
        WindowEvent::Resized(size) => Some(Signal::Resize {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::CursorMoved { position, .. } => Some(Signal::PointerMove {
            x: position.x as f32,
            y: position.y as f32,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_origin() {
        let mut pointer = Pointer::new();
        pointer.move_to(400.0, 300.0, Viewport::new(800, 600));
        assert!(pointer.normalized().abs_diff_eq(Vec2::ZERO, 1e-6));
    }

    #[test]
    fn test_corners_span_half_unit() {
        let mut pointer = Pointer::new();
        let viewport = Viewport::new(800, 600);

        pointer.move_to(0.0, 0.0, viewport);
        assert_eq!(pointer.normalized(), Vec2::new(-0.5, -0.5));

        pointer.move_to(800.0, 600.0, viewport);
        assert_eq!(pointer.normalized(), Vec2::new(0.5, 0.5));
        assert_eq!(pointer.delta(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_zero_viewport_keeps_last_normalized() {
        let mut pointer = Pointer::new();
        pointer.move_to(200.0, 150.0, Viewport::new(800, 600));
        let before = pointer.normalized();

        pointer.move_to(10.0, 10.0, Viewport::new(0, 0));
        assert_eq!(pointer.normalized(), before);
        assert_eq!(pointer.position(), Vec2::new(10.0, 10.0));
    }
}
