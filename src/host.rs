//! The environment an [`AnimationDriver`] runs in.
//!
//! A host owns the drawing surface, the frame scheduler, and the listener
//! registry. The driver borrows it for the duration of each call and never
//! keeps references into it.

use log::debug;

use crate::canvas::{Canvas, Viewport};
use crate::driver::AnimationDriver;
use crate::signal::{Listeners, Signal};
use crate::ticks::{FrameRequest, ManualTicks, TickSource};

/// Everything the driver needs from its environment.
pub trait Host: TickSource {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// The drawing surface, or `None` while it is unavailable.
    fn canvas(&mut self) -> Option<&mut dyn Canvas>;

    fn listeners(&mut self) -> &mut Listeners;
}

/// A host without a window, stepped by hand.
///
/// Used for tests and snapshot rendering. Frames only run when [`step`](Self::step)
/// or [`run`](Self::run) is called.
pub struct HeadlessHost<C: Canvas> {
    viewport: Viewport,
    canvas: Option<C>,
    ticks: ManualTicks,
    listeners: Listeners,
}

impl<C: Canvas> HeadlessHost<C> {
    /// A host painting on `canvas`. The viewport starts at the canvas size.
    pub fn new(canvas: C) -> Self {
        Self {
            viewport: canvas.size(),
            canvas: Some(canvas),
            ticks: ManualTicks::new(),
            listeners: Listeners::new(),
        }
    }

    /// A host whose surface is unavailable.
    pub fn detached(viewport: Viewport) -> Self {
        Self {
            viewport,
            canvas: None,
            ticks: ManualTicks::new(),
            listeners: Listeners::new(),
        }
    }

    /// Fire the oldest pending frame. Returns `false` if none was pending.
    pub fn step(&mut self, driver: &mut AnimationDriver) -> bool {
        match self.ticks.pop() {
            Some(request) => {
                driver.on_frame(self, request);
                true
            }
            None => false,
        }
    }

    /// Fire up to `frames` frames, returning how many actually ran.
    pub fn run(&mut self, driver: &mut AnimationDriver, frames: usize) -> usize {
        (0..frames).take_while(|_| self.step(driver)).count()
    }

    /// Change the viewport and notify the driver.
    pub fn resize(&mut self, driver: &mut AnimationDriver, width: u32, height: u32) {
        debug!("headless resize to {}x{}", width, height);
        self.viewport = Viewport::new(width, height);
        driver.deliver(self, Signal::Resize { width, height });
    }

    /// Move the pointer and notify the driver.
    pub fn move_pointer(&mut self, driver: &mut AnimationDriver, x: f32, y: f32) {
        driver.deliver(self, Signal::PointerMove { x, y });
    }

    /// Take the surface away, as when it is torn down mid-animation.
    pub fn detach_canvas(&mut self) -> Option<C> {
        self.canvas.take()
    }

    /// Give the host a surface again.
    pub fn attach_canvas(&mut self, canvas: C) {
        self.canvas = Some(canvas);
    }

    pub fn surface(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn ticks(&self) -> &ManualTicks {
        &self.ticks
    }

    pub fn registered_listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn into_canvas(self) -> Option<C> {
        self.canvas
    }
}

impl<C: Canvas> TickSource for HeadlessHost<C> {
    fn request_frame(&mut self) -> FrameRequest {
        self.ticks.request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.ticks.cancel_frame(request);
    }

    fn pending_frames(&self) -> usize {
        self.ticks.pending_frames()
    }
}

impl<C: Canvas> Host for HeadlessHost<C> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn canvas(&mut self) -> Option<&mut dyn Canvas> {
        self.canvas.as_mut().map(|c| c as &mut dyn Canvas)
    }

    fn listeners(&mut self) -> &mut Listeners {
        &mut self.listeners
    }
}
