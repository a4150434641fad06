//! The windowed host: a winit event loop painting through [`GpuCanvas`].
//!
//! Frame requests map onto `Window::request_redraw`. At most one request is
//! outstanding; `RedrawRequested` fires it into the driver and presents.

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::canvas::{Canvas, Viewport};
use crate::config::BackdropConfig;
use crate::driver::AnimationDriver;
use crate::error::BackdropError;
use crate::gpu::GpuCanvas;
use crate::host::Host;
use crate::input::signal_from_window_event;
use crate::signal::{Listeners, Signal};
use crate::ticks::{FrameRequest, TickSource};
use crate::time::FrameClock;

struct WindowHost {
    window: Arc<Window>,
    gpu: Option<GpuCanvas>,
    viewport: Viewport,
    pending: Option<FrameRequest>,
    next_id: u64,
    listeners: Listeners,
}

impl WindowHost {
    fn new(window: Arc<Window>, gpu: GpuCanvas) -> Self {
        let size = window.inner_size();
        Self {
            window,
            gpu: Some(gpu),
            viewport: Viewport::new(size.width, size.height),
            pending: None,
            next_id: 0,
            listeners: Listeners::new(),
        }
    }
}

impl TickSource for WindowHost {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        self.window.request_redraw();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn pending_frames(&self) -> usize {
        usize::from(self.pending.is_some())
    }
}

impl Host for WindowHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn canvas(&mut self) -> Option<&mut dyn Canvas> {
        self.gpu.as_mut().map(|gpu| gpu as &mut dyn Canvas)
    }

    fn listeners(&mut self) -> &mut Listeners {
        &mut self.listeners
    }
}

struct App {
    driver: AnimationDriver,
    host: Option<WindowHost>,
    clock: FrameClock,
    /// Setup failure to hand back from [`run`].
    error: Option<BackdropError>,
}

impl App {
    fn new(config: BackdropConfig) -> Result<Self, BackdropError> {
        Ok(Self {
            driver: AnimationDriver::new(config)?,
            host: None,
            clock: FrameClock::default(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: BackdropError) {
        error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        let Some(request) = host.pending.take() else {
            return;
        };

        self.driver.on_frame(host, request);

        if let Some(gpu) = host.gpu.as_mut() {
            match gpu.present() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!("render error: {:?}", e),
            }
        }

        if let Some(fps) = self.clock.tick() {
            debug!("{:.1} fps over {} frames", fps, self.clock.frame());
            let title = &self.driver.config().window.title;
            host.window.set_title(&format!("{} ({:.0} fps)", title, fps));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        let window_config = &self.driver.config().window;
        let window_attrs = Window::default_attributes()
            .with_title(window_config.title.as_str())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        let gpu = match pollster::block_on(GpuCanvas::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let mut host = WindowHost::new(window, gpu);
        self.driver.mount(&mut host);
        self.host = Some(host);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            event => {
                let (Some(host), Some(signal)) =
                    (self.host.as_mut(), signal_from_window_event(&event))
                else {
                    return;
                };
                if let Signal::Resize { width, height } = signal {
                    host.viewport = Viewport::new(width, height);
                }
                self.driver.deliver(host, signal);
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            self.driver.unmount(host);
        }
    }
}

/// Open a window and animate the backdrop until it is closed.
pub fn run(config: BackdropConfig) -> Result<(), BackdropError> {
    let mut app = App::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
