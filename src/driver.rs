//! The animation driver.
//!
//! Two states: [`DriverState::Stopped`] before mount and after unmount, and
//! [`DriverState::Running`] in between. While running exactly one frame is
//! scheduled at any time; each frame schedules the next.
//!
//! ```ignore
//! let mut driver = AnimationDriver::new(BackdropConfig::default())?;
//! let mut host = HeadlessHost::new(PixelCanvas::new(800, 600));
//!
//! driver.mount(&mut host);
//! host.run(&mut driver, 60);
//! driver.unmount(&mut host);
//! ```

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::canvas::Viewport;
use crate::config::BackdropConfig;
use crate::error::ConfigError;
use crate::host::Host;
use crate::input::Pointer;
use crate::scene::Scene;
use crate::signal::{ListenerId, Signal, SignalKind};
use crate::ticks::FrameRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running {
        /// The one frame currently scheduled.
        pending: FrameRequest,
    },
}

/// Owns the scene and drives it from a [`Host`].
pub struct AnimationDriver {
    config: BackdropConfig,
    rng: StdRng,
    state: DriverState,
    scene: Option<Scene>,
    viewport: Viewport,
    pointer: Pointer,
    listeners: Vec<ListenerId>,
    frames: u64,
}

impl AnimationDriver {
    /// A stopped driver. The RNG is seeded from `config.seed` when set.
    ///
    /// Fails if `config` does not pass [`BackdropConfig::validate`].
    pub fn new(config: BackdropConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            state: DriverState::Stopped,
            scene: None,
            viewport: Viewport::default(),
            pointer: Pointer::new(),
            listeners: Vec::new(),
            frames: 0,
        })
    }

    /// Build the scene, subscribe to the host, and schedule the first frame.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.is_running() {
            warn!("mount called on a running driver; ignoring");
            return;
        }

        self.viewport = host.viewport();
        if let Some(canvas) = host.canvas() {
            canvas.resize(self.viewport.width, self.viewport.height);
        }

        let scene = match Scene::build(&self.config, self.viewport, &mut self.rng) {
            Ok(scene) => scene,
            Err(err) => {
                warn!("not mounting: {}", err);
                return;
            }
        };
        info!(
            "mounted backdrop at {}x{}: {} clusters, {} particles, {} candidate connections",
            self.viewport.width,
            self.viewport.height,
            scene.clusters().len(),
            scene.particles().len(),
            scene.connections().len(),
        );
        self.scene = Some(scene);

        let listeners = host.listeners();
        self.listeners = vec![
            listeners.add(SignalKind::Resize),
            listeners.add(SignalKind::PointerMove),
        ];

        self.frames = 0;
        self.state = DriverState::Running {
            pending: host.request_frame(),
        };
    }

    /// Run the frame for `request` and schedule the next one.
    ///
    /// Requests that are not the currently scheduled one are ignored.
    pub fn on_frame<H: Host + ?Sized>(&mut self, host: &mut H, request: FrameRequest) {
        match self.state {
            DriverState::Running { pending } if pending == request => {}
            _ => {
                trace!("ignoring stale frame {:?}", request);
                return;
            }
        }

        if let Some(scene) = self.scene.as_mut() {
            let canvas = host.canvas();
            if canvas.is_none() {
                trace!("canvas unavailable; skipping paint for frame {}", self.frames);
            }
            scene.frame(self.viewport, &self.config, canvas);
        }
        self.frames += 1;

        self.state = DriverState::Running {
            pending: host.request_frame(),
        };
    }

    /// Hand a signal to the driver if the host still has a listener for it.
    ///
    /// Returns whether the signal was delivered.
    pub fn deliver<H: Host + ?Sized>(&mut self, host: &mut H, signal: Signal) -> bool {
        if !self.is_running() || !host.listeners().is_listening(signal.kind()) {
            return false;
        }

        match signal {
            Signal::Resize { width, height } => {
                debug!("resize to {}x{}", width, height);
                self.viewport = Viewport::new(width, height);
                if let Some(canvas) = host.canvas() {
                    canvas.resize(width, height);
                }
            }
            Signal::PointerMove { x, y } => {
                self.pointer.move_to(x, y, self.viewport);
            }
        }
        true
    }

    /// Cancel the scheduled frame, drop the listeners and the scene.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        let DriverState::Running { pending } = self.state else {
            return;
        };

        host.cancel_frame(pending);
        let listeners = host.listeners();
        for id in self.listeners.drain(..) {
            listeners.remove(id);
        }
        self.scene = None;
        self.state = DriverState::Stopped;
        info!("unmounted backdrop after {} frames", self.frames);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    /// The live scene while running.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Tracked pointer. Rendering does not consume it.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Frames run since the last mount.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
