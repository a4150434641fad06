//! Backdrop builder and runner

use std::path::Path;

use log::info;

use crate::canvas::PixelCanvas;
use crate::config::BackdropConfig;
use crate::driver::AnimationDriver;
use crate::error::BackdropError;
use crate::host::HeadlessHost;

/// A neural backdrop builder.
///
/// Use method chaining to configure, then call `.run()` to open a window or
/// `.snapshot()` to render offscreen.
#[derive(Clone, Debug, Default)]
pub struct Backdrop {
    config: BackdropConfig,
}

impl Backdrop {
    /// Create a backdrop with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: BackdropConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the RNG seed for a reproducible layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the window (or snapshot) size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Open a window and animate until it is closed.
    pub fn run(self) -> Result<(), BackdropError> {
        crate::window::run(self.config)
    }

    /// Render `frames` frames offscreen and save the last one as a PNG.
    ///
    /// At least one frame is always painted.
    pub fn snapshot(self, path: impl AsRef<Path>, frames: usize) -> Result<(), BackdropError> {
        let path = path.as_ref();
        let (width, height) = (self.config.window.width, self.config.window.height);

        let mut driver = AnimationDriver::new(self.config)?;
        let mut host = HeadlessHost::new(PixelCanvas::new(width, height));

        driver.mount(&mut host);
        let ran = host.run(&mut driver, frames.max(1));
        driver.unmount(&mut host);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(canvas) = host.surface() {
            canvas.save_png(path)?;
        }
        info!("wrote {}x{} snapshot after {} frames to {}", width, height, ran, path.display());
        Ok(())
    }
}
