//! # Neural Backdrop
//!
//! An animated "neural network" background: drifting clusters of pulsing
//! particles, with faint gradient lines between nearby particles of the same
//! cluster, over a dark vignetted fill.
//!
//! ## Quick Start
//!
//! ```ignore
//! use neural_backdrop::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     Backdrop::new()
//!         .with_seed(42)
//!         .with_size(1280, 720)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Scene
//!
//! A [`Scene`] is built in three stages: a [`ClusterField`] of drifting
//! anchors, a [`ParticleSet`] of particles offset from their cluster, and a
//! [`ConnectionSet`] holding every same-cluster particle pair. Each frame
//! advances clusters, then particles, then recomputes connection opacities.
//!
//! ### Canvas
//!
//! Painting goes through the [`Canvas`] trait. Three backends ship with the
//! crate:
//!
//! - [`GpuCanvas`] draws into a window surface with wgpu
//! - [`PixelCanvas`] rasterizes into an RGBA image (used for snapshots)
//! - [`RecordingCanvas`] records draw calls for inspection
//!
//! ### Driver and hosts
//!
//! The [`AnimationDriver`] owns the scene and a small state machine
//! (stopped or running). It schedules itself on a [`Host`], which supplies
//! frame callbacks, the canvas, and resize/pointer signals. Unmounting
//! cancels the pending frame and removes every listener it registered.
//!
//! ```ignore
//! let mut driver = AnimationDriver::new(BackdropConfig::default())?;
//! let mut host = HeadlessHost::new(PixelCanvas::new(800, 600));
//!
//! driver.mount(&mut host);
//! host.run(&mut driver, 120);
//! host.resize(&mut driver, 1200, 900);
//! driver.unmount(&mut host);
//! ```
//!
//! ## Configuration
//!
//! Every tunable lives in [`BackdropConfig`], which loads from JSON. Missing
//! fields take their defaults:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "clusters": { "count": 5 },
//!   "style": { "primary": "#22d3ee" }
//! }
//! ```

pub mod backdrop;
pub mod canvas;
pub mod cluster;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
mod gpu;
pub mod host;
pub mod input;
pub mod particle;
pub mod scene;
pub mod signal;
pub mod ticks;
pub mod time;
mod window;

pub use backdrop::Backdrop;
pub use canvas::{Canvas, DrawCommand, PixelCanvas, RecordingCanvas, Viewport};
pub use cluster::{Cluster, ClusterField};
pub use config::{
    BackdropConfig, ClusterConfig, Color, ConnectionConfig, ParticleConfig, StyleConfig,
    VignetteConfig, WindowConfig,
};
pub use connection::{Connection, ConnectionSet};
pub use driver::{AnimationDriver, DriverState};
pub use error::{BackdropError, ConfigError, GpuError};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::GpuCanvas;
pub use host::{HeadlessHost, Host};
pub use particle::{Particle, ParticleSet};
pub use scene::Scene;
pub use signal::{ListenerId, Listeners, Signal, SignalKind};
pub use ticks::{FrameRequest, ManualTicks, TickSource};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use neural_backdrop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::canvas::{Canvas, PixelCanvas, Viewport};
    pub use crate::config::{BackdropConfig, Color};
    pub use crate::driver::AnimationDriver;
    pub use crate::error::BackdropError;
    pub use crate::host::{HeadlessHost, Host};
    pub use crate::{Vec2, Vec3, Vec4};
}
