//! Error types for the backdrop.
//!
//! The simulation itself never fails. Errors only come from the edges:
//! loading configuration, bringing up a window and GPU device, and
//! writing snapshots.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The adapter cannot present to the window surface.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

/// Errors that can occur while loading or validating a [`BackdropConfig`](crate::BackdropConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur when running or snapshotting a backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Failed to encode a snapshot image.
    #[error("failed to write snapshot: {0}")]
    Snapshot(#[from] image::ImageError),
    /// Filesystem error outside config loading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
