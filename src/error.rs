//! Error types for the viewer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while bringing up or driving the GPU side.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("surface reports no supported texture format for this adapter")]
    SurfaceUnsupported,

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("program failed to link:\n{log}")]
    ProgramLink { log: String },

    #[error("{op}: {source}")]
    Graphics {
        op: &'static str,
        #[source]
        source: wgpu::SurfaceError,
    },
}

impl RenderError {
    /// Shader and link failures leave no usable program, so the host must stop.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::Graphics { .. })
    }
}

/// Failures while opening or decoding a media source.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("cannot open media {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read media: {0}")]
    Read(#[from] std::io::Error),

    #[error("media range is empty")]
    Empty,

    #[error("cannot decode media: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no media source attached")]
    NoSource,

    #[error("player is not prepared")]
    NotPrepared,
}

/// Configuration file problems. These never stop the viewer.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
