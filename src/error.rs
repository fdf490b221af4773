//! Error types for each layer of the renderer.

use std::path::PathBuf;

use crate::shaders::ShaderStage;

/// Failure to obtain a usable shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// The `#shader` file could not be read.
    #[error("failed to read shader file {}: {source}", .path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// One stage failed to compile.
    #[error("{stage} shader failed to compile: {log}")]
    Compile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Driver info log.
        log: String,
    },

    /// The stages compiled but the program failed to link; holds the info log.
    #[error("shader program failed to link: {0}")]
    Link(String),

    /// The driver refused to create a shader or program object.
    #[error("failed to create shader object: {0}")]
    Create(String),
}

impl ShaderError {
    /// The stage that failed to compile, if this is a compile error.
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            Self::Compile { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Rejection of a quad by a full batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// The batch already holds `capacity` quads.
    #[error("batch is full ({capacity} quads)")]
    Overflow {
        /// Quads per batch.
        capacity: u32,
    },
}

/// GPU resource failures.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A buffer or vertex array could not be created.
    #[error("GPU allocation failed: {0}")]
    Allocation(String),

    /// The program has no active uniform with this name.
    #[error("uniform `{0}` not found in program")]
    MissingUniform(String),
}

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML for [`RendererConfig`](crate::RendererConfig).
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the renderer cannot use.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error returned by [`BatchRenderer`](crate::BatchRenderer).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// See [`ShaderError`].
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// See [`DeviceError`].
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}
