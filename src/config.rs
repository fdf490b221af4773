//! Renderer configuration, loadable from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! max_quads = 1000
//! quad_size = 1.0
//! quad_color = [0.18, 0.6, 0.96, 1.0]
//! clear_color = [0.0, 0.0, 0.0, 1.0]
//! overflow = "flush"
//! shader_path = "Shader.glsl"
//!
//! [projection]
//! left = -10.0
//! right = 10.0
//! bottom = -10.0
//! top = 10.0
//! near = -1.0
//! far = 1.0
//! ```

use std::path::{Path, PathBuf};

use glam::Mat4;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::index::MAX_QUAD_LIMIT;
use crate::types::DEFAULT_QUAD_COLOR;

/// What to do with a quad that does not fit in the current batch.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Submit the full batch and continue in a fresh one.
    #[default]
    Flush,
    /// Reject the quad and report it as dropped.
    Drop,
}

/// Orthographic view volume.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct Projection {
    /// Left clipping plane.
    pub left: f32,
    /// Right clipping plane.
    pub right: f32,
    /// Bottom clipping plane.
    pub bottom: f32,
    /// Top clipping plane.
    pub top: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            left: -10.0,
            right: 10.0,
            bottom: -10.0,
            top: 10.0,
            near: -1.0,
            far: 1.0,
        }
    }
}

impl Projection {
    /// OpenGL clip-space projection matrix for this volume.
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

/// Settings for [`BatchRenderer`](crate::BatchRenderer).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    /// Quads per draw submission.
    pub max_quads: u32,
    /// Edge length of every quad.
    pub quad_size: f32,
    /// Fill color of every quad.
    pub quad_color: [f32; 4],
    /// Color the frame is cleared to before drawing.
    pub clear_color: [f32; 4],
    /// Handling of quads past `max_quads` in one frame.
    pub overflow: OverflowPolicy,
    /// View volume used for the `u_MVP` matrix.
    pub projection: Projection,
    /// `#shader` file to use instead of the built-in program.
    pub shader_path: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_quads: 1000,
            quad_size: 1.0,
            quad_color: DEFAULT_QUAD_COLOR,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            overflow: OverflowPolicy::Flush,
            projection: Projection::default(),
            shader_path: None,
        }
    }
}

impl RendererConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if [`validate`](Self::validate) fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded renderer config from {}", path.display());
        Ok(config)
    }

    /// Check the values a renderer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_quads == 0 {
            return Err(ConfigError::Invalid("max_quads must be at least 1".into()));
        }
        if self.max_quads > MAX_QUAD_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_quads {} exceeds the limit of {MAX_QUAD_LIMIT}",
                self.max_quads
            )));
        }
        if !(self.quad_size.is_finite() && self.quad_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "quad_size must be positive, got {}",
                self.quad_size
            )));
        }
        let p = &self.projection;
        if p.left == p.right || p.bottom == p.top || p.near == p.far {
            return Err(ConfigError::Invalid(
                "projection volume must have non-zero extent on every axis".into(),
            ));
        }
        Ok(())
    }
}
