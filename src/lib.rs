//! A dynamic batch renderer for axis-aligned quads, using OpenGL via [glow].
//!
//! Instead of one draw call per shape, every quad of a frame is lowered into
//! four vertices in a CPU staging arena, uploaded to a single GPU vertex
//! buffer with one full overwrite, and drawn with one indexed call against a
//! static index pattern built once at startup.
//!
//! # Features
//!
//! - **Fixed-capacity batches**: the staging arena, vertex buffer, and index
//!   buffer are sized once; overflowing quads are either flushed into an
//!   extra draw call or reported as dropped, never written out of bounds.
//! - **Static topology**: the index pattern depends only on capacity, so it is
//!   uploaded once and partial batches draw a prefix of it.
//! - **`#shader` files**: vertex and fragment stages live in one text file
//!   split at `#shader vertex` / `#shader fragment` markers.
//! - **Headless core**: the GPU is reached through the [`Device`] trait, so
//!   batching and frame sequencing run without a window.
//!
//! # Safety
//!
//! [`GlDevice::new`] is `unsafe`: it requires an OpenGL 3.3 core context
//! that stays current for the device's lifetime.
//!
//! [glow]: https://docs.rs/glow

mod batch;
pub mod config;
pub mod device;
mod error;
pub mod index;
pub mod logging;
pub mod quad;
mod render;
mod scene;
pub mod shaders;
mod types;

pub use batch::BatchBuffer;
pub use config::{OverflowPolicy, Projection, RendererConfig};
#[cfg(feature = "glow")]
pub use device::GlDevice;
pub use device::Device;
pub use error::{BatchError, ConfigError, DeviceError, RenderError, ShaderError};
pub use render::{BatchRenderer, FrameHooks, FrameState, FrameStats};
pub use scene::{QuadDesc, SceneState};
pub use shaders::{ShaderSource, ShaderStage};
pub use types::{Quad, Vertex, VertexAttribute, DEFAULT_QUAD_COLOR};
