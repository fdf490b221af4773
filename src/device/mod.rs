//! The GPU operations the batch renderer depends on.
//!
//! [`Device`] is the seam between batch logic and the graphics API. The
//! production implementation is [`GlDevice`] (feature `glow`); everything
//! above this module is API-agnostic and runs headless against a recording
//! device in tests.

#[cfg(feature = "glow")]
mod gl;
#[cfg(test)]
pub(crate) mod recording;

#[cfg(feature = "glow")]
pub use gl::GlDevice;

use glam::Mat4;

use crate::error::{DeviceError, ShaderError};
use crate::types::VertexAttribute;

/// Graphics operations used by [`BatchBuffer`](crate::BatchBuffer) and
/// [`BatchRenderer`](crate::BatchRenderer).
///
/// Calls are issued in program order on a single command stream; a buffer
/// write is ordered before any later draw that reads the buffer.
pub trait Device {
    /// Buffer object handle.
    type Buffer: Copy;
    /// Vertex array (input layout) handle.
    type VertexArray: Copy;
    /// Linked shader program handle.
    type Program: Copy;

    /// Allocate an uninitialized vertex buffer of `size` bytes for data
    /// rewritten every frame.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Allocation`] if the buffer cannot be created.
    fn create_dynamic_vertex_buffer(&mut self, size: usize) -> Result<Self::Buffer, DeviceError>;

    /// Allocate an index buffer holding `indices`, never written again.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Allocation`] if the buffer cannot be created.
    fn create_static_index_buffer(&mut self, indices: &[u32])
        -> Result<Self::Buffer, DeviceError>;

    /// Create a vertex array binding `vertices` with `attributes` (all
    /// `f32`, `stride` bytes apart) and `indices` as its element buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Allocation`] if the vertex array cannot be
    /// created.
    fn create_vertex_array(
        &mut self,
        vertices: Self::Buffer,
        indices: Self::Buffer,
        attributes: &[VertexAttribute],
        stride: i32,
    ) -> Result<Self::VertexArray, DeviceError>;

    /// Overwrite `buffer` from offset zero with `data`.
    fn write_vertex_buffer(&mut self, buffer: Self::Buffer, data: &[u8]);

    /// Compile both stages and link them into a program.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compile`] naming the failing stage, or
    /// [`ShaderError::Link`] if linking fails. No program handle survives a
    /// failure.
    fn compile_program(&mut self, vertex: &str, fragment: &str)
        -> Result<Self::Program, ShaderError>;

    /// Bind `program` for subsequent draws.
    fn use_program(&mut self, program: Self::Program);

    /// Set a `mat4` uniform on the bound `program`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::MissingUniform`] if the program has no active
    /// uniform called `name`.
    fn set_uniform_mat4(
        &mut self,
        program: Self::Program,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), DeviceError>;

    /// Clear the color buffer of the current framebuffer.
    fn clear(&mut self, color: [f32; 4]);

    /// Set the viewport rectangle, in pixels.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Draw `count` indices as a triangle list, starting at index `first`.
    fn draw_indexed(&mut self, vertex_array: Self::VertexArray, count: u32, first: u32);

    /// Release a buffer.
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    /// Release a vertex array.
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);
    /// Release a program.
    fn delete_program(&mut self, program: Self::Program);
}
