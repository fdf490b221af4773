//! [`Device`] over OpenGL 3.3 via [glow].
//!
//! [glow]: https://docs.rs/glow

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

use super::Device;
use crate::error::{DeviceError, ShaderError};
use crate::shaders::ShaderStage;
use crate::types::VertexAttribute;

/// Convert a count or size to the `i32` GL expects.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. Only used for draw counts, offsets and
/// viewport sizes; batch capacity is capped at
/// [`MAX_QUAD_LIMIT`](crate::index::MAX_QUAD_LIMIT), which keeps index counts
/// in range. Buffer sizes go through `buffer_size` instead.
fn gl_int<T: TryInto<i32>>(value: T) -> i32 {
    value
        .try_into()
        .unwrap_or_else(|_| panic!("value exceeds i32::MAX"))
}

/// Convert a buffer size in bytes to the `i32` GL expects.
fn buffer_size(bytes: usize) -> Result<i32, DeviceError> {
    i32::try_from(bytes)
        .map_err(|_| DeviceError::Allocation(format!("buffer of {bytes} bytes exceeds i32::MAX")))
}

/// An OpenGL [`Device`].
///
/// Holds the context in an [`Arc`] so the caller can keep using it for the
/// overlay pass and buffer swaps.
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    /// Wrap a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for the whole lifetime of
    /// this device, and must support OpenGL 3.3 core.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// The wrapped context.
    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    /// Compile a single shader stage from source.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, ShaderError> {
        let gl = &self.gl;
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe {
            let shader = gl.create_shader(kind).map_err(ShaderError::Create)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                log::error!("failed to compile {stage} shader: {log}");
                return Err(ShaderError::Compile { stage, log });
            }

            Ok(shader)
        }
    }
}

impl Device for GlDevice {
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Program = glow::Program;

    fn create_dynamic_vertex_buffer(&mut self, size: usize) -> Result<glow::Buffer, DeviceError> {
        let size = buffer_size(size)?;
        let gl = &self.gl;
        unsafe {
            let buffer = gl.create_buffer().map_err(DeviceError::Allocation)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_size(glow::ARRAY_BUFFER, size, glow::DYNAMIC_DRAW);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn create_static_index_buffer(&mut self, indices: &[u32]) -> Result<glow::Buffer, DeviceError> {
        buffer_size(std::mem::size_of_val(indices))?;
        let gl = &self.gl;
        unsafe {
            let buffer = gl.create_buffer().map_err(DeviceError::Allocation)?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn create_vertex_array(
        &mut self,
        vertices: glow::Buffer,
        indices: glow::Buffer,
        attributes: &[VertexAttribute],
        stride: i32,
    ) -> Result<glow::VertexArray, DeviceError> {
        let gl = &self.gl;
        unsafe {
            let vao = gl.create_vertex_array().map_err(DeviceError::Allocation)?;
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices));
            // The element binding is recorded in the VAO.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(indices));

            for attr in attributes {
                gl.enable_vertex_attrib_array(attr.location);
                gl.vertex_attrib_pointer_f32(
                    attr.location,
                    attr.components,
                    glow::FLOAT,
                    false,
                    stride,
                    attr.offset,
                );
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(vao)
        }
    }

    fn write_vertex_buffer(&mut self, buffer: glow::Buffer, data: &[u8]) {
        let gl = &self.gl;
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, data);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn compile_program(&mut self, vertex: &str, fragment: &str) -> Result<glow::Program, ShaderError> {
        let vs = self.compile_shader(ShaderStage::Vertex, vertex)?;
        let fs = match self.compile_shader(ShaderStage::Fragment, fragment) {
            Ok(fs) => fs,
            Err(e) => {
                unsafe { self.gl.delete_shader(vs) };
                return Err(e);
            }
        };

        let gl = &self.gl;
        unsafe {
            let program = match gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    gl.delete_shader(vs);
                    gl.delete_shader(fs);
                    return Err(ShaderError::Create(e));
                }
            };
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);

            let linked = gl.get_program_link_status(program);
            gl.detach_shader(program, vs);
            gl.detach_shader(program, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);

            if !linked {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                log::error!("failed to link shader program: {log}");
                return Err(ShaderError::Link(log));
            }

            Ok(program)
        }
    }

    fn use_program(&mut self, program: glow::Program) {
        unsafe { self.gl.use_program(Some(program)) };
    }

    fn set_uniform_mat4(
        &mut self,
        program: glow::Program,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), DeviceError> {
        let gl = &self.gl;
        unsafe {
            let location = gl
                .get_uniform_location(program, name)
                .ok_or_else(|| DeviceError::MissingUniform(name.to_owned()))?;
            gl.uniform_matrix_4_f32_slice(Some(&location), false, &matrix.to_cols_array());
        }
        Ok(())
    }

    fn clear(&mut self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_int(width), gl_int(height)) };
    }

    fn draw_indexed(&mut self, vertex_array: glow::VertexArray, count: u32, first: u32) {
        let gl = &self.gl;
        let offset = gl_int(u64::from(first) * std::mem::size_of::<u32>() as u64);
        unsafe {
            gl.bind_vertex_array(Some(vertex_array));
            gl.draw_elements(glow::TRIANGLES, gl_int(count), glow::UNSIGNED_INT, offset);
            gl.bind_vertex_array(None);
        }
    }

    fn delete_buffer(&mut self, buffer: glow::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) };
    }

    fn delete_vertex_array(&mut self, vertex_array: glow::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) };
    }

    fn delete_program(&mut self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn oversized_buffer_is_an_allocation_error() {
        assert_eq!(buffer_size(1024).ok(), Some(1024));
        let err = buffer_size(3_200_000_000).unwrap_err();
        assert!(matches!(err, DeviceError::Allocation(_)));
    }
}
