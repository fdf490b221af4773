//! A headless [`Device`] that records every call, for tests.

use std::collections::HashMap;

use glam::Mat4;

use super::Device;
use crate::error::{DeviceError, ShaderError};
use crate::shaders::ShaderStage;
use crate::types::VertexAttribute;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateVertexBuffer { id: u32, size: usize },
    CreateIndexBuffer { id: u32, len: usize },
    CreateVertexArray { id: u32 },
    WriteVertexBuffer { id: u32, len: usize },
    CompileProgram { id: u32 },
    UseProgram(u32),
    SetUniformMat4 { name: String, matrix: Mat4 },
    Clear([f32; 4]),
    Viewport(u32, u32),
    DrawIndexed { count: u32, first: u32 },
    DeleteBuffer(u32),
    DeleteVertexArray(u32),
    DeleteProgram(u32),
}

#[derive(Default)]
pub(crate) struct RecordingDevice {
    pub calls: Vec<Call>,
    /// Latest contents of every buffer, by handle.
    pub buffers: HashMap<u32, Vec<u8>>,
    /// Force this stage to fail compilation.
    pub fail_stage: Option<ShaderStage>,
    /// Force every allocation to fail.
    pub fail_allocation: bool,
    pub uniforms: Vec<&'static str>,
    next_id: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            uniforms: vec![crate::shaders::MVP_UNIFORM],
            ..Self::default()
        }
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn allocate(&mut self) -> Result<u32, DeviceError> {
        if self.fail_allocation {
            return Err(DeviceError::Allocation("out of memory".into()));
        }
        Ok(self.next())
    }

    /// Index counts of every draw, in submission order.
    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::DrawIndexed { count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Handle of the first vertex buffer created.
    pub fn vertex_buffer_id(&self) -> u32 {
        self.calls
            .iter()
            .find_map(|c| match c {
                Call::CreateVertexBuffer { id, .. } => Some(*id),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn draw_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::DrawIndexed { .. }))
            .collect()
    }
}

impl Device for RecordingDevice {
    type Buffer = u32;
    type VertexArray = u32;
    type Program = u32;

    fn create_dynamic_vertex_buffer(&mut self, size: usize) -> Result<u32, DeviceError> {
        let id = self.allocate()?;
        self.buffers.insert(id, vec![0; size]);
        self.calls.push(Call::CreateVertexBuffer { id, size });
        Ok(id)
    }

    fn create_static_index_buffer(&mut self, indices: &[u32]) -> Result<u32, DeviceError> {
        let id = self.allocate()?;
        self.buffers.insert(id, bytemuck::cast_slice(indices).to_vec());
        self.calls.push(Call::CreateIndexBuffer {
            id,
            len: indices.len(),
        });
        Ok(id)
    }

    fn create_vertex_array(
        &mut self,
        _vertices: u32,
        _indices: u32,
        _attributes: &[VertexAttribute],
        _stride: i32,
    ) -> Result<u32, DeviceError> {
        let id = self.allocate()?;
        self.calls.push(Call::CreateVertexArray { id });
        Ok(id)
    }

    fn write_vertex_buffer(&mut self, buffer: u32, data: &[u8]) {
        let stored = self.buffers.entry(buffer).or_default();
        assert!(data.len() <= stored.len(), "write past end of buffer {buffer}");
        stored[..data.len()].copy_from_slice(data);
        self.calls.push(Call::WriteVertexBuffer {
            id: buffer,
            len: data.len(),
        });
    }

    fn compile_program(&mut self, vertex: &str, fragment: &str) -> Result<u32, ShaderError> {
        for (stage, source) in [
            (ShaderStage::Vertex, vertex),
            (ShaderStage::Fragment, fragment),
        ] {
            if self.fail_stage == Some(stage) || source.trim().is_empty() {
                return Err(ShaderError::Compile {
                    stage,
                    log: "0:1: error: no main".into(),
                });
            }
        }
        let id = self.next();
        self.calls.push(Call::CompileProgram { id });
        Ok(id)
    }

    fn use_program(&mut self, program: u32) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform_mat4(
        &mut self,
        _program: u32,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), DeviceError> {
        if !self.uniforms.iter().any(|u| *u == name) {
            return Err(DeviceError::MissingUniform(name.to_owned()));
        }
        self.calls.push(Call::SetUniformMat4 {
            name: name.to_owned(),
            matrix: *matrix,
        });
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(Call::Clear(color));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn draw_indexed(&mut self, _vertex_array: u32, count: u32, first: u32) {
        self.calls.push(Call::DrawIndexed { count, first });
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.buffers.remove(&buffer);
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn delete_vertex_array(&mut self, vertex_array: u32) {
        self.calls.push(Call::DeleteVertexArray(vertex_array));
    }

    fn delete_program(&mut self, program: u32) {
        self.calls.push(Call::DeleteProgram(program));
    }
}
