//! CPU staging arena paired with its GPU vertex buffer.

use bytemuck::Zeroable;

use crate::device::Device;
use crate::error::{BatchError, DeviceError};
use crate::index::{self, INDICES_PER_QUAD, VERTICES_PER_QUAD};
use crate::quad;
use crate::types::{Quad, Vertex};

/// Geometry for one draw submission.
///
/// The staging arena is allocated once at full capacity and written through a
/// cursor; [`push_quad`](Self::push_quad) refuses quads past capacity instead
/// of writing out of bounds. Each [`upload`](Self::upload) overwrites the GPU
/// vertex buffer from offset zero with only the vertices staged this frame.
///
/// The index buffer holds the pattern from [`index::build_indices`] for the
/// full capacity and is never rewritten; draws simply reference its first
/// [`draw_count`](Self::draw_count) entries.
pub struct BatchBuffer<D: Device> {
    /// Staging arena, `4 * capacity` vertices long.
    staging: Vec<Vertex>,
    /// Number of staged vertices; always a multiple of four.
    cursor: usize,
    capacity: u32,

    vertex_array: D::VertexArray,
    vertex_buffer: D::Buffer,
    index_buffer: D::Buffer,
}

impl<D: Device> BatchBuffer<D> {
    /// Allocate staging and GPU storage for `capacity` quads and upload the
    /// index pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Allocation`] if any GPU object cannot be
    /// created. Handles created before the failure are released.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`index::MAX_QUAD_LIMIT`].
    pub fn new(device: &mut D, capacity: u32) -> Result<Self, DeviceError> {
        let indices = index::build_indices(capacity);
        let vertex_slots = (capacity * VERTICES_PER_QUAD) as usize;

        let vertex_buffer =
            device.create_dynamic_vertex_buffer(vertex_slots * std::mem::size_of::<Vertex>())?;
        let index_buffer = match device.create_static_index_buffer(&indices) {
            Ok(buffer) => buffer,
            Err(e) => {
                device.delete_buffer(vertex_buffer);
                return Err(e);
            }
        };
        let vertex_array = match device.create_vertex_array(
            vertex_buffer,
            index_buffer,
            &Vertex::ATTRIBUTES,
            Vertex::STRIDE,
        ) {
            Ok(vao) => vao,
            Err(e) => {
                device.delete_buffer(vertex_buffer);
                device.delete_buffer(index_buffer);
                return Err(e);
            }
        };

        log::debug!(
            "batch buffer allocated: {capacity} quads, {vertex_slots} vertices, {} indices",
            indices.len()
        );

        Ok(Self {
            staging: vec![Vertex::zeroed(); vertex_slots],
            cursor: 0,
            capacity,
            vertex_array,
            vertex_buffer,
            index_buffer,
        })
    }

    /// Discard everything staged so far.
    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Stage `quad` after the previously staged quads.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Overflow`] when the batch already holds
    /// [`capacity`](Self::capacity) quads; nothing is written in that case.
    pub fn push_quad(&mut self, quad: &Quad) -> Result<(), BatchError> {
        let end = self.cursor + VERTICES_PER_QUAD as usize;
        let slot: &mut [Vertex; 4] = self
            .staging
            .get_mut(self.cursor..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(BatchError::Overflow {
                capacity: self.capacity,
            })?;

        quad::write_quad(slot, quad);
        self.cursor = end;
        Ok(())
    }

    /// Copy the staged vertices into the GPU vertex buffer.
    pub fn upload(&self, device: &mut D) {
        if self.cursor == 0 {
            return;
        }
        device.write_vertex_buffer(self.vertex_buffer, bytemuck::cast_slice(self.vertices()));
    }

    /// Issue the indexed draw for the staged quads. An empty batch draws
    /// nothing.
    pub fn draw(&self, device: &mut D) {
        let count = self.draw_count();
        if count > 0 {
            device.draw_indexed(self.vertex_array, count, 0);
        }
    }

    /// Number of indices to submit.
    pub fn draw_count(&self) -> u32 {
        self.quad_count() * INDICES_PER_QUAD
    }

    /// Number of staged quads.
    #[expect(clippy::cast_possible_truncation)]
    pub fn quad_count(&self) -> u32 {
        // Bounded by capacity, which is a u32.
        (self.cursor / VERTICES_PER_QUAD as usize) as u32
    }

    /// Number of staged vertices.
    pub fn vertex_count(&self) -> usize {
        self.cursor
    }

    /// Maximum number of quads per submission.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether another [`push_quad`](Self::push_quad) would overflow.
    pub fn is_full(&self) -> bool {
        self.cursor == self.staging.len()
    }

    /// The staged vertices, in submission order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.staging[..self.cursor]
    }

    /// Release the GPU objects.
    pub fn destroy(self, device: &mut D) {
        device.delete_vertex_array(self.vertex_array);
        device.delete_buffer(self.vertex_buffer);
        device.delete_buffer(self.index_buffer);
    }
}
