//! Plain data types shared by the generator, the batch, and the device.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

/// Fill color used when the caller does not supply one.
pub const DEFAULT_QUAD_COLOR: [f32; 4] = [0.18, 0.6, 0.96, 1.0];

/// A single vertex of a batched quad, laid out exactly as the vertex shader
/// reads it.
///
/// | Slot | Attribute      | Components |
/// |------|----------------|------------|
/// | `0`  | `position`     | 3          |
/// | `1`  | `color`        | 4 (RGBA)   |
/// | `2`  | `tex_coord`    | 2 (UV)     |
/// | `3`  | `texture_slot` | 1          |
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// World-space position; `z` is always zero.
    pub position: [f32; 3],
    /// RGBA fill.
    pub color: [f32; 4],
    /// Corner UV in `0.0..=1.0`.
    pub tex_coord: [f32; 2],
    /// Integer texture unit id, float-encoded for the attribute pipeline.
    pub texture_slot: f32,
}

// Ten tightly packed floats; any padding would desynchronize the GL layout.
const _: () = assert!(size_of::<Vertex>() == 10 * size_of::<f32>());

/// One float attribute of [`Vertex`] as the GPU input layout declares it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location.
    pub location: u32,
    /// Number of `f32` components.
    pub components: i32,
    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

// Vertex is 40 bytes, so every offset fits an i32.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
impl Vertex {
    /// Distance in bytes between consecutive vertices.
    pub const STRIDE: i32 = size_of::<Vertex>() as i32;

    /// Attribute table in slot order.
    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            location: 0,
            components: 3,
            offset: offset_of!(Vertex, position) as i32,
        },
        VertexAttribute {
            location: 1,
            components: 4,
            offset: offset_of!(Vertex, color) as i32,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: offset_of!(Vertex, tex_coord) as i32,
        },
        VertexAttribute {
            location: 3,
            components: 1,
            offset: offset_of!(Vertex, texture_slot) as i32,
        },
    ];
}

/// A request to draw one axis-aligned square.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    /// Bottom-left corner.
    pub anchor: [f32; 2],
    /// Edge length.
    pub size: f32,
    /// Texture unit id written to every vertex.
    pub texture_slot: f32,
    /// Uniform RGBA fill, normalized to `0.0..=1.0`.
    pub color: [f32; 4],
}

impl Quad {
    /// A unit quad at `anchor` with the default fill color.
    pub fn unit(anchor: [f32; 2], texture_slot: f32) -> Self {
        Self {
            anchor,
            size: 1.0,
            texture_slot,
            color: DEFAULT_QUAD_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_tightly_packed() {
        let mut expected_offset = 0;
        for attr in Vertex::ATTRIBUTES {
            assert_eq!(attr.offset, expected_offset, "slot {}", attr.location);
            expected_offset += attr.components * 4;
        }
        assert_eq!(expected_offset, Vertex::STRIDE);
    }

    #[test]
    fn attribute_locations_follow_slot_order() {
        let locations: Vec<u32> = Vertex::ATTRIBUTES.iter().map(|a| a.location).collect();
        assert_eq!(locations, [0, 1, 2, 3]);
    }

    #[test]
    fn vertex_casts_to_forty_bytes() {
        let v = Vertex::zeroed();
        assert_eq!(bytemuck::bytes_of(&v).len(), 40);
    }
}
