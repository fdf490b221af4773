//! Lowering of a [`Quad`] into its four vertices.
//!
//! Corners are emitted counter-clockwise starting at the anchor:
//! bottom-left, bottom-right, top-right, top-left. The index pattern in
//! [`crate::index`] relies on this order, so positions and UVs must always be
//! permuted together.

use bytemuck::Zeroable;

use crate::types::{Quad, Vertex};

/// Unit offsets of each corner, shared by position and UV.
const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Write the four vertices of `quad` into `dst`.
pub fn write_quad(dst: &mut [Vertex; 4], quad: &Quad) {
    let [x, y] = quad.anchor;
    for (vertex, [cx, cy]) in dst.iter_mut().zip(CORNERS) {
        *vertex = Vertex {
            position: [x + cx * quad.size, y + cy * quad.size, 0.0],
            color: quad.color,
            tex_coord: [cx, cy],
            texture_slot: quad.texture_slot,
        };
    }
}

/// Generate the four vertices of `quad` by value.
pub fn generate(quad: &Quad) -> [Vertex; 4] {
    let mut out = [Vertex::zeroed(); 4];
    write_quad(&mut out, quad);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_quad_at_two_three() {
        let vertices = generate(&Quad::unit([2.0, 3.0], 0.0));

        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            [[2.0, 3.0, 0.0], [3.0, 3.0, 0.0], [3.0, 4.0, 0.0], [2.0, 4.0, 0.0]]
        );

        let uvs: Vec<[f32; 2]> = vertices.iter().map(|v| v.tex_coord).collect();
        assert_eq!(uvs, [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn color_and_slot_are_uniform() {
        let quad = Quad {
            anchor: [-1.5, 0.25],
            size: 2.0,
            texture_slot: 3.0,
            color: [1.0, 0.5, 0.25, 0.75],
        };
        for v in generate(&quad) {
            assert_eq!(v.color, quad.color);
            assert!((v.texture_slot - 3.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn size_scales_from_anchor() {
        let quad = Quad {
            size: 2.5,
            ..Quad::unit([1.0, -1.0], 0.0)
        };
        let [bl, br, tr, tl] = generate(&quad);
        assert_eq!(bl.position, [1.0, -1.0, 0.0]);
        assert_eq!(br.position, [3.5, -1.0, 0.0]);
        assert_eq!(tr.position, [3.5, 1.5, 0.0]);
        assert_eq!(tl.position, [1.0, 1.5, 0.0]);
    }

    #[test]
    fn write_quad_overwrites_destination() {
        let mut dst = generate(&Quad::unit([9.0, 9.0], 7.0));
        write_quad(&mut dst, &Quad::unit([0.0, 0.0], 1.0));
        assert_eq!(dst[0].position, [0.0, 0.0, 0.0]);
        assert!(dst.iter().all(|v| (v.texture_slot - 1.0).abs() < f32::EPSILON));
    }
}
