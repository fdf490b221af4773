//! Static triangle-list topology shared by every batch.

use crate::types::Vertex;

/// Indices emitted per quad (two triangles).
pub const INDICES_PER_QUAD: u32 = 6;

/// Vertices emitted per quad.
pub const VERTICES_PER_QUAD: u32 = 4;

/// Largest batch capacity whose vertex buffer size still fits the signed
/// byte size GL accepts.
///
/// A quad's vertices take more bytes than its indices, so index counts and
/// index buffer sizes stay within `i32` below this limit too.
pub const MAX_QUAD_LIMIT: u32 =
    i32::MAX.unsigned_abs() / (VERTICES_PER_QUAD * Vertex::STRIDE.unsigned_abs());

/// Build the index pattern for `max_quads` quads.
///
/// Quad `i` contributes `4i, 4i+1, 4i+2, 4i+2, 4i+3, 4i`: two triangles
/// sharing the diagonal from its first to its third vertex. The result
/// depends only on `max_quads`.
///
/// # Panics
///
/// Panics if `max_quads` exceeds [`MAX_QUAD_LIMIT`].
pub fn build_indices(max_quads: u32) -> Vec<u32> {
    assert!(
        max_quads <= MAX_QUAD_LIMIT,
        "batch capacity {max_quads} exceeds {MAX_QUAD_LIMIT}"
    );

    let mut indices = Vec::with_capacity((max_quads * INDICES_PER_QUAD) as usize);
    for quad in 0..max_quads {
        let base = quad * VERTICES_PER_QUAD;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_per_quad() {
        let indices = build_indices(1000);
        assert_eq!(indices.len(), 6000);
        for (i, chunk) in indices.chunks_exact(6).enumerate() {
            let b = u32::try_from(i).unwrap() * 4;
            assert_eq!(chunk, [b, b + 1, b + 2, b + 2, b + 3, b]);
        }
    }

    #[test]
    fn first_two_quads() {
        assert_eq!(build_indices(2), [0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn zero_capacity_is_empty() {
        assert!(build_indices(0).is_empty());
    }

    #[test]
    fn smaller_pattern_is_prefix_of_larger() {
        let small = build_indices(25);
        let large = build_indices(100);
        assert_eq!(small[..], large[..small.len()]);
    }

    #[test]
    fn limit_keeps_every_gl_size_in_i32() {
        let quads = u64::from(MAX_QUAD_LIMIT);
        let vertex_bytes = quads * u64::from(VERTICES_PER_QUAD) * 40;
        assert!(i32::try_from(vertex_bytes).is_ok());
        assert!(i32::try_from(vertex_bytes + 4 * 40).is_err());
        assert!(i32::try_from(quads * u64::from(INDICES_PER_QUAD) * 4).is_ok());
    }

    #[test]
    fn highest_index_is_last_vertex() {
        let indices = build_indices(10);
        assert_eq!(indices.iter().max(), Some(&39));
    }
}
