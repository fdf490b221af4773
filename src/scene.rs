//! Per-frame scene input.

/// One quad the caller wants drawn this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadDesc {
    /// Bottom-left corner in world units.
    pub anchor: [f32; 2],
    /// Texture unit the quad samples from.
    pub texture_slot: u32,
}

/// Ordered quads for one frame.
///
/// The renderer only reads this; callers rebuild or mutate it between frames
/// (e.g. from UI input) and pass it to
/// [`BatchRenderer::render_frame`](crate::BatchRenderer::render_frame).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneState {
    quads: Vec<QuadDesc>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `cols` x `rows` checkerboard of unit quads anchored at integer
    /// coordinates, alternating texture slots 0 and 1.
    pub fn grid(cols: u16, rows: u16) -> Self {
        let mut scene = Self::new();
        for y in 0..rows {
            for x in 0..cols {
                let slot = (u32::from(x) + u32::from(y)) % 2;
                scene.push([f32::from(x), f32::from(y)], slot);
            }
        }
        scene
    }

    /// Append a quad; it is drawn after every quad already present.
    pub fn push(&mut self, anchor: [f32; 2], texture_slot: u32) -> &mut Self {
        self.quads.push(QuadDesc {
            anchor,
            texture_slot,
        });
        self
    }

    pub fn quads(&self) -> &[QuadDesc] {
        &self.quads
    }

    /// Mutable access to a previously pushed quad.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut QuadDesc> {
        self.quads.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
    }
}

impl FromIterator<QuadDesc> for SceneState {
    fn from_iter<I: IntoIterator<Item = QuadDesc>>(iter: I) -> Self {
        Self {
            quads: iter.into_iter().collect(),
        }
    }
}
