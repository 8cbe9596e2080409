use dualgrid_grid::TileType;
use hashbrown::HashMap;

/// Screen-space textured quads for one material, ready for a single draw call.
/// Vertices go top-left, top-right, bottom-right, bottom-left; each quad is two
/// clockwise triangles (y down).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct QuadBatch {
    /// Destination positions in pixels, x,y per vertex.
    pub pos: Vec<f32>,
    /// Source texel coordinates in the material atlas, u,v per vertex.
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

/// One quad read back out of a batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub dst_x: f32,
    pub dst_y: f32,
    pub src_x: f32,
    pub src_y: f32,
    pub width: f32,
    pub height: f32,
}

impl QuadBatch {
    /// Clears all arrays but retains capacity for reuse across passes.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.uv.clear();
        self.idx.clear();
    }

    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 2);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.pos.len() / 8
    }

    /// Appends an axis-aligned `size x size` quad at `(x, y)` sampling the
    /// atlas region starting at texel `(u, v)`.
    pub fn add_quad(&mut self, x: f32, y: f32, u: f32, v: f32, size: f32) {
        let base = (self.pos.len() / 2) as u32;
        self.pos
            .extend_from_slice(&[x, y, x + size, y, x + size, y + size, x, y + size]);
        self.uv
            .extend_from_slice(&[u, v, u + size, v, u + size, v + size, u, v + size]);
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn quad(&self, i: usize) -> Quad {
        let p = &self.pos[i * 8..i * 8 + 8];
        let t = &self.uv[i * 8..i * 8 + 8];
        Quad {
            dst_x: p[0],
            dst_y: p[1],
            src_x: t[0],
            src_y: t[1],
            width: p[4] - p[0],
            height: p[5] - p[1],
        }
    }

    pub fn quads(&self) -> impl Iterator<Item = Quad> + '_ {
        (0..self.quad_count()).map(move |i| self.quad(i))
    }
}

/// A non-empty batch tagged with the material whose atlas it samples.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialBatch {
    pub material: TileType,
    pub batch: QuadBatch,
}

// Lets a pass write into either dense per-material buffers or a sparse map.
pub trait BatchSink {
    fn get_batch_mut(&mut self, material: TileType) -> &mut QuadBatch;
}

impl BatchSink for HashMap<TileType, QuadBatch> {
    #[inline]
    fn get_batch_mut(&mut self, material: TileType) -> &mut QuadBatch {
        self.entry(material).or_default()
    }
}

impl BatchSink for Vec<QuadBatch> {
    #[inline]
    fn get_batch_mut(&mut self, material: TileType) -> &mut QuadBatch {
        let ix = material as usize;
        if ix >= self.len() {
            self.resize_with(ix + 1, QuadBatch::default);
        }
        let qb = &mut self[ix];
        if qb.pos.capacity() == 0 {
            // Small first reserve when a material shows up in a pass
            const INITIAL_QUAD_CAP: usize = 64;
            qb.reserve_quads(INITIAL_QUAD_CAP);
        }
        qb
    }
}
