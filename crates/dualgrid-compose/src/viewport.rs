/// Pixel rectangle of the world to composite. `left`/`top` are absolute world
/// pixels and may be negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Viewport covering every corner of a `grid_w x grid_h` grid from the origin.
    pub const fn whole_grid(grid_w: usize, grid_h: usize, tile_size: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width: (grid_w as u32).saturating_add(1).saturating_mul(tile_size),
            height: (grid_h as u32).saturating_add(1).saturating_mul(tile_size),
        }
    }

    /// First corner column/row sampled.
    #[inline]
    pub fn tile_start(&self, tile_size: u32) -> (i32, i32) {
        let ts = tile_size as i32;
        (self.left.div_euclid(ts), self.top.div_euclid(ts))
    }

    /// Number of corner columns/rows sampled; a partial trailing tile is dropped.
    #[inline]
    pub fn tile_span(&self, tile_size: u32) -> (u32, u32) {
        (self.width / tile_size, self.height / tile_size)
    }

    /// Sub-tile pixel offset subtracted from every destination position.
    #[inline]
    pub fn sub_tile_offset(&self, tile_size: u32) -> (i32, i32) {
        let ts = tile_size as i32;
        (self.left.rem_euclid(ts), self.top.rem_euclid(ts))
    }

    /// Same size, origin moved by `(dx, dy)` pixels.
    #[inline]
    pub fn panned(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}
