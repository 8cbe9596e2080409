use dualgrid_grid::{Grid, TileType};

pub const BIT_TOP_LEFT: u8 = 1 << 3;
pub const BIT_TOP_RIGHT: u8 = 1 << 2;
pub const BIT_BOTTOM_LEFT: u8 = 1 << 1;
pub const BIT_BOTTOM_RIGHT: u8 = 1 << 0;

/// The four cells meeting at one grid corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corners {
    pub tl: TileType,
    pub tr: TileType,
    pub bl: TileType,
    pub br: TileType,
}

impl Corners {
    #[inline]
    pub fn as_array(&self) -> [TileType; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }

    /// Distinct materials present, ascending (bottom layer first).
    pub fn layers(&self) -> impl Iterator<Item = TileType> {
        let mut v = self.as_array();
        v.sort_unstable();
        let mut n = 0;
        for i in 0..4 {
            if i == 0 || v[i] != v[n - 1] {
                v[n] = v[i];
                n += 1;
            }
        }
        v.into_iter().take(n)
    }
}

/// Samples the corner at `(x, y)`. Corners run `0..=width` by `0..=height`;
/// anything past that yields `None`. Cells missing on the edge read as the
/// grid's default material.
pub fn sample_corners(grid: &Grid, x: i32, y: i32) -> Option<Corners> {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    if x < 0 || y < 0 || x > w || y > h {
        return None;
    }
    let def = grid.default_material();
    let pick = |inside: bool, cx: i32, cy: i32| if inside { grid.get(cx, cy) } else { def };
    Some(Corners {
        tl: pick(x >= 1 && y >= 1, x - 1, y - 1),
        tr: pick(x < w && y >= 1, x, y - 1),
        bl: pick(x >= 1 && y < h, x - 1, y),
        br: pick(x < w && y < h, x, y),
    })
}

/// Transition mask for drawing `material`: a corner counts when it holds
/// `material` or anything with a higher id.
#[inline]
pub fn bitmask_for(c: &Corners, material: TileType) -> u8 {
    let mut mask = 0u8;
    if c.tl >= material {
        mask |= BIT_TOP_LEFT;
    }
    if c.tr >= material {
        mask |= BIT_TOP_RIGHT;
    }
    if c.bl >= material {
        mask |= BIT_BOTTOM_LEFT;
    }
    if c.br >= material {
        mask |= BIT_BOTTOM_RIGHT;
    }
    mask
}
