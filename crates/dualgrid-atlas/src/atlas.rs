use image::{RgbaImage, imageops};

/// Source sheets are four tiles wide.
pub const SHEET_COLUMNS: u32 = 4;
/// Source sheets carry at least the 4x4 canonical block.
pub const SHEET_MIN_ROWS: u32 = 4;
/// Largest accepted tile edge. Keeps sheet and atlas widths and signed pixel
/// math in range.
pub const MAX_TILE_SIZE: u32 = 1 << 16;

/// A material's tiles laid out left to right in one row, `tile_size` square each.
/// Slots `0..16` hold the canonical shapes; variant art follows from slot 16.
#[derive(Clone, Debug, PartialEq)]
pub struct TileAtlas {
    tile_size: u32,
    image: RgbaImage,
}

impl TileAtlas {
    pub(crate) fn with_slots(tile_size: u32, slots: u32) -> Self {
        Self {
            tile_size,
            image: RgbaImage::new(tile_size * slots, tile_size),
        }
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn slot_count(&self) -> u32 {
        self.image.width() / self.tile_size
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Texel-space top-left corner of a slot.
    #[inline]
    pub fn texel_origin(&self, slot: u16) -> (u32, u32) {
        (u32::from(slot) * self.tile_size, 0)
    }

    /// Copies one slot out as its own image.
    pub fn tile(&self, slot: u16) -> RgbaImage {
        let (x, y) = self.texel_origin(slot);
        imageops::crop_imm(&self.image, x, y, self.tile_size, self.tile_size).to_image()
    }

    pub(crate) fn put_tile(&mut self, slot: u16, src: &RgbaImage) {
        let (x, y) = self.texel_origin(slot);
        imageops::replace(&mut self.image, src, i64::from(x), i64::from(y));
    }
}

/// Returns the number of cells in a source sheet, or `None` when the sheet is
/// not 4 tiles wide, at least 4 tiles tall, and a whole number of tiles tall.
pub fn sheet_cell_count(width: u32, height: u32, tile_size: u32) -> Option<usize> {
    if tile_size == 0 || height % tile_size != 0 {
        return None;
    }
    let want_w = SHEET_COLUMNS.checked_mul(tile_size)?;
    let min_h = SHEET_MIN_ROWS.checked_mul(tile_size)?;
    if width != want_w || height < min_h {
        return None;
    }
    Some((SHEET_COLUMNS * (height / tile_size)) as usize)
}

/// Copy of the natural-order (row-major) cell `index` of a source sheet.
pub fn sheet_cell(sheet: &RgbaImage, index: usize, tile_size: u32) -> RgbaImage {
    let col = index as u32 % SHEET_COLUMNS;
    let row = index as u32 / SHEET_COLUMNS;
    imageops::crop_imm(sheet, col * tile_size, row * tile_size, tile_size, tile_size).to_image()
}

/// Multiplies `dst` by `mask` in place: colour channels are modulated by the
/// mask colour and alpha by the mask alpha. An opaque white mask texel keeps the
/// destination, a transparent one clears it.
pub fn stamp_multiply(dst: &mut RgbaImage, mask: &RgbaImage) {
    debug_assert_eq!(dst.dimensions(), mask.dimensions());
    for (d, m) in dst.pixels_mut().zip(mask.pixels()) {
        for c in 0..4 {
            d.0[c] = mul_u8(d.0[c], m.0[c]);
        }
    }
}

#[inline]
fn mul_u8(a: u8, b: u8) -> u8 {
    // Rounded a*b/255.
    let p = u32::from(a) * u32::from(b) + 128;
    ((p + (p >> 8)) >> 8) as u8
}

/// Tiles `base` once per mask cell over a canvas the size of `mask`, then
/// stamps the mask on top. The result is a source sheet in the same layout as
/// the mask.
pub fn synthesize_sheet(base: &RgbaImage, mask: &RgbaImage, tile_size: u32) -> RgbaImage {
    let (w, h) = mask.dimensions();
    let mut canvas = RgbaImage::new(w, h);
    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            imageops::replace(&mut canvas, base, i64::from(x), i64::from(y));
            x += tile_size;
        }
        y += tile_size;
    }
    stamp_multiply(&mut canvas, mask);
    canvas
}
