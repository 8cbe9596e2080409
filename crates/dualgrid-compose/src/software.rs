//! CPU backend: atlases stay as images and batches are blitted onto a canvas.

use std::convert::Infallible;

use dualgrid_atlas::TileAtlas;
use dualgrid_grid::TileType;
use image::{Rgba, RgbaImage};

use crate::backend::{AtlasUploader, BatchRenderer};
use crate::batch::QuadBatch;

pub struct SoftwareRenderer {
    canvas: RgbaImage,
    draw_calls: usize,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            draw_calls: 0,
        }
    }

    #[inline]
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Draw calls issued so far.
    #[inline]
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }
}

impl AtlasUploader for SoftwareRenderer {
    type Texture = RgbaImage;
    type Error = Infallible;

    fn upload(&mut self, _material: TileType, atlas: &TileAtlas) -> Result<RgbaImage, Infallible> {
        Ok(atlas.image().clone())
    }
}

impl BatchRenderer for SoftwareRenderer {
    type Texture = RgbaImage;

    fn draw_batch(&mut self, texture: &RgbaImage, batch: &QuadBatch) {
        let (cw, ch) = (self.canvas.width() as i64, self.canvas.height() as i64);
        let (tw, th) = (texture.width() as i64, texture.height() as i64);
        for q in batch.quads() {
            let (dx, dy) = (q.dst_x as i64, q.dst_y as i64);
            let (sx, sy) = (q.src_x as i64, q.src_y as i64);
            for oy in 0..q.height as i64 {
                let (ty, py) = (sy + oy, dy + oy);
                if py < 0 || py >= ch || ty < 0 || ty >= th {
                    continue;
                }
                for ox in 0..q.width as i64 {
                    let (tx, px) = (sx + ox, dx + ox);
                    if px < 0 || px >= cw || tx < 0 || tx >= tw {
                        continue;
                    }
                    let src = *texture.get_pixel(tx as u32, ty as u32);
                    let dst = self.canvas.get_pixel_mut(px as u32, py as u32);
                    *dst = blend_over(*dst, src);
                }
            }
        }
        self.draw_calls += 1;
    }
}

/// Straight-alpha source-over.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src.0[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst.0[3]);
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv; // scaled by 255
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = u32::from(src.0[c]) * sa * 255;
        let d = u32::from(dst.0[c]) * da * inv;
        out[c] = ((s + d + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}
