#![allow(dead_code)]

use std::collections::BTreeMap;

use dualgrid_atlas::{MaterialRegistry, VariantSpec};
use dualgrid_compose::{MaterialBatch, Viewport};
use dualgrid_grid::TileType;
use image::{Rgba, RgbaImage};

pub const TS: u32 = 4;

pub fn sheet(rows: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(4 * TS, rows * TS, color)
}

/// Registry with `n` single-colour materials and no variants.
pub fn plain_registry(n: usize) -> MaterialRegistry {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    for i in 0..n {
        let c = Rgba([(i * 40) as u8, 100, 200, 255]);
        reg.register_from_atlas(&sheet(4, c), &VariantSpec::new())
            .unwrap();
    }
    reg
}

/// Grid corner -> layers drawn there as (material, atlas slot), bottom first.
pub fn layers_by_corner(
    batches: &[MaterialBatch],
    viewport: Viewport,
) -> BTreeMap<(i32, i32), Vec<(TileType, u16)>> {
    let (sx, sy) = viewport.tile_start(TS);
    let (ox, oy) = viewport.sub_tile_offset(TS);
    let ts = TS as i32;
    let mut out: BTreeMap<(i32, i32), Vec<(TileType, u16)>> = BTreeMap::new();
    for mb in batches {
        for q in mb.batch.quads() {
            assert_eq!(q.width, TS as f32);
            assert_eq!(q.height, TS as f32);
            assert_eq!(q.src_y, 0.0);
            let cx = sx + (q.dst_x as i32 + ox) / ts;
            let cy = sy + (q.dst_y as i32 + oy) / ts;
            let slot = (q.src_x as u32 / TS) as u16;
            out.entry((cx, cy)).or_default().push((mb.material, slot));
        }
    }
    out
}
