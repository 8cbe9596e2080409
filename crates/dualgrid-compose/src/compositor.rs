use std::time::Instant;

use dualgrid_atlas::{MaterialRegistry, RegistryError, validate_tile_size};
use dualgrid_grid::{Grid, TileType};

use crate::batch::{BatchSink, MaterialBatch, QuadBatch};
use crate::corners::{bitmask_for, sample_corners};
use crate::viewport::Viewport;

/// Stateless dual-grid pass over a viewport. Each on-screen tile sits on one
/// grid corner and stacks up to four material layers, lowest id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compositor {
    tile_size: u32,
}

impl Compositor {
    /// Fails with `InvalidTileSize` for the sizes a registry would refuse.
    pub fn new(tile_size: u32) -> Result<Self, RegistryError> {
        Ok(Self {
            tile_size: validate_tile_size(tile_size)?,
        })
    }

    /// The registry already validated its tile size.
    pub fn for_registry(registry: &MaterialRegistry) -> Self {
        Self {
            tile_size: registry.tile_size(),
        }
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid cell whose four dual tiles meet at world pixel `(px, py)`.
    #[inline]
    pub fn cell_at_pixel(&self, px: i32, py: i32) -> (i32, i32) {
        let ts = self.tile_size as i32;
        let half = ts / 2;
        ((px - half).div_euclid(ts), (py - half).div_euclid(ts))
    }

    /// Composites `viewport` and returns one batch per material that emitted
    /// quads, ascending by material id.
    pub fn composite(
        &self,
        grid: &Grid,
        registry: &MaterialRegistry,
        viewport: Viewport,
    ) -> Vec<MaterialBatch> {
        let mut batches: Vec<QuadBatch> = Vec::new();
        self.composite_into(grid, registry, viewport, &mut batches);
        batches
            .into_iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(|(i, batch)| MaterialBatch {
                material: i as TileType,
                batch,
            })
            .collect()
    }

    /// Like `composite`, but rebuilds into caller-owned per-material buffers
    /// so their allocations survive between passes.
    pub fn recomposite(
        &self,
        grid: &Grid,
        registry: &MaterialRegistry,
        viewport: Viewport,
        batches: &mut Vec<QuadBatch>,
    ) -> usize {
        for b in batches.iter_mut() {
            b.clear_keep_capacity();
        }
        self.composite_into(grid, registry, viewport, batches)
    }

    /// Appends the viewport's quads to `sink` and returns how many were emitted.
    pub fn composite_into(
        &self,
        grid: &Grid,
        registry: &MaterialRegistry,
        viewport: Viewport,
        sink: &mut impl BatchSink,
    ) -> usize {
        let t0 = Instant::now();
        let ts = self.tile_size;
        let size = ts as f32;
        let (start_x, start_y) = viewport.tile_start(ts);
        let (cols, rows) = viewport.tile_span(ts);
        let (off_x, off_y) = viewport.sub_tile_offset(ts);
        let mut quads = 0usize;
        let mut unregistered = 0usize;
        debug_assert!(
            registry.contains(grid.max_value()),
            "grid holds material {} but only {} are registered",
            grid.max_value(),
            registry.len()
        );

        for j in 0..rows as i32 {
            let corner_y = start_y + j;
            let dst_y = (j * ts as i32 - off_y) as f32;
            for i in 0..cols as i32 {
                let corner_x = start_x + i;
                let Some(corners) = sample_corners(grid, corner_x, corner_y) else {
                    continue;
                };
                let dst_x = (i * ts as i32 - off_x) as f32;
                for material in corners.layers() {
                    let Some(mat) = registry.get(material) else {
                        unregistered += 1;
                        continue;
                    };
                    let bitmask = bitmask_for(&corners, material);
                    // Valid corners are never negative.
                    let slot = mat
                        .variants
                        .resolve(bitmask, corner_x as u32, corner_y as u32);
                    let (u, v) = mat.atlas.texel_origin(slot);
                    sink.get_batch_mut(material)
                        .add_quad(dst_x, dst_y, u as f32, v as f32, size);
                    quads += 1;
                }
            }
        }

        if unregistered > 0 {
            log::warn!(
                target: "compose",
                "skipped {} layers referencing unregistered materials (registered={})",
                unregistered,
                registry.len()
            );
        }
        log::debug!(
            target: "compose",
            "ms={} composite quads={} corners={}x{} start=({}, {}) offset=({}, {})",
            t0.elapsed().as_millis(),
            quads,
            cols,
            rows,
            start_x,
            start_y,
            off_x,
            off_y
        );
        quads
    }
}
