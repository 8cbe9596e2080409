//! Seams to the host renderer: texture upload and one batched draw per material.

use dualgrid_atlas::{MaterialRegistry, TileAtlas};
use dualgrid_grid::TileType;

use crate::batch::QuadBatch;

/// Turns a material atlas into a backend texture handle.
pub trait AtlasUploader {
    type Texture;
    type Error;

    fn upload(&mut self, material: TileType, atlas: &TileAtlas) -> Result<Self::Texture, Self::Error>;
}

/// Draws every quad of `batch` with `texture` bound, as one call.
pub trait BatchRenderer {
    type Texture;

    fn draw_batch(&mut self, texture: &Self::Texture, batch: &QuadBatch);
}

/// Uploads every registered atlas; the result is indexed by material id.
pub fn upload_all<U: AtlasUploader>(
    uploader: &mut U,
    registry: &MaterialRegistry,
) -> Result<Vec<U::Texture>, U::Error> {
    registry
        .iter()
        .map(|m| uploader.upload(m.id, &m.atlas))
        .collect()
}

/// Issues one draw per non-empty batch in the order given and returns the
/// number of draws. Batches whose material has no texture are skipped.
pub fn submit<'a, R: BatchRenderer>(
    renderer: &mut R,
    textures: &[R::Texture],
    batches: impl IntoIterator<Item = (TileType, &'a QuadBatch)>,
) -> usize {
    let mut draws = 0;
    for (material, batch) in batches {
        if batch.is_empty() {
            continue;
        }
        let Some(tex) = textures.get(material as usize) else {
            log::warn!(target: "compose", "no texture uploaded for material {}", material);
            continue;
        };
        renderer.draw_batch(tex, batch);
        draws += 1;
    }
    draws
}
