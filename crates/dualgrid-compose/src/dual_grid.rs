use dualgrid_atlas::{MaterialRegistry, RegistryError, VariantSpec};
use dualgrid_grid::{Grid, GridError, TileType};
use image::RgbaImage;

use crate::batch::QuadBatch;
use crate::compositor::Compositor;
use crate::viewport::Viewport;

/// Grid, materials, and the last composited batches, with a dirty flag set by
/// every mutation. Recomposition happens only on request.
pub struct DualGrid {
    grid: Grid,
    registry: MaterialRegistry,
    compositor: Compositor,
    batches: Vec<QuadBatch>,
    last_viewport: Option<Viewport>,
    dirty: bool,
}

impl DualGrid {
    pub fn new(
        width: usize,
        height: usize,
        tile_size: u32,
        default_material: TileType,
    ) -> Result<Self, RegistryError> {
        let registry = MaterialRegistry::new(tile_size)?;
        Ok(Self {
            grid: Grid::new(width, height, default_material),
            compositor: Compositor::for_registry(&registry),
            registry,
            batches: Vec::new(),
            last_viewport: None,
            dirty: true,
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    #[inline]
    pub fn compositor(&self) -> Compositor {
        self.compositor
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.compositor.tile_size()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn register_from_atlas(
        &mut self,
        tilemap: &RgbaImage,
        variants: &VariantSpec,
    ) -> Result<TileType, RegistryError> {
        let id = self.registry.register_from_atlas(tilemap, variants)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn register_from_mask(
        &mut self,
        base: &RgbaImage,
        mask: &RgbaImage,
        variants: &VariantSpec,
    ) -> Result<TileType, RegistryError> {
        let id = self.registry.register_from_mask(base, mask, variants)?;
        self.dirty = true;
        Ok(id)
    }

    /// Writes a cell. `material` only has to be registered by the next
    /// composite.
    pub fn place(&mut self, x: i32, y: i32, material: TileType) -> Result<(), GridError> {
        self.grid.set(x, y, material)?;
        self.dirty = true;
        Ok(())
    }

    pub fn erase(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        self.grid.erase(x, y)?;
        self.dirty = true;
        Ok(())
    }

    pub fn reset(&mut self, material: TileType) {
        self.grid.reset(material);
        self.dirty = true;
    }

    /// Rebuilds the batches when the grid changed or the viewport moved.
    /// Returns true when a pass ran.
    pub fn composite_if_dirty(&mut self, viewport: Viewport) -> bool {
        if !self.dirty && self.last_viewport == Some(viewport) {
            return false;
        }
        self.compositor
            .recomposite(&self.grid, &self.registry, viewport, &mut self.batches);
        self.last_viewport = Some(viewport);
        self.dirty = false;
        true
    }

    /// Non-empty batches from the last pass, ascending by material id.
    pub fn batches(&self) -> impl Iterator<Item = (TileType, &QuadBatch)> {
        self.batches
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(|(i, b)| (i as TileType, b))
    }
}
