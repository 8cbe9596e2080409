use std::fmt;

use dualgrid_grid::TileType;
use image::RgbaImage;

use crate::atlas::{
    MAX_TILE_SIZE, SHEET_COLUMNS, TileAtlas, sheet_cell, sheet_cell_count, synthesize_sheet,
};
use crate::remap::{CANONICAL_TILES, TILE_REMAP};
use crate::variants::{VariantSpec, VariantTable};

/// Most materials a registry can hold; `TileType` is a `u8`.
pub const MAX_MATERIALS: usize = TileType::MAX as usize + 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    InvalidTileSize(u32),
    TilemapDimension {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    TextureDimension {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    MaskDimension {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    InvalidBitmask(u8),
    VariantIndexOutOfRange {
        bitmask: u8,
        index: usize,
        available: usize,
    },
    TooManyVariants(usize),
    TooManyMaterials,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidTileSize(ts) => {
                write!(f, "tile size {} is outside 1..={}", ts, MAX_TILE_SIZE)
            }
            RegistryError::TilemapDimension {
                width,
                height,
                tile_size,
            } => write!(
                f,
                "tilemap is {}x{}; expected width {} and a height of at least {} in multiples of {}",
                width,
                height,
                SHEET_COLUMNS.saturating_mul(*tile_size),
                SHEET_COLUMNS.saturating_mul(*tile_size),
                tile_size
            ),
            RegistryError::TextureDimension {
                width,
                height,
                tile_size,
            } => write!(
                f,
                "base texture is {}x{}; expected {}x{}",
                width, height, tile_size, tile_size
            ),
            RegistryError::MaskDimension {
                width,
                height,
                tile_size,
            } => write!(
                f,
                "mask is {}x{}; expected width {} and a height of at least {} in multiples of {}",
                width,
                height,
                SHEET_COLUMNS.saturating_mul(*tile_size),
                SHEET_COLUMNS.saturating_mul(*tile_size),
                tile_size
            ),
            RegistryError::InvalidBitmask(b) => {
                write!(f, "variant bitmask {} is outside 0..16", b)
            }
            RegistryError::VariantIndexOutOfRange {
                bitmask,
                index,
                available,
            } => write!(
                f,
                "variant for bitmask {} references cell {} but the tilemap has {} cells",
                bitmask, index, available
            ),
            RegistryError::TooManyVariants(n) => write!(f, "{} variant tiles do not fit an atlas", n),
            RegistryError::TooManyMaterials => {
                write!(f, "registry already holds {} materials", MAX_MATERIALS)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Accepts tile edges in `1..=MAX_TILE_SIZE`.
pub fn validate_tile_size(tile_size: u32) -> Result<u32, RegistryError> {
    if tile_size == 0 || tile_size > MAX_TILE_SIZE {
        return Err(RegistryError::InvalidTileSize(tile_size));
    }
    Ok(tile_size)
}

#[derive(Clone, Debug)]
pub struct Material {
    pub id: TileType,
    pub atlas: TileAtlas,
    pub variants: VariantTable,
}

/// Registered materials in registration order; a material's `TileType` is its
/// index here and never changes.
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    tile_size: u32,
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new(tile_size: u32) -> Result<Self, RegistryError> {
        validate_tile_size(tile_size)?;
        Ok(Self {
            tile_size,
            materials: Vec::new(),
        })
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Current material count; every grid value must be below it when compositing.
    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TileType) -> bool {
        (id as usize) < self.materials.len()
    }

    #[inline]
    pub fn get(&self, id: TileType) -> Option<&Material> {
        self.materials.get(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Registers a pre-authored tilemap: 4 tiles wide, at least 4 tall, with
    /// optional variant cells in extra rows.
    pub fn register_from_atlas(
        &mut self,
        tilemap: &RgbaImage,
        variants: &VariantSpec,
    ) -> Result<TileType, RegistryError> {
        let ts = self.tile_size;
        let (w, h) = tilemap.dimensions();
        let cells = sheet_cell_count(w, h, ts).ok_or(RegistryError::TilemapDimension {
            width: w,
            height: h,
            tile_size: ts,
        })?;
        self.register_sheet(tilemap, cells, variants)
    }

    /// Registers a material synthesized by stamping `mask` (tilemap layout)
    /// with a single `tile_size` square base texture.
    pub fn register_from_mask(
        &mut self,
        base: &RgbaImage,
        mask: &RgbaImage,
        variants: &VariantSpec,
    ) -> Result<TileType, RegistryError> {
        let ts = self.tile_size;
        let (bw, bh) = base.dimensions();
        if bw != ts || bh != ts {
            return Err(RegistryError::TextureDimension {
                width: bw,
                height: bh,
                tile_size: ts,
            });
        }
        let (mw, mh) = mask.dimensions();
        let cells = sheet_cell_count(mw, mh, ts).ok_or(RegistryError::MaskDimension {
            width: mw,
            height: mh,
            tile_size: ts,
        })?;
        let sheet = synthesize_sheet(base, mask, ts);
        self.register_sheet(&sheet, cells, variants)
    }

    fn register_sheet(
        &mut self,
        sheet: &RgbaImage,
        cells: usize,
        variants: &VariantSpec,
    ) -> Result<TileType, RegistryError> {
        if self.materials.len() >= MAX_MATERIALS {
            return Err(RegistryError::TooManyMaterials);
        }
        // Validate everything before touching the registry.
        let mut extra = 0usize;
        for (&bitmask, sources) in variants {
            if bitmask as usize >= CANONICAL_TILES {
                return Err(RegistryError::InvalidBitmask(bitmask));
            }
            if let Some(&index) = sources.iter().find(|&&i| i >= cells) {
                return Err(RegistryError::VariantIndexOutOfRange {
                    bitmask,
                    index,
                    available: cells,
                });
            }
            extra += sources.len();
        }
        let slots = CANONICAL_TILES + extra;
        let max_slots = (u32::MAX / self.tile_size) as usize;
        if slots > u16::MAX as usize || slots > max_slots {
            return Err(RegistryError::TooManyVariants(extra));
        }

        let ts = self.tile_size;
        let mut atlas = TileAtlas::with_slots(ts, slots as u32);
        for (natural, &slot) in TILE_REMAP.iter().enumerate() {
            atlas.put_tile(u16::from(slot), &sheet_cell(sheet, natural, ts));
        }
        let mut table = VariantTable::new();
        let mut next = CANONICAL_TILES as u16;
        for (&bitmask, sources) in variants {
            let start = next;
            for &src in sources {
                atlas.put_tile(next, &sheet_cell(sheet, src, ts));
                next += 1;
            }
            table.insert(bitmask, start..next);
        }

        let id = self.materials.len() as TileType;
        log::info!(
            target: "registry",
            "registered material id={} slots={} variant_entries={} variant_tiles={}",
            id,
            slots,
            table.entry_count(),
            extra
        );
        self.materials.push(Material {
            id,
            atlas,
            variants: table,
        });
        Ok(id)
    }
}
