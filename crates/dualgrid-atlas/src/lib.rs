//! Material atlases, variant tables, and the material registry.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod registry;
pub mod remap;
pub mod variants;

pub use atlas::{MAX_TILE_SIZE, TileAtlas};
pub use registry::{Material, MaterialRegistry, RegistryError, validate_tile_size};
pub use remap::{CANONICAL_TILES, TILE_REMAP, TILE_REMAP_INVERSE};
pub use variants::{VariantSpec, VariantTable};
