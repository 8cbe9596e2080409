//! Scene files: grid size, materials, and initial paint, loaded from TOML.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use dualgrid_atlas::config::{MaterialDef, MaterialSource};
use dualgrid_compose::{DualGrid, Viewport};
use dualgrid_grid::TileType;
use image::RgbaImage;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
    pub tile_size: u32,
    #[serde(default)]
    pub default_material: Option<MaterialRef>,
    pub grid: GridSize,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    #[serde(default)]
    pub paint: Vec<PaintOp>,
    #[serde(default)]
    pub viewport: Option<ViewportCfg>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

// Materials can be named ("grass") or given by registration index (1).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum MaterialRef {
    Id(u8),
    Name(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaintOp {
    pub material: MaterialRef,
    // x, y, w, h; clipped to the grid
    #[serde(default)]
    pub rect: Option<[i32; 4]>,
    #[serde(default)]
    pub cells: Vec<[i32; 2]>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ViewportCfg {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    EmptyGrid,
    UnknownMaterial(String),
    MaterialOutOfRange { id: u8, registered: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EmptyGrid => write!(f, "grid width and height must be non-zero"),
            SceneError::UnknownMaterial(name) => write!(f, "unknown material '{}'", name),
            SceneError::MaterialOutOfRange { id, registered } => write!(
                f,
                "material {} referenced but only {} registered",
                id, registered
            ),
        }
    }
}

impl Error for SceneError {}

impl SceneConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

/// A loaded scene: the dual grid plus the material names in id order.
pub struct Scene {
    pub dual: DualGrid,
    pub names: Vec<String>,
    pub viewport: Viewport,
}

fn resolve_ref(names: &[String], r: &MaterialRef) -> Result<TileType, SceneError> {
    match r {
        MaterialRef::Id(id) if (*id as usize) < names.len() => Ok(*id),
        MaterialRef::Id(id) => Err(SceneError::MaterialOutOfRange {
            id: *id,
            registered: names.len(),
        }),
        MaterialRef::Name(n) => names
            .iter()
            .position(|m| m == n)
            .map(|i| i as TileType)
            .ok_or_else(|| SceneError::UnknownMaterial(n.clone())),
    }
}

/// Reads a scene file and decodes its images relative to the file's directory.
pub fn load_scene(path: &Path) -> Result<Scene, Box<dyn Error>> {
    let cfg = SceneConfig::from_path(path)?;
    let base: PathBuf = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    build_scene(&cfg, |rel| {
        let full = base.join(rel);
        let img = image::open(&full).map_err(|e| format!("{}: {}", full.display(), e))?;
        Ok(img.into_rgba8())
    })
}

/// Registers materials in file order, applies paint ops, and picks the viewport.
pub fn build_scene(
    cfg: &SceneConfig,
    mut load: impl FnMut(&Path) -> Result<RgbaImage, Box<dyn Error>>,
) -> Result<Scene, Box<dyn Error>> {
    if cfg.grid.width == 0 || cfg.grid.height == 0 {
        return Err(Box::new(SceneError::EmptyGrid));
    }
    let names: Vec<String> = cfg.materials.iter().map(|m| m.name.clone()).collect();
    let default = match &cfg.default_material {
        Some(r) => resolve_ref(&names, r)?,
        None => 0,
    };
    if names.is_empty() {
        return Err(Box::new(SceneError::MaterialOutOfRange {
            id: default,
            registered: 0,
        }));
    }
    let mut dual = DualGrid::new(cfg.grid.width, cfg.grid.height, cfg.tile_size, default)?;

    for def in &cfg.materials {
        let spec = def.variant_spec()?;
        let id = match def.source()? {
            MaterialSource::Atlas(p) => dual.register_from_atlas(&load(p)?, &spec)?,
            MaterialSource::Mask { texture, mask } => {
                dual.register_from_mask(&load(texture)?, &load(mask)?, &spec)?
            }
        };
        log::info!(target: "scene", "material {} '{}'", id, def.name);
    }

    let (gw, gh) = (cfg.grid.width as i32, cfg.grid.height as i32);
    for op in &cfg.paint {
        let m = resolve_ref(&names, &op.material)?;
        if let Some([x, y, w, h]) = op.rect {
            for cy in y.max(0)..y.saturating_add(h).min(gh) {
                for cx in x.max(0)..x.saturating_add(w).min(gw) {
                    dual.place(cx, cy, m)?;
                }
            }
        }
        for &[cx, cy] in &op.cells {
            dual.place(cx, cy, m)?;
        }
    }

    let viewport = match cfg.viewport {
        Some(v) => Viewport::new(v.left, v.top, v.width, v.height),
        None => Viewport::whole_grid(cfg.grid.width, cfg.grid.height, cfg.tile_size),
    };
    log::info!(
        target: "scene",
        "scene grid={}x{} tile_size={} materials={} default={}",
        cfg.grid.width,
        cfg.grid.height,
        cfg.tile_size,
        names.len(),
        default
    );
    Ok(Scene {
        dual,
        names,
        viewport,
    })
}
