use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::remap::CANONICAL_TILES;
use crate::variants::VariantSpec;

// Either `atlas = "sheet.png"` or `texture = "base.png"` + `mask = "mask.png"`.
#[derive(Deserialize, Debug, Clone)]
pub struct MaterialDef {
    pub name: String,
    #[serde(default)]
    pub atlas: Option<PathBuf>,
    #[serde(default)]
    pub texture: Option<PathBuf>,
    #[serde(default)]
    pub mask: Option<PathBuf>,
    // TOML keys are strings: "15" = [16, 17]
    #[serde(default)]
    pub variants: BTreeMap<String, Vec<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialSource<'a> {
    Atlas(&'a Path),
    Mask { texture: &'a Path, mask: &'a Path },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaterialConfigError {
    AmbiguousSource(String),
    MissingSource(String),
    BadBitmaskKey { material: String, key: String },
}

impl fmt::Display for MaterialConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialConfigError::AmbiguousSource(name) => write!(
                f,
                "material '{}' sets both `atlas` and `texture`/`mask`",
                name
            ),
            MaterialConfigError::MissingSource(name) => write!(
                f,
                "material '{}' needs `atlas` or both `texture` and `mask`",
                name
            ),
            MaterialConfigError::BadBitmaskKey { material, key } => write!(
                f,
                "material '{}' has variant key '{}'; expected a bitmask 0-15",
                material, key
            ),
        }
    }
}

impl std::error::Error for MaterialConfigError {}

impl MaterialDef {
    pub fn source(&self) -> Result<MaterialSource<'_>, MaterialConfigError> {
        match (&self.atlas, &self.texture, &self.mask) {
            (Some(a), None, None) => Ok(MaterialSource::Atlas(a)),
            (None, Some(texture), Some(mask)) => Ok(MaterialSource::Mask { texture, mask }),
            (Some(_), _, _) => Err(MaterialConfigError::AmbiguousSource(self.name.clone())),
            _ => Err(MaterialConfigError::MissingSource(self.name.clone())),
        }
    }

    pub fn variant_spec(&self) -> Result<VariantSpec, MaterialConfigError> {
        let mut spec = VariantSpec::new();
        for (key, sources) in &self.variants {
            let bitmask = key
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|b| (*b as usize) < CANONICAL_TILES)
                .ok_or_else(|| MaterialConfigError::BadBitmaskKey {
                    material: self.name.clone(),
                    key: key.clone(),
                })?;
            spec.entry(bitmask).or_default().extend(sources.iter().copied());
        }
        Ok(spec)
    }
}
