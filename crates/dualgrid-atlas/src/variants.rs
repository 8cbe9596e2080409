use std::collections::BTreeMap;

use crate::remap::CANONICAL_TILES;

/// Registration input: canonical bitmask -> natural-order source cell indices
/// holding alternate art for that shape. Iterated in ascending bitmask order.
pub type VariantSpec = BTreeMap<u8, Vec<usize>>;

const HASH_X: u64 = 7919;
const HASH_Y: u64 = 6151;

/// Picks an index in `0..len` from absolute corner coordinates only.
#[inline]
pub fn variant_hash(corner_x: u32, corner_y: u32, len: usize) -> usize {
    debug_assert!(len > 0);
    let h = u64::from(corner_x) * HASH_X + u64::from(corner_y) * HASH_Y;
    (h % len as u64) as usize
}

/// Per-material alternates: bitmask -> atlas slots, canonical slot first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariantTable {
    choices: [Vec<u16>; CANONICAL_TILES],
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, bitmask: u8, appended: impl IntoIterator<Item = u16>) {
        let entry = &mut self.choices[bitmask as usize];
        entry.clear();
        entry.push(u16::from(bitmask));
        entry.extend(appended);
    }

    /// Slots usable for `bitmask`, or `None` when it has no entry.
    #[inline]
    pub fn choices(&self, bitmask: u8) -> Option<&[u16]> {
        let c = &self.choices[(bitmask & 0x0F) as usize];
        if c.is_empty() { None } else { Some(c) }
    }

    /// Atlas slot to draw for `bitmask` at the given grid corner.
    #[inline]
    pub fn resolve(&self, bitmask: u8, corner_x: u32, corner_y: u32) -> u16 {
        match self.choices(bitmask) {
            Some(c) => c[variant_hash(corner_x, corner_y, c.len())],
            None => u16::from(bitmask),
        }
    }

    /// Number of bitmasks with an entry.
    pub fn entry_count(&self) -> usize {
        self.choices.iter().filter(|c| !c.is_empty()).count()
    }

    /// Number of non-canonical slots referenced by the table.
    pub fn variant_count(&self) -> usize {
        self.choices
            .iter()
            .map(|c| c.len().saturating_sub(1))
            .sum()
    }
}
