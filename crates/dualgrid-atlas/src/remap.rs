/// Number of canonical transition shapes (one per 4-bit corner mask).
pub const CANONICAL_TILES: usize = 16;

/// Natural 4x4 raster position -> canonical bitmask slot.
/// Authoring convention for source sheets; not derived from the bit layout.
pub const TILE_REMAP: [u8; CANONICAL_TILES] = [2, 5, 11, 3, 9, 7, 15, 14, 4, 12, 13, 10, 0, 1, 6, 8];

/// Canonical bitmask slot -> natural 4x4 raster position.
pub const TILE_REMAP_INVERSE: [u8; CANONICAL_TILES] = invert(TILE_REMAP);

const fn invert(table: [u8; CANONICAL_TILES]) -> [u8; CANONICAL_TILES] {
    let mut out = [0u8; CANONICAL_TILES];
    let mut i = 0;
    while i < CANONICAL_TILES {
        out[table[i] as usize] = i as u8;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_table_is_pinned() {
        assert_eq!(
            TILE_REMAP,
            [2, 5, 11, 3, 9, 7, 15, 14, 4, 12, 13, 10, 0, 1, 6, 8]
        );
    }

    #[test]
    fn inverse_matches_table() {
        assert_eq!(
            TILE_REMAP_INVERSE,
            [12, 13, 0, 3, 8, 1, 14, 5, 15, 4, 11, 2, 9, 10, 7, 6]
        );
        for (natural, &slot) in TILE_REMAP.iter().enumerate() {
            assert_eq!(TILE_REMAP_INVERSE[slot as usize] as usize, natural);
        }
    }

    #[test]
    fn remap_is_a_permutation() {
        let mut seen = [false; CANONICAL_TILES];
        for &slot in &TILE_REMAP {
            assert!(!seen[slot as usize]);
            seen[slot as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
