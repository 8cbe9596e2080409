use dualgrid_atlas::{
    MAX_TILE_SIZE, MaterialRegistry, RegistryError, TILE_REMAP, TILE_REMAP_INVERSE, VariantSpec,
};
use image::{Rgba, RgbaImage};

const TS: u32 = 4;

fn cell_color(index: usize) -> Rgba<u8> {
    Rgba([(index * 9) as u8, 255 - index as u8, 40, 255])
}

// A tilemap whose natural-order cells are each filled with a distinct colour.
fn tagged_sheet(rows: u32) -> RgbaImage {
    let mut img = RgbaImage::new(4 * TS, rows * TS);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let index = ((y / TS) * 4 + x / TS) as usize;
        *px = cell_color(index);
    }
    img
}

fn solid(color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(TS, TS, color)
}

#[test]
fn canonical_slots_follow_remap_table() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let id = reg
        .register_from_atlas(&tagged_sheet(4), &VariantSpec::new())
        .unwrap();
    assert_eq!(id, 0);
    let mat = reg.get(id).unwrap();
    assert_eq!(mat.atlas.slot_count(), 16);
    for b in 0..16u16 {
        let natural = TILE_REMAP_INVERSE[b as usize] as usize;
        assert_eq!(mat.atlas.tile(b), solid(cell_color(natural)), "bitmask {}", b);
    }
    for (natural, &slot) in TILE_REMAP.iter().enumerate() {
        assert_eq!(mat.atlas.tile(u16::from(slot)), solid(cell_color(natural)));
    }
}

#[test]
fn empty_variant_spec_has_no_entries() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let id = reg
        .register_from_atlas(&tagged_sheet(5), &VariantSpec::new())
        .unwrap();
    let mat = reg.get(id).unwrap();
    assert_eq!(mat.atlas.slot_count(), 16);
    for b in 0..16u8 {
        assert_eq!(mat.variants.choices(b), None);
        assert_eq!(mat.variants.resolve(b, 3, 11), u16::from(b));
    }
}

#[test]
fn variants_are_appended_in_bitmask_then_list_order() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let mut spec = VariantSpec::new();
    spec.insert(15, vec![16, 17]);
    spec.insert(3, vec![19]);
    let id = reg.register_from_atlas(&tagged_sheet(5), &spec).unwrap();
    let mat = reg.get(id).unwrap();
    assert_eq!(mat.atlas.slot_count(), 19);
    // Bitmask 3 sorts first, so its cell lands on slot 16.
    assert_eq!(mat.variants.choices(3), Some(&[3u16, 16][..]));
    assert_eq!(mat.variants.choices(15), Some(&[15u16, 17, 18][..]));
    assert_eq!(mat.atlas.tile(16), solid(cell_color(19)));
    assert_eq!(mat.atlas.tile(17), solid(cell_color(16)));
    assert_eq!(mat.atlas.tile(18), solid(cell_color(17)));
    assert_eq!(mat.variants.variant_count(), 3);
}

#[test]
fn ids_follow_registration_order() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    for want in 0..3u8 {
        let id = reg
            .register_from_atlas(&tagged_sheet(4), &VariantSpec::new())
            .unwrap();
        assert_eq!(id, want);
    }
    assert_eq!(reg.len(), 3);
    assert!(reg.contains(2));
    assert!(!reg.contains(3));
    assert_eq!(reg.iter().map(|m| m.id).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn bad_tilemap_dimensions_add_nothing() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    for (w, h) in [(3 * TS, 4 * TS), (4 * TS, 3 * TS), (4 * TS, 4 * TS + 1), (5 * TS, 4 * TS)] {
        let err = reg
            .register_from_atlas(&RgbaImage::new(w, h), &VariantSpec::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::TilemapDimension { .. }), "{}x{}", w, h);
    }
    assert!(reg.is_empty());
}

#[test]
fn bad_variant_specs_add_nothing() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let mut spec = VariantSpec::new();
    spec.insert(16, vec![0]);
    assert_eq!(
        reg.register_from_atlas(&tagged_sheet(4), &spec),
        Err(RegistryError::InvalidBitmask(16))
    );
    let mut spec = VariantSpec::new();
    spec.insert(15, vec![16]);
    assert_eq!(
        reg.register_from_atlas(&tagged_sheet(4), &spec),
        Err(RegistryError::VariantIndexOutOfRange {
            bitmask: 15,
            index: 16,
            available: 16
        })
    );
    assert!(reg.is_empty());
}

#[test]
fn variant_slots_past_u16_are_rejected() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let mut spec = VariantSpec::new();
    spec.insert(15, vec![0; u16::MAX as usize - 15]);
    assert_eq!(
        reg.register_from_atlas(&tagged_sheet(4), &spec),
        Err(RegistryError::TooManyVariants(u16::MAX as usize - 15))
    );
    assert!(reg.is_empty());
}

#[test]
fn registry_holds_at_most_256_materials() {
    let mut reg = MaterialRegistry::new(1).unwrap();
    let sheet = RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255]));
    for i in 0..256usize {
        assert_eq!(
            reg.register_from_atlas(&sheet, &VariantSpec::new()),
            Ok(i as u8)
        );
    }
    assert_eq!(
        reg.register_from_atlas(&sheet, &VariantSpec::new()),
        Err(RegistryError::TooManyMaterials)
    );
    assert_eq!(reg.len(), 256);
}

#[test]
fn tile_size_outside_range_is_rejected() {
    for ts in [0, MAX_TILE_SIZE + 1, 1 << 30, u32::MAX] {
        assert!(matches!(
            MaterialRegistry::new(ts),
            Err(RegistryError::InvalidTileSize(t)) if t == ts
        ));
    }
    let mut reg = MaterialRegistry::new(MAX_TILE_SIZE).unwrap();
    let err = reg
        .register_from_atlas(&RgbaImage::new(4, 4), &VariantSpec::new())
        .unwrap_err();
    assert!(matches!(err, RegistryError::TilemapDimension { .. }));
    // Messages for huge sizes format without overflowing.
    let msg = RegistryError::MaskDimension {
        width: 1,
        height: 1,
        tile_size: u32::MAX,
    }
    .to_string();
    assert!(msg.contains(&u32::MAX.to_string()));
}

#[test]
fn zero_tile_size_is_rejected() {
    assert_eq!(
        MaterialRegistry::new(0).unwrap_err(),
        RegistryError::InvalidTileSize(0)
    );
}

#[test]
fn mask_registration_stamps_base_texture() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let base = solid(Rgba([10, 200, 30, 255]));
    // Opaque white wherever the natural cell index is even, transparent elsewhere.
    let mut mask = RgbaImage::new(4 * TS, 4 * TS);
    for (x, y, px) in mask.enumerate_pixels_mut() {
        let index = (y / TS) * 4 + x / TS;
        if index % 2 == 0 {
            *px = Rgba([255, 255, 255, 255]);
        }
    }
    let id = reg
        .register_from_mask(&base, &mask, &VariantSpec::new())
        .unwrap();
    let mat = reg.get(id).unwrap();
    for b in 0..16u16 {
        let natural = TILE_REMAP_INVERSE[b as usize];
        let want = if natural % 2 == 0 {
            base.clone()
        } else {
            RgbaImage::new(TS, TS)
        };
        assert_eq!(mat.atlas.tile(b), want, "bitmask {}", b);
    }
}

#[test]
fn mask_registration_checks_both_inputs() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let mask = RgbaImage::new(4 * TS, 4 * TS);
    let err = reg
        .register_from_mask(&RgbaImage::new(TS, TS + 1), &mask, &VariantSpec::new())
        .unwrap_err();
    assert!(matches!(err, RegistryError::TextureDimension { .. }));
    let err = reg
        .register_from_mask(
            &RgbaImage::new(TS, TS),
            &RgbaImage::new(4 * TS, 2 * TS),
            &VariantSpec::new(),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::MaskDimension { .. }));
    assert!(reg.is_empty());
}

#[test]
fn mask_variants_come_from_extra_mask_rows() {
    let mut reg = MaterialRegistry::new(TS).unwrap();
    let base = solid(Rgba([90, 90, 90, 255]));
    let mut mask = RgbaImage::new(4 * TS, 5 * TS);
    // Only cell 17 (row 4, col 1) is opaque.
    for y in 4 * TS..5 * TS {
        for x in TS..2 * TS {
            mask.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let mut spec = VariantSpec::new();
    spec.insert(0, vec![17]);
    let id = reg.register_from_mask(&base, &mask, &spec).unwrap();
    let mat = reg.get(id).unwrap();
    assert_eq!(mat.variants.choices(0), Some(&[0u16, 16][..]));
    assert_eq!(mat.atlas.tile(16), base);
    assert_eq!(mat.atlas.tile(0), RgbaImage::new(TS, TS));
}
