//! Raylib backend: atlas upload and one rlgl quad batch per material.
// Unsafe is required for raw texture updates and rlgl immediate-mode calls.

use std::fmt;
use std::marker::PhantomData;

use dualgrid_atlas::TileAtlas;
use dualgrid_compose::{AtlasUploader, BatchRenderer, QuadBatch};
use dualgrid_grid::TileType;
use raylib::prelude::*;

// rlgl.h: #define RL_QUADS 0x0007
const RL_QUADS: i32 = 0x0007;
// Quads per rlBegin/rlEnd block; stays under the default rlgl batch buffer.
const QUADS_PER_BLOCK: usize = 4096;

#[derive(Debug)]
pub enum UploadError {
    Texture { material: TileType, reason: String },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Texture { material, reason } => {
                write!(f, "uploading atlas for material {}: {}", material, reason)
            }
        }
    }
}

impl std::error::Error for UploadError {}

/// Uploads material atlases as point-filtered, clamped textures.
pub struct RaylibUploader<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
}

impl<'a> RaylibUploader<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread) -> Self {
        Self { rl, thread }
    }
}

impl AtlasUploader for RaylibUploader<'_> {
    type Texture = Texture2D;
    type Error = UploadError;

    fn upload(&mut self, material: TileType, atlas: &TileAtlas) -> Result<Texture2D, UploadError> {
        let img = atlas.image();
        let (w, h) = (img.width() as i32, img.height() as i32);
        let blank = raylib::core::texture::Image::gen_image_color(w, h, Color::BLANK);
        let tex = self
            .rl
            .load_texture_from_image(self.thread, &blank)
            .map_err(|e| UploadError::Texture {
                material,
                reason: e.to_string(),
            })?;
        tex.set_texture_filter(self.thread, raylib::consts::TextureFilter::TEXTURE_FILTER_POINT);
        tex.set_texture_wrap(self.thread, raylib::consts::TextureWrap::TEXTURE_WRAP_CLAMP);
        // Atlas pixels are tightly packed RGBA8, matching the blank image's format.
        unsafe {
            raylib::ffi::UpdateTexture(*tex.as_ref(), img.as_raw().as_ptr() as *const _);
        }
        log::debug!(
            target: "render",
            "uploaded atlas material={} size={}x{}",
            material,
            w,
            h
        );
        Ok(tex)
    }
}

/// Draws batches while a raylib draw handle is live. `origin` shifts every
/// quad in screen pixels.
pub struct RaylibBatchRenderer<'a, D: RaylibDraw> {
    _draw: PhantomData<&'a mut D>,
    origin: (f32, f32),
}

impl<'a, D: RaylibDraw> RaylibBatchRenderer<'a, D> {
    pub fn new(_draw: &'a mut D, origin: (f32, f32)) -> Self {
        Self {
            _draw: PhantomData,
            origin,
        }
    }
}

impl<D: RaylibDraw> BatchRenderer for RaylibBatchRenderer<'_, D> {
    type Texture = Texture2D;

    fn draw_batch(&mut self, texture: &Texture2D, batch: &QuadBatch) {
        let raw = *texture.as_ref();
        if raw.width <= 0 || raw.height <= 0 {
            return;
        }
        let (inv_w, inv_h) = (1.0 / raw.width as f32, 1.0 / raw.height as f32);
        let (ox, oy) = self.origin;
        let total = batch.quad_count();
        let mut start = 0usize;
        unsafe {
            raylib::ffi::rlSetTexture(raw.id);
            while start < total {
                let end = (start + QUADS_PER_BLOCK).min(total);
                raylib::ffi::rlCheckRenderBatchLimit(((end - start) * 4) as i32);
                raylib::ffi::rlBegin(RL_QUADS);
                raylib::ffi::rlColor4ub(255, 255, 255, 255);
                for q in start..end {
                    let p = &batch.pos[q * 8..q * 8 + 8];
                    let t = &batch.uv[q * 8..q * 8 + 8];
                    // rlgl wants counter-clockwise: TL, BL, BR, TR.
                    for v in [0usize, 3, 2, 1] {
                        raylib::ffi::rlTexCoord2f(t[v * 2] * inv_w, t[v * 2 + 1] * inv_h);
                        raylib::ffi::rlVertex2f(p[v * 2] + ox, p[v * 2 + 1] + oy);
                    }
                }
                raylib::ffi::rlEnd();
                start = end;
            }
            raylib::ffi::rlSetTexture(0);
        }
    }
}
