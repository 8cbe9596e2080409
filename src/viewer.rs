//! Interactive window: pan with arrows/WASD, paint with the mouse.

use std::error::Error;

use dualgrid_compose::{Viewport, submit, upload_all};
use dualgrid_grid::TileType;
use dualgrid_render_raylib::{RaylibBatchRenderer, RaylibUploader};
use raylib::prelude::*;

use crate::scene::Scene;

const PAN_SPEED: i32 = 8;
const NUMBER_KEYS: [KeyboardKey; 9] = [
    KeyboardKey::KEY_ONE,
    KeyboardKey::KEY_TWO,
    KeyboardKey::KEY_THREE,
    KeyboardKey::KEY_FOUR,
    KeyboardKey::KEY_FIVE,
    KeyboardKey::KEY_SIX,
    KeyboardKey::KEY_SEVEN,
    KeyboardKey::KEY_EIGHT,
    KeyboardKey::KEY_NINE,
];

pub fn run(mut scene: Scene, width: i32, height: i32) -> Result<(), Box<dyn Error>> {
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("dualgrid")
        .resizable()
        .build();
    rl.set_target_fps(60);

    let textures = {
        let mut uploader = RaylibUploader::new(&mut rl, &thread);
        upload_all(&mut uploader, scene.dual.registry())?
    };
    let ts = scene.dual.tile_size() as i32;
    let material_count = scene.dual.registry().len();
    let mut camera = (scene.viewport.left, scene.viewport.top);
    let mut selected: TileType = if material_count > 1 { 1 } else { 0 };
    log::info!(target: "viewer", "window {}x{} materials={}", width, height, material_count);

    while !rl.window_should_close() {
        if rl.is_key_down(KeyboardKey::KEY_LEFT) || rl.is_key_down(KeyboardKey::KEY_A) {
            camera.0 -= PAN_SPEED;
        }
        if rl.is_key_down(KeyboardKey::KEY_RIGHT) || rl.is_key_down(KeyboardKey::KEY_D) {
            camera.0 += PAN_SPEED;
        }
        if rl.is_key_down(KeyboardKey::KEY_UP) || rl.is_key_down(KeyboardKey::KEY_W) {
            camera.1 -= PAN_SPEED;
        }
        if rl.is_key_down(KeyboardKey::KEY_DOWN) || rl.is_key_down(KeyboardKey::KEY_S) {
            camera.1 += PAN_SPEED;
        }
        for (i, key) in NUMBER_KEYS.iter().enumerate() {
            if rl.is_key_pressed(*key) && i < material_count {
                selected = i as TileType;
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            scene.dual.reset(selected);
        }

        let mouse = rl.get_mouse_position();
        let (cx, cy) = scene
            .dual
            .compositor()
            .cell_at_pixel(mouse.x as i32 + camera.0, mouse.y as i32 + camera.1);
        let edit = if !scene.dual.grid().is_in_bounds(cx, cy) {
            Ok(())
        } else if rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT)
            && scene.dual.grid().get(cx, cy) != selected
        {
            scene.dual.place(cx, cy, selected)
        } else if rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_RIGHT)
            && scene.dual.grid().get(cx, cy) != scene.dual.grid().default_material()
        {
            scene.dual.erase(cx, cy)
        } else {
            Ok(())
        };
        if let Err(e) = edit {
            log::warn!(target: "viewer", "edit at ({}, {}) failed: {}", cx, cy, e);
        }

        // One extra tile so the sub-tile offset never exposes an empty edge.
        let vp = Viewport::new(
            camera.0,
            camera.1,
            (rl.get_screen_width() + ts).max(0) as u32,
            (rl.get_screen_height() + ts).max(0) as u32,
        );
        scene.dual.composite_if_dirty(vp);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        let draws = {
            let mut renderer = RaylibBatchRenderer::new(&mut d, (0.0, 0.0));
            submit(&mut renderer, &textures, scene.dual.batches())
        };
        let label = scene
            .names
            .get(selected as usize)
            .map(String::as_str)
            .unwrap_or("?");
        d.draw_text(
            &format!("[{}] {}  cell ({}, {})  draws {}", selected, label, cx, cy, draws),
            12,
            12,
            20,
            Color::RAYWHITE,
        );
        d.draw_fps(12, 40);
    }
    Ok(())
}
