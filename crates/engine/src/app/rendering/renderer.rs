use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::{Facing, RenderFrame, RenderSink, Vec2};

use super::text::{self, draw_text_clipped, wrap_text};
use super::{world_to_screen_px, Camera2D, ContainerLayout, Viewport};

const PAGE_COLOR: [u8; 4] = [0, 0, 0, 255];
const FLOOR_COLOR: [u8; 4] = [46, 40, 36, 255];
const HERO_PLACEHOLDER_COLOR: [u8; 4] = [236, 214, 160, 255];
const MONSTER_PLACEHOLDER_COLOR: [u8; 4] = [168, 48, 52, 255];
const KEY_PLACEHOLDER_COLOR: [u8; 4] = [240, 196, 64, 255];
const PANEL_BG_COLOR: [u8; 4] = [18, 16, 22, 255];
const PANEL_BORDER_COLOR: [u8; 4] = [210, 168, 92, 255];
const PANEL_TEXT_COLOR: [u8; 4] = [244, 232, 206, 255];
const PANEL_WIDTH_FRACTION: f32 = 0.6;
const PANEL_HEIGHT_FRACTION: f32 = 0.3;
/// Text scale for a 960 px tall window; smaller windows step down to 1.
const PANEL_TEXT_SCALE: i32 = 3;
const PANEL_TEXT_REFERENCE_HEIGHT: u32 = 960;
const HERO_SPRITE_KEY: &str = "hero";
const MONSTER_SPRITE_KEY: &str = "monster";
const KEY_SPRITE_KEY: &str = "key";
/// Share of the torch height that is actually lit; matches the gameplay light radius.
const TORCH_GLOW_RADIUS_FACTOR: f32 = 0.6;
const TORCH_REFERENCE_INTENSITY: f32 = 0.5;
const AMBIENT_LIGHT: f32 = 0.08;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<&'static str, Option<LoadedSprite>>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            sprite_cache: HashMap::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}

impl RenderSink for Renderer {
    type Error = Error;

    fn present(&mut self, frame: &RenderFrame<'_>) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        for key in [HERO_SPRITE_KEY, MONSTER_SPRITE_KEY, KEY_SPRITE_KEY] {
            ensure_sprite_loaded(&mut self.sprite_cache, &self.asset_root, key);
        }
        let sprite = |key: &str| self.sprite_cache.get(key).and_then(Option::as_ref);
        let hero_sprite = sprite(HERO_SPRITE_KEY);
        let monster_sprite = sprite(MONSTER_SPRITE_KEY);
        let key_sprite = sprite(KEY_SPRITE_KEY);

        let width = self.viewport.width;
        let height = self.viewport.height;
        let buffer = self.pixels.frame_mut();
        for chunk in buffer.chunks_exact_mut(4) {
            chunk.copy_from_slice(&PAGE_COLOR);
        }

        if let Some(message) = frame.message {
            draw_message_panel(buffer, width, height, message);
            return self.pixels.render();
        }

        let layout = ContainerLayout::for_viewport(self.viewport);
        let camera = camera_for_frame(frame);
        let zoom = camera.effective_zoom();
        let (floor_left, floor_top) = world_to_screen_px(Vec2::ZERO, &camera, &layout);
        let (floor_right, floor_bottom) = world_to_screen_px(frame.world_extent, &camera, &layout);
        draw_filled_rect(
            buffer,
            width,
            height,
            floor_left,
            floor_top,
            floor_right - floor_left,
            floor_bottom - floor_top,
            FLOOR_COLOR,
        );

        let monster_px = frame.monster_size_world * layout.px_per_world * zoom;
        for monster in frame.monsters {
            let (cx, cy) = world_to_screen_px(monster.position, &camera, &layout);
            let (sprite, fallback) = if monster.carries_key {
                (key_sprite, KEY_PLACEHOLDER_COLOR)
            } else {
                (monster_sprite, MONSTER_PLACEHOLDER_COLOR)
            };
            draw_entity(buffer, width, height, cx, cy, monster_px, sprite, false, fallback);
        }

        let hero_px = frame.hero.size_world * layout.px_per_world * zoom;
        let (hero_x, hero_y) = world_to_screen_px(frame.hero.position, &camera, &layout);
        draw_entity(
            buffer,
            width,
            height,
            hero_x,
            hero_y,
            hero_px,
            hero_sprite,
            frame.hero.facing == Facing::Left,
            HERO_PLACEHOLDER_COLOR,
        );

        let glow_radius_px =
            frame.torch.height_world * TORCH_GLOW_RADIUS_FACTOR * layout.px_per_world * zoom;
        apply_torch_darkness(
            buffer,
            width,
            height,
            (hero_x, hero_y),
            glow_radius_px,
            frame.torch.intensity,
        );

        self.pixels.render()
    }
}

fn camera_for_frame(frame: &RenderFrame<'_>) -> Camera2D {
    let fraction = |value: f32, extent: f32| {
        if extent > 0.0 {
            (value / extent).clamp(0.0, 1.0)
        } else {
            0.5
        }
    };
    Camera2D {
        focus: Vec2 {
            x: fraction(frame.hero.position.x, frame.world_extent.x),
            y: fraction(frame.hero.position.y, frame.world_extent.y),
        },
        zoom: frame.zoom,
    }
}

/// Brightness multiplier for a pixel `distance_px` away from the torch.
fn torch_brightness(distance_px: f32, radius_px: f32, intensity: f32) -> f32 {
    if radius_px <= 0.0 || distance_px >= radius_px {
        return AMBIENT_LIGHT;
    }
    let glow = 1.0 - distance_px / radius_px;
    let gain = (intensity / TORCH_REFERENCE_INTENSITY).max(0.0);
    (AMBIENT_LIGHT + (1.0 - AMBIENT_LIGHT) * glow * gain).min(1.0)
}

fn apply_torch_darkness(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    center: (i32, i32),
    radius_px: f32,
    intensity: f32,
) {
    if width == 0 || height == 0 {
        return;
    }
    let row_len = width as usize * 4;
    for (y, row) in buffer.chunks_exact_mut(row_len).take(height as usize).enumerate() {
        let dy = y as f32 - center.1 as f32;
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let dx = x as f32 - center.0 as f32;
            let brightness = torch_brightness((dx * dx + dy * dy).sqrt(), radius_px, intensity);
            for channel in &mut pixel[..3] {
                *channel = (*channel as f32 * brightness).round() as u8;
            }
        }
    }
}

fn panel_text_scale(height: u32) -> i32 {
    let scaled = height as i64 * PANEL_TEXT_SCALE as i64 / PANEL_TEXT_REFERENCE_HEIGHT as i64;
    scaled.clamp(1, PANEL_TEXT_SCALE as i64) as i32
}

/// Centered panel with `message` word-wrapped to its width. The panel grows
/// vertically when the wrapped text does not fit.
fn draw_message_panel(buffer: &mut [u8], width: u32, height: u32, message: &str) {
    let scale = panel_text_scale(height);
    let inset_x = 4 * scale;
    let inset_y = 3 * scale;
    let panel_width = (width as f32 * PANEL_WIDTH_FRACTION) as i32;
    let max_chars = ((panel_width - inset_x * 2) / text::glyph_advance(scale)).max(1) as usize;
    let lines = wrap_text(message, max_chars);
    let text_height = lines.len() as i32 * text::line_advance(scale);
    let panel_height =
        ((height as f32 * PANEL_HEIGHT_FRACTION) as i32).max(text_height + inset_y * 2);
    let left = (width as i32 - panel_width) / 2;
    let top = (height as i32 - panel_height) / 2;
    draw_filled_rect(
        buffer,
        width,
        height,
        left,
        top,
        panel_width,
        panel_height,
        PANEL_BG_COLOR,
    );
    draw_rect_outline(
        buffer,
        width,
        height,
        left,
        top,
        panel_width,
        panel_height,
        PANEL_BORDER_COLOR,
    );

    let mut y = top + (panel_height - text_height) / 2 + scale;
    for line in &lines {
        let x = left + (panel_width - text::text_width_px(line, scale)) / 2;
        draw_text_clipped(buffer, width, height, x, y, line, scale, PANEL_TEXT_COLOR);
        y += text::line_advance(scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_entity(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    size_px: f32,
    sprite: Option<&LoadedSprite>,
    flip_x: bool,
    fallback_color: [u8; 4],
) {
    match sprite {
        Some(sprite) if sprite.height > 0 => {
            let scale = size_px / sprite.height as f32;
            draw_sprite_centered_scaled(buffer, width, height, cx, cy, sprite, scale, flip_x);
        }
        _ => {
            let half = (size_px * 0.5).round().max(1.0) as i32;
            draw_filled_rect(
                buffer,
                width,
                height,
                cx - half,
                cy - half,
                half * 2,
                half * 2,
                fallback_color,
            );
        }
    }
}

fn ensure_sprite_loaded(
    cache: &mut HashMap<&'static str, Option<LoadedSprite>>,
    asset_root: &Path,
    key: &'static str,
) {
    if cache.contains_key(key) {
        return;
    }
    let path = sprite_image_path(asset_root, key);
    let sprite = match load_sprite_rgba(&path) {
        Ok(sprite) => Some(sprite),
        Err(reason) => {
            warn!(
                sprite_key = key,
                path = %path.display(),
                reason = reason.as_str(),
                "renderer_sprite_load_failed_using_placeholder"
            );
            None
        }
    };
    cache.insert(key, sprite);
}

fn sprite_image_path(asset_root: &Path, key: &str) -> PathBuf {
    asset_root.join("sprites").join(format!("{key}.png"))
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

pub(super) fn write_pixel_rgba_clipped(
    buffer: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > buffer.len() {
        return;
    }
    buffer[byte_offset..end].copy_from_slice(&color);
}

#[allow(clippy::too_many_arguments)]
fn draw_filled_rect(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba_clipped(buffer, width as usize, px, py, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_rect_outline(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    let right = x + rect_width - 1;
    let bottom = y + rect_height - 1;
    draw_filled_rect(buffer, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(buffer, width, height, x, bottom, rect_width, 1, color);
    draw_filled_rect(buffer, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(buffer, width, height, right, y, 1, rect_height, color);
}

fn normalized_sprite_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn scaled_sprite_dimensions(sprite: &LoadedSprite, scale: f32) -> (u32, u32) {
    let scale = normalized_sprite_scale(scale);
    let width = (sprite.width as f32 * scale).round().max(1.0) as u32;
    let height = (sprite.height as f32 * scale).round().max(1.0) as u32;
    (width, height)
}

#[allow(clippy::too_many_arguments)]
fn draw_sprite_centered_scaled(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    sprite: &LoadedSprite,
    scale: f32,
    flip_x: bool,
) {
    if sprite.width == 0 || sprite.height == 0 || width == 0 || height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let inv_scale = normalized_sprite_scale(scale).recip();
    let (scaled_w, scaled_h) = scaled_sprite_dimensions(sprite, scale);
    let left = center_x - (scaled_w as i32 / 2);
    let top = center_y - (scaled_h as i32 / 2);

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + scaled_w as i32).min(width as i32);
    let draw_bottom = (top + scaled_h as i32).min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let sprite_width = sprite.width as usize;
    for out_y in draw_top..draw_bottom {
        let src_y = (((out_y - top) as f32) * inv_scale).floor() as u32;
        let src_row_offset = src_y.min(sprite.height - 1) as usize * sprite_width * 4;

        for out_x in draw_left..draw_right {
            let src_x = (((out_x - left) as f32) * inv_scale).floor() as u32;
            let src_x = src_x.min(sprite.width - 1);
            let src_x = if flip_x {
                sprite.width - 1 - src_x
            } else {
                src_x
            } as usize;
            let src_offset = src_row_offset + src_x * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let mut color = [0u8; 4];
            color.copy_from_slice(&sprite.rgba[src_offset..src_offset + 4]);
            write_pixel_rgba_clipped(buffer, width as usize, out_x, out_y, color);
        }
    }
}
