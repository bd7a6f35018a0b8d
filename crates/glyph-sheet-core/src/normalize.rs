use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

use crate::model::AnimationFrame;

/// Resizes every frame to `tile_size x tile_size`.
///
/// Aspect ratio is kept: the longer side is scaled to `tile_size` with a Catmull-Rom
/// (bicubic) filter and the result is drawn at (0, 0) on a fully transparent tile, so
/// non-square frames are letterboxed towards the bottom/right. Alpha is resampled as a
/// plain channel, never premultiplied.
pub fn normalize_frames(frames: &[AnimationFrame], tile_size: u32) -> Vec<AnimationFrame> {
    let out: Vec<AnimationFrame> = frames
        .iter()
        .map(|f| AnimationFrame::new(normalize_frame(f.image(), tile_size)))
        .collect();
    debug!(frames = out.len(), tile_size, "normalized frames");
    out
}

/// Fits one frame into a transparent `tile_size` square, anchored top-left.
pub fn normalize_frame(src: &RgbaImage, tile_size: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    if w == tile_size && h == tile_size {
        return src.clone();
    }
    let mut tile = RgbaImage::new(tile_size, tile_size);
    if w == 0 || h == 0 {
        return tile;
    }
    let (sw, sh) = fit_dimensions(w, h, tile_size);
    let scaled = imageops::resize(src, sw, sh, FilterType::CatmullRom);
    for (x, y, px) in scaled.enumerate_pixels() {
        tile.put_pixel(x, y, *px);
    }
    tile
}

/// Scaled size of a `w x h` frame whose longer side becomes `tile_size`.
pub fn fit_dimensions(w: u32, h: u32, tile_size: u32) -> (u32, u32) {
    let longest = w.max(h).max(1) as f64;
    let scale = tile_size as f64 / longest;
    let sw = ((w as f64 * scale).round() as u32).clamp(1, tile_size);
    let sh = ((h as f64 * scale).round() as u32).clamp(1, tile_size);
    (sw, sh)
}
