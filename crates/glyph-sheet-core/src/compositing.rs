use image::RgbaImage;
use tracing::debug;

use crate::error::{Result, SheetError};
use crate::model::{AnimationFrame, AnimationSpec, BORDER};

/// Copy `src` into `canvas` with its top-left at (dx, dy).
///
/// Pixels are copied verbatim (no blending); anything falling outside `canvas` is clipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    for (x, y, px) in src.enumerate_pixels() {
        let (tx, ty) = (dx + x, dy + y);
        if tx < cw && ty < ch {
            canvas.put_pixel(tx, ty, *px);
        }
    }
}

/// Top-left pixel of tile `index` on the sheet: `(col * tile + 1, row * tile + 1)`.
pub fn tile_origin(spec: &AnimationSpec, index: u32) -> (u32, u32) {
    let (col, row) = spec.grid.cell(index);
    (col * spec.tile_size + BORDER, row * spec.tile_size + BORDER)
}

/// Lays `tiles` out row-major on a transparent `(side * tile + 2)` square canvas.
///
/// `tiles` must hold exactly `spec.grid.frame_count()` frames of `tile x tile` pixels.
pub fn compose_sheet(tiles: &[AnimationFrame], spec: &AnimationSpec) -> Result<RgbaImage> {
    let size = spec
        .canvas_size()
        .ok_or(SheetError::InvalidTileSize(spec.tile_size))?;
    debug_assert_eq!(tiles.len(), spec.grid.frame_count() as usize);
    let mut canvas = RgbaImage::new(size, size);
    for (i, tile) in tiles
        .iter()
        .take(spec.grid.frame_count() as usize)
        .enumerate()
    {
        debug_assert_eq!(tile.dimensions(), (spec.tile_size, spec.tile_size));
        let (dx, dy) = tile_origin(spec, i as u32);
        blit_rgba(tile.image(), &mut canvas, dx, dy);
    }
    debug!(size, side = spec.grid.side(), tiles = tiles.len(), "composed sheet");
    Ok(canvas)
}
