use std::collections::HashSet;

use crate::batch::ConversionReport;
use crate::catalog::Catalog;
use crate::model::SpriteSheet;
use serde_json::{json, Value};

/// Namespace and folder the bitmap font providers reference sheets under.
pub const FONT_TEXTURE_PREFIX: &str = "minecraft:gif/";

/// Describe a sheet as JSON for tooling (the renderer itself reads the metadata pixels).
///
/// Shape: `{ width, height, tileSize, gridSide, frameCount, duration, sourceFrames, policy, meta }`.
pub fn to_json(sheet: &SpriteSheet) -> Value {
    json!({
        "width": sheet.width(),
        "height": sheet.height(),
        "tileSize": sheet.spec.tile_size,
        "gridSide": sheet.spec.grid.side(),
        "frameCount": sheet.spec.grid.frame_count(),
        "duration": sheet.spec.duration_secs,
        "sourceFrames": sheet.source_frames,
        "policy": sheet.policy,
        "meta": {
            "app": "glyph-sheet",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
        },
    })
}

/// Bitmap font definition for every glyph whose conversion succeeded, in catalog order.
///
/// Shape: `{ providers: [{ type: "bitmap", file, ascent, height, chars }] }`, where `file`
/// points at the `<name>.png` written by [`crate::batch::write_sheets`].
pub fn to_font_providers(catalog: &Catalog, reports: &[ConversionReport]) -> Value {
    let converted: HashSet<&str> = reports
        .iter()
        .filter(|r| r.is_ok())
        .map(|r| r.name.as_str())
        .collect();
    let providers: Vec<Value> = catalog
        .glyphs()
        .iter()
        .filter(|g| converted.contains(g.name.as_str()))
        .map(|g| {
            json!({
                "type": "bitmap",
                "file": format!("{FONT_TEXTURE_PREFIX}{}.png", g.name),
                "ascent": g.ascent,
                "height": g.height,
                "chars": g.chars,
            })
        })
        .collect();
    json!({ "providers": providers })
}
