use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use crate::catalog::{Catalog, CatalogGlyph};
use crate::config::SheetConfig;
use crate::error::Result;
use crate::model::{AnimationSpec, SpriteSheet};
use crate::pipeline::{encode_source, save_png};
use crate::source::FileSource;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of converting one catalog glyph.
#[derive(Debug)]
pub struct ConversionReport {
    pub name: String,
    pub source: PathBuf,
    pub result: Result<SpriteSheet>,
}

impl ConversionReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Converts one glyph; owns every intermediate buffer it creates.
pub fn encode_glyph(glyph: &CatalogGlyph, base_dir: &Path, cfg: &SheetConfig) -> Result<SpriteSheet> {
    let spec = AnimationSpec::new(cfg.tile_size, glyph.grid.frame_count(), glyph.duration_secs)?;
    spec.check_max_texture_size(cfg.max_texture_size)?;
    encode_source(&FileSource::new(base_dir.join(&glyph.file)), &spec)
}

fn report(glyph: &CatalogGlyph, base_dir: &Path, cfg: &SheetConfig) -> ConversionReport {
    let source = base_dir.join(&glyph.file);
    let result = encode_glyph(glyph, base_dir, cfg);
    if let Err(e) = &result {
        warn!(name = %glyph.name, stage = %e.stage(), error = %e, "glyph conversion failed");
    }
    ConversionReport {
        name: glyph.name.clone(),
        source,
        result,
    }
}

#[instrument(skip_all, fields(glyphs = catalog.len(), base_dir = %base_dir.display()))]
/// Converts every glyph in `catalog`; reports come back in catalog order.
///
/// Conversions share no state, so one failure never affects the others.
/// With feature "parallel" and `cfg.parallel`, glyphs are converted on the rayon pool.
pub fn encode_catalog(catalog: &Catalog, base_dir: &Path, cfg: &SheetConfig) -> Vec<ConversionReport> {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            return catalog
                .glyphs()
                .par_iter()
                .map(|g| report(g, base_dir, cfg))
                .collect();
        }
    }
    catalog
        .glyphs()
        .iter()
        .map(|g| report(g, base_dir, cfg))
        .collect()
}

/// Writes every successful sheet to `out_dir/<name>.png`; returns the written paths.
///
/// Stops at the first write failure.
pub fn write_sheets(reports: &[ConversionReport], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for r in reports {
        if let Ok(sheet) = &r.result {
            written.push(save_png(sheet, out_dir.join(format!("{}.png", r.name)))?);
        }
    }
    Ok(written)
}
