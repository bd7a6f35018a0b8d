use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, info, instrument};

use crate::compositing::compose_sheet;
use crate::config::{DEFAULT_MAX_TEXTURE_SIZE, SheetConfig};
use crate::error::{Result, SheetError, Stage};
use crate::metadata::{SheetHeader, write_metadata};
use crate::model::{AnimationFrame, AnimationSpec, SpriteSheet};
use crate::normalize::normalize_frames;
use crate::reconcile::reconcile_frames;
use crate::source::{FileSource, FrameSource};

#[instrument(skip(source_path), fields(path = %source_path.as_ref().display()))]
/// Encodes the animation at `source_path` into a sprite sheet.
///
/// Notes:
/// - `frame_count` is validated before the file is touched.
/// - The sheet edge is capped at `DEFAULT_MAX_TEXTURE_SIZE`; use [`encode_with_config`]
///   for another limit.
/// - Source frames are normalized to `tile_size`, padded/sampled to `frame_count`,
///   laid out row-major and stamped with the metadata pixels.
/// - The result is a pure function of the inputs; nothing is retried.
pub fn encode(
    source_path: impl AsRef<Path>,
    tile_size: u32,
    frame_count: u32,
    duration_secs: f64,
) -> Result<SpriteSheet> {
    let spec = AnimationSpec::new(tile_size, frame_count, duration_secs)?;
    spec.check_max_texture_size(DEFAULT_MAX_TEXTURE_SIZE)?;
    encode_source(&FileSource::new(source_path.as_ref()), &spec)
}

/// Like [`encode`], taking tile size and texture limit from `cfg`.
pub fn encode_with_config(
    source_path: impl AsRef<Path>,
    frame_count: u32,
    duration_secs: f64,
    cfg: &SheetConfig,
) -> Result<SpriteSheet> {
    cfg.validate()?;
    let spec = AnimationSpec::new(cfg.tile_size, frame_count, duration_secs)?;
    spec.check_max_texture_size(cfg.max_texture_size)?;
    encode_source(&FileSource::new(source_path.as_ref()), &spec)
}

/// Decodes `source` and encodes its frames per `spec`.
pub fn encode_source<S: FrameSource + ?Sized>(
    source: &S,
    spec: &AnimationSpec,
) -> Result<SpriteSheet> {
    let frames = source.frames()?;
    let sheet = encode_frames(&frames, spec).map_err(|e| match e {
        SheetError::Decode { reason, .. } => SheetError::Decode {
            path: source.origin().to_path_buf(),
            reason,
        },
        other => other,
    })?;
    info!(
        source = %source.origin().display(),
        size = sheet.width(),
        side = sheet.spec.grid.side(),
        frames = sheet.spec.grid.frame_count(),
        source_frames = sheet.source_frames,
        "encoded sprite sheet"
    );
    Ok(sheet)
}

/// Encodes already-decoded frames: normalize, reconcile, compose, stamp metadata.
pub fn encode_frames(frames: &[AnimationFrame], spec: &AnimationSpec) -> Result<SpriteSheet> {
    if frames.is_empty() {
        return Err(SheetError::decode("<frames>", "animation has no frames"));
    }
    let tiles = normalize_frames(frames, spec.tile_size);
    debug!(stage = %Stage::Normalize, tiles = tiles.len(), "stage done");

    let (tiles, policy) = reconcile_frames(&tiles, spec.grid.frame_count() as usize)?;
    debug!(stage = %Stage::Reconcile, ?policy, "stage done");

    let mut image = compose_sheet(&tiles, spec)?;
    debug!(stage = %Stage::Compose, size = image.width(), "stage done");

    let header = SheetHeader {
        width: image.width(),
        height: image.height(),
        tile_size: spec.tile_size,
        frame_count: spec.grid.frame_count(),
        duration_secs: spec.duration_secs,
    };
    write_metadata(&mut image, &header);
    debug!(stage = %Stage::Metadata, "stage done");

    Ok(SpriteSheet {
        image,
        spec: *spec,
        source_frames: frames.len(),
        policy,
    })
}

/// Serializes the sheet as PNG bytes (RGBA8, lossless).
pub fn encode_png(sheet: &SpriteSheet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            sheet.image.as_raw(),
            sheet.width(),
            sheet.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| SheetError::Encode {
            target: "<memory>".into(),
            reason: e.to_string(),
        })?;
    Ok(buf)
}

/// Writes the sheet to `path` as PNG, creating parent directories as needed.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_png(sheet: &SpriteSheet, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let encode_err = |reason: String| SheetError::Encode {
        target: path.display().to_string(),
        reason,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| encode_err(e.to_string()))?;
    }
    let bytes = encode_png(sheet).map_err(|e| match e {
        SheetError::Encode { reason, .. } => encode_err(reason),
        other => other,
    })?;
    fs::write(path, bytes).map_err(|e| encode_err(e.to_string()))?;
    info!(size = sheet.width(), "wrote sheet");
    Ok(path.to_path_buf())
}
