use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, ImageFormat};
use tracing::{debug, instrument};

use crate::error::{Result, SheetError};
use crate::model::AnimationFrame;

/// Produces the ordered frames of one animation.
///
/// Implementations must return at least one frame or fail with [`SheetError::Decode`].
pub trait FrameSource {
    fn frames(&self) -> Result<Vec<AnimationFrame>>;
    /// Path (or label) reported in errors and logs.
    fn origin(&self) -> &Path;
}

/// Animation read from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for FileSource {
    fn frames(&self) -> Result<Vec<AnimationFrame>> {
        let bytes = std::fs::read(&self.path).map_err(|e| SheetError::decode(&self.path, e))?;
        decode_frames(&bytes, &self.path)
    }
    fn origin(&self) -> &Path {
        &self.path
    }
}

/// Animation already held in memory (e.g. fetched from an archive).
#[derive(Debug, Clone)]
pub struct MemorySource {
    label: PathBuf,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(label: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

impl FrameSource for MemorySource {
    fn frames(&self) -> Result<Vec<AnimationFrame>> {
        decode_frames(&self.bytes, &self.label)
    }
    fn origin(&self) -> &Path {
        &self.label
    }
}

/// Decodes `bytes` into frames, sniffing the container from its content.
///
/// Animated GIF, APNG and animated WebP yield one frame per step (fully composited);
/// any other format the `image` crate understands yields a single frame.
#[instrument(skip_all, fields(origin = %origin.display(), len = bytes.len()))]
pub fn decode_frames(bytes: &[u8], origin: &Path) -> Result<Vec<AnimationFrame>> {
    let format = image::guess_format(bytes).map_err(|e| SheetError::decode(origin, e))?;
    let frames = match format {
        ImageFormat::Gif => {
            let decoder =
                GifDecoder::new(Cursor::new(bytes)).map_err(|e| SheetError::decode(origin, e))?;
            collect(decoder, origin)?
        }
        ImageFormat::Png => {
            let decoder =
                PngDecoder::new(Cursor::new(bytes)).map_err(|e| SheetError::decode(origin, e))?;
            if decoder.is_apng().map_err(|e| SheetError::decode(origin, e))? {
                let apng = decoder.apng().map_err(|e| SheetError::decode(origin, e))?;
                collect(apng, origin)?
            } else {
                still(bytes, format, origin)?
            }
        }
        ImageFormat::WebP => {
            let decoder =
                WebPDecoder::new(Cursor::new(bytes)).map_err(|e| SheetError::decode(origin, e))?;
            if decoder.has_animation() {
                collect(decoder, origin)?
            } else {
                still(bytes, format, origin)?
            }
        }
        other => still(bytes, other, origin)?,
    };
    if frames.is_empty() {
        return Err(SheetError::decode(origin, "animation has no frames"));
    }
    debug!(?format, frames = frames.len(), "decoded source");
    Ok(frames)
}

fn collect<'a, D: AnimationDecoder<'a>>(decoder: D, origin: &Path) -> Result<Vec<AnimationFrame>> {
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| SheetError::decode(origin, e))?;
    Ok(frames
        .into_iter()
        .map(|f| AnimationFrame::new(f.into_buffer()))
        .collect())
}

fn still(bytes: &[u8], format: ImageFormat, origin: &Path) -> Result<Vec<AnimationFrame>> {
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| SheetError::decode(origin, e))?;
    Ok(vec![AnimationFrame::new(img.to_rgba8())])
}
