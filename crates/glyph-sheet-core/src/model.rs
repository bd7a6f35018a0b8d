use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::metadata::SheetHeader;

/// Frame counts a sheet may hold. Each is a perfect square so the grid is `side x side`.
pub const ALLOWED_FRAME_COUNTS: [u32; 9] = [4, 9, 16, 25, 36, 49, 64, 81, 100];

/// Transparent border (pixels) around the tile grid.
pub const BORDER: u32 = 1;

/// Returns true if `n` is an allowed frame count.
pub fn is_valid_frame_count(n: u32) -> bool {
    ALLOWED_FRAME_COUNTS.contains(&n)
}

/// Grid side length for an allowed frame count (`sqrt(n)`).
pub fn grid_side_for(n: u32) -> Result<u32> {
    if !is_valid_frame_count(n) {
        return Err(SheetError::InvalidFrameCount {
            requested: n,
            allowed: &ALLOWED_FRAME_COUNTS,
        });
    }
    Ok(n.isqrt())
}

/// One decoded animation step: an owned RGBA8 buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    image: RgbaImage,
}

impl AnimationFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }
    pub fn width(&self) -> u32 {
        self.image.width()
    }
    pub fn height(&self) -> u32 {
        self.image.height()
    }
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl From<RgbaImage> for AnimationFrame {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

/// Square grid geometry: `side x side` cells holding exactly `frame_count` tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridSpec {
    side: u32,
    frame_count: u32,
}

impl GridSpec {
    /// Validates `frame_count` against [`ALLOWED_FRAME_COUNTS`]; never coerces.
    pub fn for_frame_count(frame_count: u32) -> Result<Self> {
        let side = grid_side_for(frame_count)?;
        Ok(Self { side, frame_count })
    }
    pub fn side(&self) -> u32 {
        self.side
    }
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
    /// (column, row) of tile `index` in row-major order.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index % self.side, index / self.side)
    }
}

/// Everything that determines output geometry, fixed before any pixel is drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnimationSpec {
    pub tile_size: u32,
    pub grid: GridSpec,
    pub duration_secs: f64,
}

impl AnimationSpec {
    /// Validates every input: frame count first, then tile size and duration.
    pub fn new(tile_size: u32, frame_count: u32, duration_secs: f64) -> Result<Self> {
        let grid = GridSpec::for_frame_count(frame_count)?;
        if tile_size == 0 {
            return Err(SheetError::InvalidTileSize(tile_size));
        }
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(SheetError::InvalidDuration(duration_secs));
        }
        let spec = Self {
            tile_size,
            grid,
            duration_secs,
        };
        // the four-pixel metadata strip and the top-right corner marker must not collide;
        // an edge that overflows u32 is just as unusable
        match spec.canvas_size() {
            Some(size) if size >= 5 => Ok(spec),
            _ => Err(SheetError::InvalidTileSize(tile_size)),
        }
    }

    /// Sheet edge length `side * tile_size + 2`, or `None` on overflow.
    pub fn canvas_size(&self) -> Option<u32> {
        self.grid
            .side()
            .checked_mul(self.tile_size)
            .and_then(|v| v.checked_add(2 * BORDER))
    }

    /// Rejects canvases whose edge exceeds `max`.
    pub fn check_max_texture_size(&self, max: u32) -> Result<()> {
        match self.canvas_size() {
            Some(size) if size <= max => Ok(()),
            size => Err(SheetError::TextureTooLarge {
                size: size.unwrap_or(u32::MAX),
                max,
            }),
        }
    }
}

/// Which branch of frame-count reconciliation applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Fewer source frames than slots: cycle from the first frame.
    Pad,
    PassThrough,
    /// Up to twice as many source frames: keep the leading ones.
    Truncate,
    /// More than twice as many: nearest-index sampling across the whole source.
    Downsample,
}

/// Finished sheet: RGBA pixels plus the geometry that produced them.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub image: RgbaImage,
    pub spec: AnimationSpec,
    /// Number of frames the source animation decoded to.
    pub source_frames: usize,
    pub policy: ReconcilePolicy,
}

impl SpriteSheet {
    pub fn width(&self) -> u32 {
        self.image.width()
    }
    pub fn height(&self) -> u32 {
        self.image.height()
    }
    /// Header fields as written into the metadata pixels (before byte truncation).
    pub fn header(&self) -> SheetHeader {
        SheetHeader {
            width: self.width(),
            height: self.height(),
            tile_size: self.spec.tile_size,
            frame_count: self.spec.grid.frame_count(),
            duration_secs: self.spec.duration_secs,
        }
    }
}
