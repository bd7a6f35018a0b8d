use serde::{Deserialize, Serialize};

/// Tile edge used by the canonical configuration.
pub const DEFAULT_TILE_SIZE: u32 = 40;
/// Loop duration (seconds) applied when a catalog entry leaves it unset.
pub const DEFAULT_DURATION: f64 = 2.0;
/// Largest sheet edge accepted by default.
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

/// Values supplied by the host configuration layer.
///
/// Loading these from disk is the host's concern; the encoder only reads them.
pub trait ConfigProvider {
    fn default_duration(&self) -> f64;
    fn max_texture_size(&self) -> u32;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetConfig {
    /// Edge length (pixels) every frame is normalized to.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Loop duration in seconds for entries that do not specify one.
    #[serde(default = "default_duration")]
    pub default_duration: f64,
    /// Maximum sheet edge in pixels.
    #[serde(default = "default_max_texture_size")]
    pub max_texture_size: u32,
    /// Run batch conversions in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            default_duration: default_duration(),
            max_texture_size: default_max_texture_size(),
            parallel: false,
        }
    }
}

impl SheetConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - `tile_size` is zero
    /// - `default_duration` is negative or not finite
    /// - `max_texture_size` cannot hold even the smallest (2x2) grid
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SheetError;

        if self.tile_size == 0 {
            return Err(SheetError::InvalidTileSize(self.tile_size));
        }
        if !self.default_duration.is_finite() || self.default_duration < 0.0 {
            return Err(SheetError::InvalidDuration(self.default_duration));
        }
        let smallest = self.tile_size.saturating_mul(2).saturating_add(2);
        if smallest > self.max_texture_size {
            return Err(SheetError::TextureTooLarge {
                size: smallest,
                max: self.max_texture_size,
            });
        }
        Ok(())
    }

    /// Create a fluent builder for `SheetConfig`.
    pub fn builder() -> SheetConfigBuilder {
        SheetConfigBuilder::new()
    }
}

impl ConfigProvider for SheetConfig {
    fn default_duration(&self) -> f64 {
        self.default_duration
    }
    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}
fn default_duration() -> f64 {
    DEFAULT_DURATION
}
fn default_max_texture_size() -> u32 {
    DEFAULT_MAX_TEXTURE_SIZE
}

/// Builder for `SheetConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SheetConfigBuilder {
    cfg: SheetConfig,
}

impl SheetConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SheetConfig::default(),
        }
    }
    pub fn tile_size(mut self, v: u32) -> Self {
        self.cfg.tile_size = v;
        self
    }
    pub fn default_duration(mut self, v: f64) -> Self {
        self.cfg.default_duration = v;
        self
    }
    pub fn max_texture_size(mut self, v: u32) -> Self {
        self.cfg.max_texture_size = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> SheetConfig {
        self.cfg
    }
}
