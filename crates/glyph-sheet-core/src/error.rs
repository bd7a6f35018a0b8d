use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Input validation before any decode work.
    Validate,
    Decode,
    Normalize,
    Reconcile,
    Compose,
    Metadata,
    /// Serializing the finished sheet.
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Validate => "validate",
            Stage::Decode => "decode",
            Stage::Normalize => "normalize",
            Stage::Reconcile => "reconcile",
            Stage::Compose => "compose",
            Stage::Metadata => "metadata",
            Stage::Persist => "persist",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to decode animation {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Invalid frame count {requested}: must be one of {allowed:?}")]
    InvalidFrameCount {
        requested: u32,
        allowed: &'static [u32],
    },
    #[error("Failed to encode sheet to {target}: {reason}")]
    Encode { target: String, reason: String },
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),
    #[error("Invalid duration: {0} (must be finite and >= 0)")]
    InvalidDuration(f64),
    #[error("Sheet of {size}x{size} exceeds max texture size {max}")]
    TextureTooLarge { size: u32, max: u32 },
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl SheetError {
    /// Stage of the conversion that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            SheetError::Decode { .. } => Stage::Decode,
            SheetError::InvalidFrameCount { .. }
            | SheetError::InvalidTileSize(_)
            | SheetError::InvalidDuration(_)
            | SheetError::InvalidCatalog(_) => Stage::Validate,
            SheetError::TextureTooLarge { .. } => Stage::Compose,
            SheetError::Encode { .. } => Stage::Persist,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SheetError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
