//! Core library for encoding short looping animations into sprite sheets.
//!
//! - Pipeline: decode → normalize to square tiles → reconcile the frame count with an
//!   allowed grid (4, 9, ... 100) → lay out row-major inside a 1px border → stamp metadata pixels
//! - The metadata pixels make the sheet self-describing: a renderer recovers size, tile
//!   size, frame count and loop duration by sampling the image alone
//! - Catalog validation and batch conversion sit on top; conversions share no state
//!
//! Quick example:
//! ```ignore
//! use glyph_sheet_core::{encode, save_png};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = encode("fire.gif", 40, 16, 2.0)?;
//! assert_eq!(sheet.width(), 162);
//! save_png(&sheet, "out/fire.png")?;
//! # Ok(()) }
//! ```

pub mod batch;
pub mod catalog;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod source;

pub use batch::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use metadata::*;
pub use model::*;
pub use pipeline::*;
pub use source::*;

/// Convenience prelude for common types and functions.
/// Importing `glyph_sheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogGlyph, CatalogSource, GlyphEntry};
    pub use crate::config::{ConfigProvider, SheetConfig, SheetConfigBuilder};
    pub use crate::error::{Result, SheetError, Stage};
    pub use crate::metadata::{RawHeader, SheetHeader, read_header};
    pub use crate::model::{
        ALLOWED_FRAME_COUNTS, AnimationFrame, AnimationSpec, GridSpec, ReconcilePolicy,
        SpriteSheet, grid_side_for, is_valid_frame_count,
    };
    pub use crate::source::{FileSource, FrameSource, MemorySource};
    pub use crate::{
        ConversionReport, encode, encode_catalog, encode_frames, encode_png, encode_source,
        encode_with_config, save_png, write_sheets,
    };
}
