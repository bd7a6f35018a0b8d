use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigProvider;
use crate::error::{Result, SheetError};
use crate::model::GridSpec;

/// First code point handed out to glyphs without explicit chars (Private Use Area).
pub const PUA_START: u32 = 0xE000;
/// Last Private Use Area code point.
pub const PUA_END: u32 = 0xF8FF;

/// One glyph definition as supplied by the discovery layer (unvalidated).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlyphEntry {
    pub name: String,
    /// Animation file, relative to the glyph source directory.
    pub file: PathBuf,
    #[serde(default = "default_ascent")]
    pub ascent: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub chars: Vec<String>,
    /// Loop duration in seconds; `None` takes the configured default.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default = "default_frames")]
    pub frames: u32,
}

fn default_ascent() -> i32 {
    8
}
fn default_height() -> i32 {
    16
}
fn default_frames() -> u32 {
    16
}

/// Supplies raw glyph entries (e.g. from definition files on disk).
pub trait CatalogSource {
    fn load(&self) -> Result<Vec<GlyphEntry>>;
}

impl CatalogSource for Vec<GlyphEntry> {
    fn load(&self) -> Result<Vec<GlyphEntry>> {
        Ok(self.clone())
    }
}

/// A validated glyph, ready to encode.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogGlyph {
    pub name: String,
    pub file: PathBuf,
    pub ascent: i32,
    pub height: i32,
    pub chars: Vec<String>,
    pub duration_secs: f64,
    pub grid: GridSpec,
}

/// Immutable list of validated glyphs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    glyphs: Vec<CatalogGlyph>,
}

impl Catalog {
    /// Loads entries from `source` and validates them.
    pub fn load(source: &dyn CatalogSource, cfg: &dyn ConfigProvider) -> Result<Self> {
        Self::from_entries(source.load()?, cfg)
    }

    /// Validates `entries`, in order.
    ///
    /// - frame counts must be in the allow-list (never coerced)
    /// - missing durations take `cfg.default_duration()`
    /// - entries without chars get the next unused Private Use Area code point
    /// - names and chars must be unique
    pub fn from_entries(entries: Vec<GlyphEntry>, cfg: &dyn ConfigProvider) -> Result<Self> {
        let mut names: HashSet<String> = HashSet::new();
        let mut claimed: HashSet<String> = HashSet::new();
        for e in &entries {
            if e.name.trim().is_empty() {
                return Err(SheetError::InvalidCatalog(format!(
                    "glyph with file {} has no name",
                    e.file.display()
                )));
            }
            if !names.insert(e.name.clone()) {
                return Err(SheetError::InvalidCatalog(format!(
                    "duplicate glyph name '{}'",
                    e.name
                )));
            }
            for c in &e.chars {
                if !claimed.insert(c.clone()) {
                    return Err(SheetError::InvalidCatalog(format!(
                        "char {:?} used by more than one glyph (second: '{}')",
                        c, e.name
                    )));
                }
            }
        }

        let mut next = PUA_START;
        let mut glyphs = Vec::with_capacity(entries.len());
        for e in entries {
            let grid = GridSpec::for_frame_count(e.frames)?;
            let duration_secs = e.duration.unwrap_or_else(|| cfg.default_duration());
            if !duration_secs.is_finite() || duration_secs < 0.0 {
                return Err(SheetError::InvalidDuration(duration_secs));
            }
            let chars = if e.chars.is_empty() {
                let (c, after) = next_free_char(next, &claimed).ok_or_else(|| {
                    SheetError::InvalidCatalog("private use area exhausted".into())
                })?;
                next = after;
                vec![c]
            } else {
                e.chars
            };
            debug!(
                name = %e.name,
                grid = grid.side(),
                frames = grid.frame_count(),
                ?chars,
                "catalog glyph"
            );
            glyphs.push(CatalogGlyph {
                name: e.name,
                file: e.file,
                ascent: e.ascent,
                height: e.height,
                chars,
                duration_secs,
                grid,
            });
        }
        Ok(Self { glyphs })
    }

    pub fn glyphs(&self) -> &[CatalogGlyph] {
        &self.glyphs
    }
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&CatalogGlyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }
}

/// First PUA code point at or after `from` not in `claimed`; also returns the next cursor.
fn next_free_char(from: u32, claimed: &HashSet<String>) -> Option<(String, u32)> {
    (from..=PUA_END)
        .filter_map(|cp| char::from_u32(cp).map(|c| (c.to_string(), cp)))
        .find(|(s, _)| !claimed.contains(s))
        .map(|(s, cp)| (s, cp + 1))
}
