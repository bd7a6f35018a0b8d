//! Metadata pixels: packed header fields written into the sheet border.
//!
//! Layout (all channels are bytes; sizes wrap with `& 0xFF`):
//!
//! | pixel          | R             | G                    | B  | A |
//! |----------------|---------------|----------------------|----|---|
//! | (0, 0)         | 149           | 213                  | 75 | 1 |
//! | (1, 0)         | width         | height               | 75 | 1 |
//! | (2, 0)         | tile size     | frame count          | 75 | 1 |
//! | (3, 0)         | floor(secs)   | floor(frac * 255)    | 75 | 1 |
//! | (W-1, 0)       | W-1           | 0                    | 75 | 1 |
//! | (0, H-1)       | 0             | H-1                  | 75 | 1 |
//! | (W-1, H-1)     | W-1           | H-1                  | 75 | 1 |
//!
//! Corner pixels hold their own offset from the origin so a sampler landing on any
//! corner can find the header at (0, 0). B=75 / A=1 mark a pixel as metadata; genuine
//! border pixels are fully transparent (A=0).

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker written at (0, 0).
pub const MAGIC: [u8; 4] = [149, 213, MARKER_B, MARKER_A];
/// Blue channel of every metadata pixel.
pub const MARKER_B: u8 = 75;
/// Alpha channel of every metadata pixel.
pub const MARKER_A: u8 = 1;

/// Values encoded into the metadata pixels, before byte truncation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SheetHeader {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub frame_count: u32,
    pub duration_secs: f64,
}

/// Header fields as read back from a sheet (one byte each).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawHeader {
    pub width: u8,
    pub height: u8,
    pub tile_size: u8,
    pub frame_count: u8,
    pub seconds: u8,
    pub fraction: u8,
}

impl RawHeader {
    /// Loop duration as the renderer reconstructs it: `seconds + fraction / 255`.
    pub fn duration_secs(&self) -> f64 {
        self.seconds as f64 + self.fraction as f64 / 255.0
    }
}

fn field(r: u32, g: u32) -> Rgba<u8> {
    Rgba([(r & 0xFF) as u8, (g & 0xFF) as u8, MARKER_B, MARKER_A])
}

/// Duration split into whole seconds and 1/255ths, each wrapped to a byte.
pub fn pack_duration(secs: f64) -> (u8, u8) {
    let whole = secs.floor();
    let frac = ((secs - whole) * 255.0).floor();
    ((whole as u64 & 0xFF) as u8, (frac as u64 & 0xFF) as u8)
}

/// Every metadata pixel as `((x, y), rgba)`, in write order.
pub fn metadata_pixels(h: &SheetHeader) -> [((u32, u32), Rgba<u8>); 7] {
    let (w, hh) = (h.width, h.height);
    let (secs, frac) = pack_duration(h.duration_secs);
    [
        ((0, 0), Rgba(MAGIC)),
        ((1, 0), field(w, hh)),
        ((2, 0), field(h.tile_size, h.frame_count)),
        ((3, 0), field(secs as u32, frac as u32)),
        ((w - 1, 0), field(w - 1, 0)),
        ((0, hh - 1), field(0, hh - 1)),
        ((w - 1, hh - 1), field(w - 1, hh - 1)),
    ]
}

/// Writes the header into `canvas`. Must run after all tiles are drawn.
///
/// `header.width/height` must match the canvas and be at least 5 so the
/// field strip and the top-right corner never share a pixel.
pub fn write_metadata(canvas: &mut RgbaImage, header: &SheetHeader) {
    debug_assert_eq!(canvas.dimensions(), (header.width, header.height));
    debug_assert!(header.width >= 5 && header.height >= 1);
    for ((x, y), px) in metadata_pixels(header) {
        canvas.put_pixel(x, y, px);
    }
    debug!(
        width = header.width,
        height = header.height,
        tile_size = header.tile_size,
        frame_count = header.frame_count,
        duration = header.duration_secs,
        "wrote metadata pixels"
    );
}

fn is_field(px: &Rgba<u8>) -> bool {
    px.0[2] == MARKER_B && px.0[3] == MARKER_A
}

/// Reads the header back, validating the magic, the field markers and the corner offsets.
///
/// Returns `None` if `img` is not an encoded sheet.
pub fn read_header(img: &RgbaImage) -> Option<RawHeader> {
    let (w, h) = img.dimensions();
    if w < 5 || h < 2 {
        return None;
    }
    if img.get_pixel(0, 0).0 != MAGIC {
        return None;
    }
    let dim = img.get_pixel(1, 0);
    let geo = img.get_pixel(2, 0);
    let time = img.get_pixel(3, 0);
    if !(is_field(dim) && is_field(geo) && is_field(time)) {
        return None;
    }
    let corners = [
        (w - 1, 0, field(w - 1, 0)),
        (0, h - 1, field(0, h - 1)),
        (w - 1, h - 1, field(w - 1, h - 1)),
    ];
    if corners
        .iter()
        .any(|(x, y, expected)| img.get_pixel(*x, *y) != expected)
    {
        return None;
    }
    Some(RawHeader {
        width: dim.0[0],
        height: dim.0[1],
        tile_size: geo.0[0],
        frame_count: geo.0[1],
        seconds: time.0[0],
        fraction: time.0[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(size: u32) -> SheetHeader {
        SheetHeader {
            width: size,
            height: size,
            tile_size: 40,
            frame_count: 16,
            duration_secs: 2.5,
        }
    }

    #[test]
    fn duration_packs_whole_and_fraction() {
        assert_eq!(pack_duration(2.5), (2, 127));
        assert_eq!(pack_duration(0.0), (0, 0));
        assert_eq!(pack_duration(1.999), (1, 254));
        // whole seconds wrap like the size fields
        assert_eq!(pack_duration(257.0), (1, 0));
    }

    #[test]
    fn pixels_match_layout() {
        let mut canvas = RgbaImage::new(162, 162);
        write_metadata(&mut canvas, &header(162));
        assert_eq!(canvas.get_pixel(0, 0).0, [149, 213, 75, 1]);
        assert_eq!(canvas.get_pixel(1, 0).0, [162, 162, 75, 1]);
        assert_eq!(canvas.get_pixel(2, 0).0, [40, 16, 75, 1]);
        assert_eq!(canvas.get_pixel(3, 0).0, [2, 127, 75, 1]);
        assert_eq!(canvas.get_pixel(161, 0).0, [161, 0, 75, 1]);
        assert_eq!(canvas.get_pixel(0, 161).0, [0, 161, 75, 1]);
        assert_eq!(canvas.get_pixel(161, 161).0, [161, 161, 75, 1]);
        // everything else untouched
        assert_eq!(canvas.get_pixel(4, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn sizes_wrap_past_255() {
        let mut canvas = RgbaImage::new(402, 402);
        write_metadata(&mut canvas, &header(402));
        assert_eq!(canvas.get_pixel(1, 0).0, [146, 146, 75, 1]);
        assert_eq!(canvas.get_pixel(401, 401).0, [145, 145, 75, 1]);
        let raw = read_header(&canvas).expect("header");
        assert_eq!(raw.width, 146);
    }

    #[test]
    fn read_back() {
        let mut canvas = RgbaImage::new(162, 162);
        write_metadata(&mut canvas, &header(162));
        let raw = read_header(&canvas).expect("header");
        assert_eq!(
            raw,
            RawHeader {
                width: 162,
                height: 162,
                tile_size: 40,
                frame_count: 16,
                seconds: 2,
                fraction: 127,
            }
        );
        assert!((raw.duration_secs() - (2.0 + 127.0 / 255.0)).abs() < 1e-9);
    }

    #[test]
    fn plain_image_has_no_header() {
        let canvas = RgbaImage::new(162, 162);
        assert!(read_header(&canvas).is_none());
    }
}
