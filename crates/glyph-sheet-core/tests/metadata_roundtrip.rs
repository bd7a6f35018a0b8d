use glyph_sheet_core::prelude::*;
use image::{Rgba, RgbaImage};

fn frames(n: usize, size: u32) -> Vec<AnimationFrame> {
    (0..n)
        .map(|i| {
            AnimationFrame::new(RgbaImage::from_fn(size, size, |x, y| {
                Rgba([(x * 7 + i as u32) as u8, (y * 3) as u8, 90, 255])
            }))
        })
        .collect()
}

#[test]
fn header_reads_back_for_every_grid() {
    for &count in ALLOWED_FRAME_COUNTS.iter() {
        let spec = AnimationSpec::new(12, count, 1.75).expect("spec");
        let sheet = encode_frames(&frames(5, 20), &spec).expect("encode");
        let raw = read_header(&sheet.image).expect("header");
        let side = count.isqrt();
        let size = 12 * side + 2;
        assert_eq!(raw.width, (size & 0xFF) as u8);
        assert_eq!(raw.height, (size & 0xFF) as u8);
        assert_eq!(raw.tile_size, 12);
        assert_eq!(raw.frame_count, count as u8);
        assert_eq!(raw.seconds, 1);
        assert_eq!(raw.fraction, 191);
        assert!((raw.duration_secs() - 1.749).abs() < 0.01);
        assert_eq!(sheet.header().frame_count, count);
    }
}

#[test]
fn metadata_survives_png_round_trip() {
    let spec = AnimationSpec::new(40, 9, 0.5).expect("spec");
    let sheet = encode_frames(&frames(9, 40), &spec).expect("encode");
    let png = encode_png(&sheet).expect("png");
    let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
    assert_eq!(decoded, sheet.image);
    let raw = read_header(&decoded).expect("header");
    assert_eq!((raw.seconds, raw.fraction), (0, 127));
}

#[test]
fn encoding_is_deterministic() {
    let spec = AnimationSpec::new(24, 25, 3.3).expect("spec");
    let input = frames(40, 30);
    let a = encode_png(&encode_frames(&input, &spec).expect("a")).expect("png a");
    let b = encode_png(&encode_frames(&input, &spec).expect("b")).expect("png b");
    assert_eq!(a, b);
}

#[test]
fn saved_file_matches_in_memory_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spec = AnimationSpec::new(16, 4, 1.0).expect("spec");
    let sheet = encode_frames(&frames(4, 16), &spec).expect("encode");
    let path = save_png(&sheet, dir.path().join("nested").join("sheet.png")).expect("save");
    let on_disk = std::fs::read(&path).expect("read");
    assert_eq!(on_disk, encode_png(&sheet).expect("png"));
}

#[test]
fn plain_images_have_no_header() {
    let img = RgbaImage::from_pixel(64, 64, Rgba([149, 213, 75, 1]));
    assert!(read_header(&img).is_none());
    assert!(read_header(&RgbaImage::new(3, 3)).is_none());
}
