use std::fs;

use glyph_sheet_core::prelude::*;
use image::codecs::gif::GifEncoder;
use image::{Frame, Rgba, RgbaImage};
use tempfile::tempdir;

fn write_gif(path: &std::path::Path, frames: usize) {
    let mut buf = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut buf);
        for i in 0..frames {
            let img = RgbaImage::from_pixel(20, 20, Rgba([(i * 30) as u8, 60, 120, 255]));
            enc.encode_frame(Frame::new(img)).expect("frame");
        }
    }
    fs::write(path, buf).expect("write gif");
}

fn entry(name: &str, file: &str, frames: u32) -> GlyphEntry {
    GlyphEntry {
        name: name.into(),
        file: file.into(),
        ascent: 8,
        height: 16,
        chars: Vec::new(),
        duration: Some(1.5),
        frames,
    }
}

fn run(parallel: bool) {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path();
    write_gif(&dir.join("fire.gif"), 6);
    write_gif(&dir.join("wave.gif"), 30);
    let cfg = SheetConfig::builder().tile_size(20).parallel(parallel).build();
    let catalog = Catalog::from_entries(
        vec![
            entry("fire", "fire.gif", 9),
            entry("ghost", "missing.gif", 16),
            entry("wave", "wave.gif", 4),
        ],
        &cfg,
    )
    .expect("catalog");

    let reports = encode_catalog(&catalog, dir, &cfg);
    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["fire", "ghost", "wave"]);
    assert!(reports[0].is_ok());
    assert!(reports[2].is_ok());
    match &reports[1].result {
        Err(e) => {
            assert_eq!(e.stage(), Stage::Decode);
            assert!(e.to_string().contains("missing.gif"));
        }
        Ok(_) => panic!("missing file must fail"),
    }
    let wave = reports[2].result.as_ref().expect("wave");
    assert_eq!(wave.policy, ReconcilePolicy::Downsample);
    assert_eq!(wave.width(), 42);

    let out = dir.join("out");
    let written = write_sheets(&reports, &out).expect("write");
    assert_eq!(written, vec![out.join("fire.png"), out.join("wave.png")]);
    for p in &written {
        let img = image::open(p).expect("open").to_rgba8();
        assert!(read_header(&img).is_some(), "{}", p.display());
    }
}

#[test]
fn one_failure_does_not_affect_others() {
    run(false);
}

#[test]
fn parallel_flag_keeps_catalog_order() {
    run(true);
}

#[test]
fn oversized_sheet_is_rejected_per_glyph() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path();
    write_gif(&dir.join("big.gif"), 2);
    let cfg = SheetConfig::builder().tile_size(20).max_texture_size(100).build();
    let catalog =
        Catalog::from_entries(vec![entry("big", "big.gif", 100)], &cfg).expect("catalog");
    let reports = encode_catalog(&catalog, dir, &cfg);
    assert!(matches!(
        reports[0].result,
        Err(SheetError::TextureTooLarge { size: 202, max: 100 })
    ));
}
