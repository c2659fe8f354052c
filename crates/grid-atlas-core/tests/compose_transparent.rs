use grid_atlas_core::prelude::*;
use image::{DynamicImage, Rgba, RgbaImage};

fn solid(key: &str, w: u32, h: u32, c: [u8; 4]) -> InputImage {
    InputImage {
        key: key.into(),
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(c))),
    }
}

#[test]
fn background_is_transparent_and_alpha_is_kept() {
    let cfg = PackerConfig::builder().max_dimension(64).padding(2).build();
    let inputs = vec![solid("red", 8, 8, [255, 0, 0, 255]), solid("ghost", 4, 4, [0, 0, 255, 77])];
    let out = pack_images(inputs, cfg).expect("pack");

    assert_eq!(out.rgba.dimensions(), (out.atlas.canvas.width, out.atlas.canvas.height));
    // padding border
    assert_eq!(out.rgba.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(out.rgba.get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
    assert_eq!(out.rgba.get_pixel(9, 9), &Rgba([255, 0, 0, 255]));
    assert_eq!(out.rgba.get_pixel(10, 2), &Rgba([0, 0, 0, 0]));

    let ghost = out.atlas.get("ghost").copied().expect("ghost");
    assert_eq!(ghost, Rect::new(12, 2, 4, 4));
    assert_eq!(out.rgba.get_pixel(12, 2), &Rgba([0, 0, 255, 77]));
    // unused part of the 8x8 cell stays empty
    assert_eq!(out.rgba.get_pixel(16, 6), &Rgba([0, 0, 0, 0]));
}

#[test]
fn layout_and_images_have_same_geometry() {
    let cfg = PackerConfig::builder().max_dimension(256).padding(1).build();
    let sizes = vec![("a", 40, 20), ("b", 16, 32), ("c", 10, 10), ("d", 8, 48)];
    let layout = pack_layout(sizes.clone(), cfg).expect("layout");

    let inputs: Vec<InputImage> = sizes
        .iter()
        .map(|(k, w, h)| solid(k, *w, *h, [1, 2, 3, 255]))
        .collect();
    let out = pack_images(inputs, cfg).expect("images");

    assert_eq!(layout, out.atlas);
}

#[test]
fn only_the_winning_duplicate_is_drawn() {
    let cfg = PackerConfig::builder().max_dimension(64).padding(0).build();
    let inputs = vec![solid("dup", 4, 4, [255, 0, 0, 255]), solid("dup", 4, 4, [0, 255, 0, 255])];
    let out = pack_images(inputs, cfg).expect("pack");

    assert_eq!(out.atlas.frames.len(), 1);
    assert_eq!(out.atlas.get("dup"), Some(&Rect::new(4, 0, 4, 4)));
    assert_eq!(out.rgba.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(out.rgba.get_pixel(4, 0), &Rgba([0, 255, 0, 255]));
}

#[test]
fn overflowing_rows_are_cut_off() {
    // 2 per row, 3 rows of 8 in a 16px canvas: the last row is outside
    let cfg = PackerConfig::builder().max_dimension(16).padding(0).build();
    let inputs: Vec<InputImage> = (0..6)
        .map(|i| solid(&format!("s{i}"), 8, 8, [9, 9, 9, 255]))
        .collect();
    let out = pack_images(inputs, cfg).expect("overflow is accepted");

    assert_eq!(out.rgba.dimensions(), (16, 16));
    assert!(out.rgba.pixels().all(|p| p[3] == 255));
    assert_eq!(out.stats().num_clipped, 2);
    assert_eq!(out.atlas.overflow.map(|o| o.clipped), Some(2));
}
