use image::RgbaImage;

/// Copy `src` into `canvas` with its top-left corner at (dx, dy).
///
/// Pixels are copied verbatim, alpha included; no blending with what is
/// already on the canvas. Anything that falls outside the canvas is dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    if dx >= cw || dy >= ch {
        return;
    }
    let (sw, sh) = src.dimensions();
    let rw = sw.min(cw - dx);
    let rh = sh.min(ch - dy);
    for yy in 0..rh {
        for xx in 0..rw {
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
        }
    }
}
