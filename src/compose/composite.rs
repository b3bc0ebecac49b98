use image::{Rgba, RgbaImage};

use crate::foundation::core::PixelRect;

/// Fill the whole canvas with one colour.
pub fn fill(canvas: &mut RgbaImage, color: Rgba<u8>) {
    for px in canvas.pixels_mut() {
        *px = color;
    }
}

/// Copy `src` onto `canvas` with its top-left corner at `origin` (canvas
/// coordinates), overwriting destination pixels. Only pixels inside `clip`
/// and inside the canvas are written.
///
/// This is a source copy, not alpha compositing: whatever was there before is
/// replaced, alpha included.
pub fn blit_clipped(canvas: &mut RgbaImage, src: &RgbaImage, clip: PixelRect, origin: (i64, i64)) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();

    let x0 = i64::from(clip.x0).max(origin.0).max(0);
    let y0 = i64::from(clip.y0).max(origin.1).max(0);
    let x1 = i64::from(clip.x1)
        .min(origin.0 + i64::from(sw))
        .min(i64::from(cw));
    let y1 = i64::from(clip.y1)
        .min(origin.1 + i64::from(sh))
        .min(i64::from(ch));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let row_bytes = ((x1 - x0) * 4) as usize;
    let canvas_stride = cw as usize * 4;
    let src_stride = sw as usize * 4;
    let src_x = (x0 - origin.0) as usize;
    let dst: &mut [u8] = canvas;
    let src_raw: &[u8] = src;

    for y in y0..y1 {
        let src_y = (y - origin.1) as usize;
        let d = y as usize * canvas_stride + x0 as usize * 4;
        let s = src_y * src_stride + src_x * 4;
        dst[d..d + row_bytes].copy_from_slice(&src_raw[s..s + row_bytes]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composite.rs"]
mod tests;
