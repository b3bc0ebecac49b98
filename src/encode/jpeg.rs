use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{Rgb, RgbImage, Rgba, RgbaImage, codecs::jpeg::JpegEncoder};

use crate::foundation::error::{TilerError, TilerResult};

/// Quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> TilerResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("can't create output directory '{}': {e}", parent.display())
        })?;
    }
    Ok(())
}

/// Flatten a straight-alpha canvas over an opaque background.
///
/// JPEG has no alpha channel; translucent pixels are blended over `bg` (whose
/// own alpha is ignored) and opaque pixels are copied as-is.
pub fn flatten_over(canvas: &RgbaImage, bg: Rgba<u8>) -> RgbImage {
    let [bg_r, bg_g, bg_b, _] = bg.0.map(u16::from);
    let mut out = RgbImage::new(canvas.width(), canvas.height());

    for (d, s) in out.pixels_mut().zip(canvas.pixels()) {
        let [r, g, b, a] = s.0.map(u16::from);
        if a == 255 {
            *d = Rgb([s[0], s[1], s[2]]);
            continue;
        }

        let inv = 255u16 - a;
        *d = Rgb([
            (mul_div255(r, a) + mul_div255(bg_r, inv)).min(255) as u8,
            (mul_div255(g, a) + mul_div255(bg_g, inv)).min(255) as u8,
            (mul_div255(b, a) + mul_div255(bg_b, inv)).min(255) as u8,
        ]);
    }
    out
}

/// Encode a canvas as baseline JPEG into `writer`.
pub fn encode_jpeg<W: Write>(
    canvas: &RgbaImage,
    bg: Rgba<u8>,
    quality: u8,
    writer: &mut W,
) -> TilerResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(TilerError::validation(format!(
            "jpeg quality must be within 1..=100, got {quality}"
        )));
    }
    let rgb = flatten_over(canvas, bg);
    JpegEncoder::new_with_quality(writer, quality)
        .encode_image(&rgb)
        .map_err(|e| TilerError::encode(format!("jpeg: {e}")))
}

/// Encode a canvas as JPEG and write it to `path`, creating parent
/// directories as needed.
pub fn write_jpeg(canvas: &RgbaImage, bg: Rgba<u8>, quality: u8, path: &Path) -> TilerResult<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("can't create output file '{}': {e}", path.display()))?;
    let mut writer = BufWriter::new(file);
    encode_jpeg(canvas, bg, quality, &mut writer)?;
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("can't write output file '{}': {e}", path.display()))?;
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
