use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use image::{ImageFormat, RgbaImage};

use crate::foundation::error::{TilerError, TilerResult};

/// A decoded input raster plus the name of the decoder that matched it.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Straight-alpha RGBA8 pixels.
    pub image: RgbaImage,
    /// Short decoder name, e.g. `"jpeg"`, `"png"` or `"webp"`.
    pub decoder: &'static str,
}

/// Sniff the format of `reader` from its magic bytes and decode it.
pub fn decode_image<R: BufRead + Seek>(reader: R) -> TilerResult<DecodedImage> {
    let reader = image::ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| TilerError::decode(format!("read image header: {e}")))?;
    let decoder = reader
        .format()
        .map(decoder_name)
        .ok_or_else(|| TilerError::decode("unrecognized image format"))?;

    let img = reader
        .decode()
        .map_err(|e| TilerError::decode(format!("{decoder}: {e}")))?;

    Ok(DecodedImage {
        image: img.to_rgba8(),
        decoder,
    })
}

/// Open `path` for decoding.
pub fn open_reader(path: &Path) -> TilerResult<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("can't open image '{}': {e}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Open `path` and decode it with [`decode_image`].
pub fn open_image(path: &Path) -> TilerResult<DecodedImage> {
    decode_image(open_reader(path)?)
}

pub(crate) fn decoder_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
