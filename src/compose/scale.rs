//! Aspect-preserving raster scaling.
//!
//! Every scale here is uniform: a single factor is applied to both axes, so
//! the output never distorts the source.

use std::{borrow::Cow, fmt, str::FromStr};

use image::{RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::PixelRect,
    error::{TilerError, TilerResult},
};

/// Resampling filter used for every scale performed by a compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear (triangle) filter.
    #[default]
    Bilinear,
    /// Catmull-Rom cubic filter.
    CatmullRom,
    /// Lanczos with a window of 3.
    Lanczos3,
}

impl ScaleFilter {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::CatmullRom => "catmull-rom",
            Self::Lanczos3 => "lanczos3",
        }
    }

    fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ScaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleFilter {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "triangle" => Ok(Self::Bilinear),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(TilerError::validation(format!(
                "unknown scale filter \"{other}\" (expected nearest, bilinear, catmull-rom or lanczos3)"
            ))),
        }
    }
}

/// Factor that maps an extent of `from` pixels onto `to` pixels.
///
/// Equal extents give exactly 1 so that already-fitting images are passed
/// through untouched.
pub fn scale_factor(from: u32, to: u32) -> f64 {
    if from == to || from == 0 {
        1.0
    } else {
        f64::from(to) / f64::from(from)
    }
}

/// Dimensions of a `width x height` raster scaled uniformly by `factor`,
/// rounded to the nearest pixel and never below 1x1.
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let axis = |v: u32| -> u32 {
        (f64::from(v) * factor)
            .round()
            .clamp(1.0, f64::from(u32::MAX)) as u32
    };
    (axis(width), axis(height))
}

/// Scale `img` uniformly by `factor`.
pub fn scale_by(img: &RgbaImage, factor: f64, filter: ScaleFilter) -> Cow<'_, RgbaImage> {
    let (w, h) = img.dimensions();
    let (nw, nh) = scaled_dimensions(w, h, factor);
    if (nw, nh) == (w, h) {
        return Cow::Borrowed(img);
    }
    tracing::trace!(from = ?(w, h), to = ?(nw, nh), %filter, "scale image");
    Cow::Owned(image::imageops::resize(img, nw, nh, filter.filter_type()))
}

/// Scale `img` so that its longer axis matches the corresponding target axis.
///
/// Landscape images (`width > height`) are matched on width, everything else
/// on height. The other axis follows the same factor.
pub fn scale_to_box(
    img: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: ScaleFilter,
) -> Cow<'_, RgbaImage> {
    let (w, h) = img.dimensions();
    let factor = if w > h {
        scale_factor(w, target_width)
    } else {
        scale_factor(h, target_height)
    };
    scale_by(img, factor, filter)
}

/// Crop `window` out of `img` and resample just that part to
/// `width x height`.
pub(crate) fn scale_window(
    img: &RgbaImage,
    window: PixelRect,
    width: u32,
    height: u32,
    filter: ScaleFilter,
) -> RgbaImage {
    let cropped = image::imageops::crop_imm(
        img,
        window.x0,
        window.y0,
        window.width(),
        window.height(),
    )
    .to_image();
    tracing::trace!(
        window = ?(window.width(), window.height()),
        to = ?(width, height),
        %filter,
        "scale visible window"
    );
    image::imageops::resize(&cropped, width, height, filter.filter_type())
}

/// Validate that an image can be scaled at all.
pub(crate) fn ensure_non_empty(img: &RgbaImage) -> TilerResult<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(TilerError::validation("cannot place an empty image"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/scale.rs"]
mod tests;
