use std::{borrow::Cow, fmt, str::FromStr};

use image::RgbaImage;

use crate::{
    compose::scale::{
        ScaleFilter, ensure_non_empty, scale_by, scale_factor, scale_to_box, scale_window,
        scaled_dimensions,
    },
    foundation::{
        core::PixelRect,
        error::{TilerError, TilerResult},
    },
};

/// Horizontal placement of an image inside its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Align to the left edge.
    Left,
    /// Center horizontally.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
}

/// Vertical placement of an image inside its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Align to the top edge.
    Top,
    /// Center vertically.
    #[default]
    Middle,
    /// Align to the bottom edge.
    Bottom,
}

/// Policy deciding whether and how an image is rescaled to its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResizeMode {
    /// Never scale.
    None,
    /// Shrink only when the longer axis overflows the slot; never enlarge.
    #[default]
    Auto,
    /// Scale so the whole image fits inside the slot.
    Contain,
    /// Scale so the image covers the whole slot, overflowing one axis.
    Cover,
}

impl ResizeMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Auto => "auto",
            Self::Contain => "contain",
            Self::Cover => "cover",
        }
    }

    /// Parse a mode name. `fill` is an alias of `cover`; anything unrecognized
    /// falls back to [`ResizeMode::None`].
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "auto" => Self::Auto,
            "contain" => Self::Contain,
            "cover" | "fill" => Self::Cover,
            other => {
                tracing::warn!(mode = other, "unknown resize mode, images will not be scaled");
                Self::None
            }
        }
    }
}

impl From<String> for ResizeMode {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl From<ResizeMode> for String {
    fn from(mode: ResizeMode) -> Self {
        mode.name().to_owned()
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

impl fmt::Display for VAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        })
    }
}

impl FromStr for HAlign {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(TilerError::validation(format!(
                "unknown alignment \"{other}\" (expected left, center or right)"
            ))),
        }
    }
}

impl FromStr for VAlign {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" | "center" | "centre" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(TilerError::validation(format!(
                "unknown vertical alignment \"{other}\" (expected top, middle or bottom)"
            ))),
        }
    }
}

/// Per-draw format options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Format {
    pub align: HAlign,
    pub valign: VAlign,
    pub resize: ResizeMode,
    /// Inset applied to every side of the slot, in pixels.
    pub margin: u32,
}

impl Default for Format {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An image ready to be composited: where it goes and what it looks like.
#[derive(Clone, Debug)]
pub struct Placement<'a> {
    /// Margin-adjusted slot. Nothing outside it is written.
    pub slot: PixelRect,
    /// The image, scaled when the resize mode asked for it. Under `cover` it
    /// may be cut down to the part that ends up visible in the slot.
    pub image: Cow<'a, RgbaImage>,
    /// Top-left corner of `image` relative to the slot's min corner. Negative
    /// when the image overflows and is aligned away from the start edge.
    pub offset: (i64, i64),
}

impl Format {
    /// Format used when a draw call supplies none.
    pub const DEFAULT: Self = Self {
        align: HAlign::Center,
        valign: VAlign::Middle,
        resize: ResizeMode::Auto,
        margin: 0,
    };

    /// Turn a raw slot and image into a [`Placement`]: apply the margin, scale
    /// according to the resize mode, then align inside what is left.
    pub fn resolve<'a>(
        &self,
        slot: PixelRect,
        img: &'a RgbaImage,
        filter: ScaleFilter,
    ) -> TilerResult<Placement<'a>> {
        ensure_non_empty(img)?;
        let slot = slot.inset(self.margin).ok_or_else(|| {
            TilerError::validation(format!(
                "margin {} leaves no room in a {}x{} slot",
                self.margin,
                slot.width(),
                slot.height()
            ))
        })?;

        let (image, offset) = self.fit(slot, img, filter);
        Ok(Placement {
            slot,
            image,
            offset,
        })
    }

    fn fit<'a>(
        &self,
        slot: PixelRect,
        img: &'a RgbaImage,
        filter: ScaleFilter,
    ) -> (Cow<'a, RgbaImage>, (i64, i64)) {
        let (w, h) = img.dimensions();
        let (sw, sh) = (slot.width(), slot.height());
        let image = match self.resize {
            ResizeMode::None => Cow::Borrowed(img),
            ResizeMode::Auto => {
                let landscape = w > h;
                if (landscape && w > sw) || (!landscape && h > sh) {
                    scale_to_box(img, sw, sh, filter)
                } else {
                    Cow::Borrowed(img)
                }
            }
            ResizeMode::Contain => {
                let factor = scale_factor(w, sw).min(scale_factor(h, sh));
                scale_by(img, factor, filter)
            }
            ResizeMode::Cover => return self.cover(slot, img, filter),
        };
        let offset = self.offset(slot, image.dimensions());
        (image, offset)
    }

    /// `cover` scaling that only resamples the part of the source left visible
    /// inside `slot` after alignment. The scaled image can be far larger than
    /// the slot when the aspect ratios differ a lot.
    fn cover<'a>(
        &self,
        slot: PixelRect,
        img: &'a RgbaImage,
        filter: ScaleFilter,
    ) -> (Cow<'a, RgbaImage>, (i64, i64)) {
        let (w, h) = img.dimensions();
        let (sw, sh) = (slot.width(), slot.height());
        let factor = scale_factor(w, sw).max(scale_factor(h, sh));
        let (nw, nh) = scaled_dimensions(w, h, factor);
        let offset = self.offset(slot, (nw, nh));
        if nw <= sw && nh <= sh {
            return (scale_by(img, factor, filter), offset);
        }

        let x = visible_span(offset.0, sw, nw, w);
        let y = visible_span(offset.1, sh, nh, h);
        let window = PixelRect::new(x.src.0, y.src.0, x.src.1, y.src.1);
        let scaled = scale_window(img, window, x.len(), y.len(), filter);
        (
            Cow::Owned(scaled),
            (offset.0 + i64::from(x.dst.0), offset.1 + i64::from(y.dst.0)),
        )
    }

    fn offset(&self, slot: PixelRect, (w, h): (u32, u32)) -> (i64, i64) {
        (
            align_offset(slot.width(), w, self.align.factor()),
            align_offset(slot.height(), h, self.valign.factor()),
        )
    }
}

/// One axis of the source window kept by [`Format::cover`].
struct Span {
    /// Source pixels `[start, end)`.
    src: (u32, u32),
    /// Where those pixels land in the fully scaled image, `[start, end)`.
    dst: (u32, u32),
}

impl Span {
    fn len(&self) -> u32 {
        self.dst.1 - self.dst.0
    }
}

/// Source pixels of a `len`-pixel axis, scaled to `scaled` pixels and placed
/// at `offset`, that intersect a `visible`-pixel slot.
fn visible_span(offset: i64, visible: u32, scaled: u32, len: u32) -> Span {
    let (scaled_u, len_u) = (u64::from(scaled), u64::from(len));
    let vis0 = (-offset).clamp(0, i64::from(scaled)) as u64;
    let vis1 = (i64::from(visible) - offset).clamp(0, i64::from(scaled)) as u64;

    let src0 = (vis0 * len_u / scaled_u).min(len_u - 1);
    let src1 = (vis1 * len_u).div_ceil(scaled_u).clamp(src0 + 1, len_u);
    let dst0 = src0 * scaled_u / len_u;
    let dst1 = (src1 * scaled_u).div_ceil(len_u).clamp(dst0 + 1, scaled_u);

    Span {
        src: (src0 as u32, src1 as u32),
        dst: (dst0 as u32, dst1 as u32),
    }
}

trait AlignFactor {
    /// 0 = start, 1 = center, 2 = end, in halves of the leftover space.
    fn factor(self) -> i64;
}

impl AlignFactor for HAlign {
    fn factor(self) -> i64 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

impl AlignFactor for VAlign {
    fn factor(self) -> i64 {
        match self {
            Self::Top => 0,
            Self::Middle => 1,
            Self::Bottom => 2,
        }
    }
}

fn align_offset(container: u32, content: u32, halves: i64) -> i64 {
    let rem = i64::from(container) - i64::from(content);
    rem * halves / 2
}

#[cfg(test)]
#[path = "../../tests/unit/compose/format.rs"]
mod tests;
