use crate::foundation::error::{TilerError, TilerResult};

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Build a size, rejecting empty canvases.
    pub fn new(width: u32, height: u32) -> TilerResult<Self> {
        if width == 0 || height == 0 {
            return Err(TilerError::validation(format!(
                "canvas size must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Same size with the axes swapped.
    pub const fn landscape(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Full-canvas rectangle anchored at the origin.
    pub fn rect(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

/// Axis-aligned pixel rectangle, min corner inclusive and max corner exclusive.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32, // exclusive
    pub y1: u32, // exclusive
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(self) -> u32 {
        self.y1 - self.y0
    }

    pub fn area(self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        self.x0 <= x && x < self.x1 && self.y0 <= y && y < self.y1
    }

    /// Move every edge `margin` pixels inward.
    ///
    /// Returns `None` when nothing would be left, i.e. `2 * margin` reaches the
    /// width or the height.
    pub fn inset(self, margin: u32) -> Option<Self> {
        let twice = u64::from(margin) * 2;
        if twice >= u64::from(self.width()) || twice >= u64::from(self.height()) {
            return None;
        }
        Some(Self {
            x0: self.x0 + margin,
            y0: self.y0 + margin,
            x1: self.x1 - margin,
            y1: self.y1 - margin,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
