use crate::foundation::{
    core::{CanvasSize, PixelRect},
    error::{TilerError, TilerResult},
};

/// Number of slots on one page.
///
/// Always even and at least 2. Slots are laid out on two rows of
/// `slots / 2` columns and numbered row-major, so a 4-slot grid maps
/// 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid(usize);

impl Grid {
    /// Rows are fixed; only the column count grows with the slot count.
    pub const ROWS: usize = 2;

    /// Normalize a requested tile count. Odd counts round up to the next even
    /// number.
    pub fn new(tiles: usize) -> TilerResult<Self> {
        if tiles < 2 {
            return Err(TilerError::validation(format!(
                "tile count must be at least 2, got {tiles}"
            )));
        }
        Ok(Self(tiles + tiles % 2))
    }

    pub fn slots(self) -> usize {
        self.0
    }

    pub fn columns(self) -> usize {
        self.0 / Self::ROWS
    }

    /// Rectangle covered by `slot` on a canvas of `canvas` size.
    ///
    /// Column and row edges are computed as `i * extent / count`, so the slots
    /// of one grid tile the canvas without gaps or overlap.
    pub fn slot_rect(self, canvas: CanvasSize, slot: usize) -> TilerResult<PixelRect> {
        if slot >= self.0 {
            return Err(TilerError::validation(format!(
                "slot {slot} out of range for a {}-slot grid",
                self.0
            )));
        }

        let cols = self.columns();
        let (row, col) = (slot / cols, slot % cols);
        let edge = |i: usize, extent: u32, count: usize| -> u32 {
            // i <= count, so the result never exceeds extent.
            (u64::from(extent) * i as u64 / count as u64) as u32
        };

        Ok(PixelRect::new(
            edge(col, canvas.width, cols),
            edge(row, canvas.height, Self::ROWS),
            edge(col + 1, canvas.width, cols),
            edge(row + 1, canvas.height, Self::ROWS),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
