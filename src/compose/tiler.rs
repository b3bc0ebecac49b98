use std::io::{BufRead, Seek};

use image::{Rgba, RgbaImage};

use crate::{
    assets::decode::decode_image,
    compose::{
        composite::{blit_clipped, fill},
        format::Format,
        scale::ScaleFilter,
    },
    foundation::{
        core::{CanvasSize, PixelRect},
        error::{TilerError, TilerResult},
    },
    layout::grid::Grid,
};

/// Result of a sequential [`Tiler::draw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Decoder that matched the input.
    pub decoder: &'static str,
    /// Slot that was written.
    pub slot: usize,
    /// The written slot was the last one; further sequential draws fail.
    pub page_full: bool,
}

/// One canvas page being filled with images, slot by slot.
///
/// The canvas is allocated and painted with the background colour on
/// construction and never changes size afterwards. Images are composited as
/// an opaque overwrite clipped to their slot.
#[derive(Clone, Debug)]
pub struct Tiler {
    canvas: RgbaImage,
    background: Rgba<u8>,
    size: CanvasSize,
    grid: Grid,
    cursor: usize,
    filter: ScaleFilter,
}

impl Tiler {
    /// Build a page with the default bilinear scaler.
    pub fn new(background: Rgba<u8>, size: CanvasSize, tiles: usize) -> TilerResult<Self> {
        Self::with_filter(background, size, tiles, ScaleFilter::default())
    }

    /// Build a page that resamples with `filter`. Odd tile counts are rounded
    /// up to the next even number.
    pub fn with_filter(
        background: Rgba<u8>,
        size: CanvasSize,
        tiles: usize,
        filter: ScaleFilter,
    ) -> TilerResult<Self> {
        let size = CanvasSize::new(size.width, size.height)?;
        let grid = Grid::new(tiles)?;

        let mut canvas = RgbaImage::new(size.width, size.height);
        fill(&mut canvas, background);

        Ok(Self {
            canvas,
            background,
            size,
            grid,
            cursor: 0,
            filter,
        })
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn filter(&self) -> ScaleFilter {
        self.filter
    }

    /// Next slot a sequential draw will use.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every slot has been used by sequential draws.
    pub fn is_full(&self) -> bool {
        self.cursor >= self.grid.slots()
    }

    /// Canvas rectangle reserved for `slot`, before margins.
    pub fn slot_rect(&self, slot: usize) -> TilerResult<PixelRect> {
        self.grid.slot_rect(self.size, slot)
    }

    /// Decode `reader` and draw it into `slot`, returning the decoder name.
    ///
    /// On error the canvas is left untouched. Positional draws may reuse or
    /// skip slots and do not move the cursor.
    pub fn draw_at<R: BufRead + Seek>(
        &mut self,
        reader: R,
        slot: usize,
        format: Option<&Format>,
    ) -> TilerResult<&'static str> {
        let rect = self.slot_rect(slot)?;
        let decoded = decode_image(reader)?;
        self.compose(&decoded.image, rect, format)?;
        Ok(decoded.decoder)
    }

    /// Draw an already decoded image into `slot`.
    pub fn draw_image_at(
        &mut self,
        img: &RgbaImage,
        slot: usize,
        format: Option<&Format>,
    ) -> TilerResult<()> {
        let rect = self.slot_rect(slot)?;
        self.compose(img, rect, format)
    }

    /// Like [`Tiler::draw_at`] at the cursor, then advance the cursor.
    ///
    /// Fails without decoding once the page is full. A failed draw does not
    /// advance the cursor.
    pub fn draw<R: BufRead + Seek>(
        &mut self,
        reader: R,
        format: Option<&Format>,
    ) -> TilerResult<DrawOutcome> {
        let slot = self.next_slot()?;
        let decoder = self.draw_at(reader, slot, format)?;
        Ok(self.advance(slot, decoder))
    }

    /// Like [`Tiler::draw`] for an already decoded image.
    pub fn draw_image(
        &mut self,
        img: &RgbaImage,
        format: Option<&Format>,
    ) -> TilerResult<DrawOutcome> {
        let slot = self.next_slot()?;
        self.draw_image_at(img, slot, format)?;
        Ok(self.advance(slot, "raw"))
    }

    /// Read-only view of the page, ready to hand to an encoder.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    fn next_slot(&self) -> TilerResult<usize> {
        if self.is_full() {
            return Err(TilerError::validation(format!(
                "page is full: all {} slots have been drawn",
                self.grid.slots()
            )));
        }
        Ok(self.cursor)
    }

    fn advance(&mut self, slot: usize, decoder: &'static str) -> DrawOutcome {
        self.cursor = slot + 1;
        DrawOutcome {
            decoder,
            slot,
            page_full: self.cursor == self.grid.slots(),
        }
    }

    fn compose(
        &mut self,
        img: &RgbaImage,
        rect: PixelRect,
        format: Option<&Format>,
    ) -> TilerResult<()> {
        let format = format.unwrap_or(&Format::DEFAULT);
        let placed = format.resolve(rect, img, self.filter)?;
        let origin = (
            i64::from(placed.slot.x0) + placed.offset.0,
            i64::from(placed.slot.y0) + placed.offset.1,
        );
        blit_clipped(&mut self.canvas, &placed.image, placed.slot, origin);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/tiler.rs"]
mod tests;
