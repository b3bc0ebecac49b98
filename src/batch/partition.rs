use std::path::PathBuf;

use crate::{
    foundation::error::{TilerError, TilerResult},
    layout::grid::Grid,
};

/// An ordered group of inputs destined for one output page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T = PathBuf> {
    /// 0-based page index; names the output artifact.
    pub index: usize,
    /// Inputs in drawing order.
    pub images: Vec<T>,
}

/// Split `images` into pages of `grid.slots()` inputs.
///
/// There are `len / slots` pages. When the inputs do not divide evenly the
/// last page absorbs the leftovers instead of producing a short trailing
/// page, so 9 images on a 4-slot grid give pages of 4 and 5.
///
/// With `reverse` the whole sequence is reversed first, which mirrors both
/// the page order and the order inside each page.
pub fn partition<T: Clone>(
    images: &[T],
    grid: Grid,
    reverse: bool,
) -> TilerResult<Vec<Page<T>>> {
    let per_page = grid.slots();
    let n = images.len();
    if n < per_page {
        return Err(TilerError::validation(format!(
            "at least {per_page} images are needed for a {per_page}-tile page, got {n}"
        )));
    }

    let mut ordered = images.to_vec();
    if reverse {
        ordered.reverse();
    }

    let pages = n / per_page;
    let mut out = Vec::with_capacity(pages);
    let mut rest = ordered.into_iter();
    for index in 0..pages {
        let take = if index + 1 == pages {
            per_page + n % per_page
        } else {
            per_page
        };
        out.push(Page {
            index,
            images: rest.by_ref().take(take).collect(),
        });
    }

    tracing::debug!(images = n, pages, per_page, reverse, "partitioned inputs");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/partition.rs"]
mod tests;
