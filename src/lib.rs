//! Tiler composes a sequence of images into fixed-size canvas pages.
//!
//! Each page is a canvas split into an even number of slots (two rows). Input
//! images are placed into the slots in order, optionally scaled to fit, and
//! every finished page is written as one JPEG.
//!
//! # Pipeline overview
//!
//! 1. **Partition**: the ordered inputs are split into pages ([`partition`]);
//!    the last page absorbs any remainder.
//! 2. **Compose**: each page gets its own [`Tiler`], which decodes every input
//!    and composites it into the next slot after resolving its [`Format`].
//! 3. **Schedule**: pages run concurrently on a rayon pool ([`run_batch`]);
//!    page `i` is always written to output `i`.
//!
//! [`TilerConfig`] ties the steps together for callers that start from names
//! (size presets, colour names) rather than concrete values.
#![forbid(unsafe_code)]

mod assets;
mod batch;
mod compose;
mod config;
mod encode;
mod foundation;
mod layout;

pub use assets::color::parse_color;
pub use assets::decode::{DecodedImage, decode_image, open_image, open_reader};
pub use batch::partition::{Page, partition};
pub use batch::scheduler::{
    BatchOpts, BatchReport, ErrorPolicy, NO_FAILURE, OutputPattern, PageReport, PageStatus,
    run_batch, run_page, validate_batch,
};
pub use compose::composite::{blit_clipped, fill};
pub use compose::format::{Format, HAlign, Placement, ResizeMode, VAlign};
pub use compose::scale::{ScaleFilter, scale_by, scale_factor, scale_to_box, scaled_dimensions};
pub use compose::tiler::{DrawOutcome, Tiler};
pub use config::TilerConfig;
pub use encode::jpeg::{
    DEFAULT_JPEG_QUALITY, encode_jpeg, ensure_parent_dir, flatten_over, write_jpeg,
};
pub use foundation::core::{CanvasSize, PixelRect};
pub use foundation::error::{TilerError, TilerResult};
pub use layout::grid::Grid;
pub use layout::presets::{DEFAULT_SIZE_PRESET, SIZE_PRESETS, resolve_size, size_preset};
