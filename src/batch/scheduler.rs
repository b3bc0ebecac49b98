use std::{
    path::{Component, Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use image::Rgba;
use rayon::prelude::*;

use crate::{
    assets::decode::{decode_image, open_reader},
    batch::partition::Page,
    compose::{format::Format, scale::ScaleFilter, tiler::Tiler},
    encode::jpeg::{DEFAULT_JPEG_QUALITY, write_jpeg},
    foundation::{
        core::CanvasSize,
        error::{TilerError, TilerResult},
    },
};

/// Value of the shared failure marker while no page has failed.
pub const NO_FAILURE: usize = usize::MAX;

/// What to do when a page fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the batch: pages after a failed one skip their remaining work and
    /// the failure of the lowest page index is returned. Pages before it still
    /// run to completion, so the reported failure does not depend on thread
    /// timing.
    #[default]
    Abort,
    /// Run every page and report all failures in page order.
    Collect,
}

/// Output file name pattern; every `%d` is replaced by the page index.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OutputPattern(String);

impl OutputPattern {
    pub const PLACEHOLDER: &'static str = "%d";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The pattern produces a distinct name per page.
    pub fn is_indexed(&self) -> bool {
        self.0.contains(Self::PLACEHOLDER)
    }

    /// Output path for page `index`, with redundant separators and `.`
    /// components removed.
    pub fn path_for(&self, index: usize) -> PathBuf {
        let raw = self.0.replace(Self::PLACEHOLDER, &index.to_string());
        let cleaned: PathBuf = Path::new(&raw)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if cleaned.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            cleaned
        }
    }
}

impl Default for OutputPattern {
    fn default() -> Self {
        Self::new("output%d.jpg")
    }
}

/// Everything a page unit needs besides its own inputs. Shared read-only by
/// all pages of a batch.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    pub background: Rgba<u8>,
    pub size: CanvasSize,
    pub tiles: usize,
    pub format: Format,
    pub filter: ScaleFilter,
    pub output: OutputPattern,
    pub quality: u8,
    /// Composite every page but write nothing.
    pub dry_run: bool,
    /// Worker threads; `None` uses the rayon default.
    pub threads: Option<usize>,
    pub policy: ErrorPolicy,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            background: Rgba([255, 255, 255, 255]),
            size: CanvasSize {
                width: 2550,
                height: 3300,
            },
            tiles: 4,
            format: Format::default(),
            filter: ScaleFilter::default(),
            output: OutputPattern::default(),
            quality: DEFAULT_JPEG_QUALITY,
            dry_run: false,
            threads: None,
            policy: ErrorPolicy::default(),
        }
    }
}

/// Final state of one page unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageStatus {
    /// Encoded and written to the path.
    Written(PathBuf),
    /// Composited only; the path is where it would have gone.
    DryRun(PathBuf),
    /// Stopped early because an earlier page failed.
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageReport {
    pub index: usize,
    /// Decoder used per drawn image, in drawing order.
    pub decoders: Vec<&'static str>,
    /// Inputs that were decoded but found no free slot.
    pub skipped: usize,
    pub status: PageStatus,
}

/// Outcome of a whole batch, in page order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages: Vec<PageReport>,
    /// Page failures ([`TilerError::Page`]), lowest page index first.
    pub failures: Vec<TilerError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Paths written to disk, in page order.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.pages.iter().filter_map(|p| match &p.status {
            PageStatus::Written(path) => Some(path.as_path()),
            _ => None,
        })
    }
}

/// Check options that would otherwise only fail deep inside a page unit.
pub fn validate_batch(pages: &[Page], opts: &BatchOpts) -> TilerResult<()> {
    if pages.len() > 1 && !opts.output.is_indexed() {
        return Err(TilerError::validation(format!(
            "output pattern \"{}\" has no {} placeholder but {} pages will be produced",
            opts.output.as_str(),
            OutputPattern::PLACEHOLDER,
            pages.len()
        )));
    }
    if !(1..=100).contains(&opts.quality) {
        return Err(TilerError::validation(format!(
            "jpeg quality must be within 1..=100, got {}",
            opts.quality
        )));
    }
    CanvasSize::new(opts.size.width, opts.size.height)?;
    Ok(())
}

/// Run every page as its own unit of work on a rayon pool and wait for all
/// of them.
///
/// Pages share nothing mutable; each builds its own [`Tiler`]. The page index
/// alone decides the output name, whatever order pages finish in.
pub fn run_batch(pages: &[Page], opts: &BatchOpts) -> TilerResult<BatchReport> {
    validate_batch(pages, opts)?;
    let pool = build_thread_pool(opts.threads)?;
    let failed = AtomicUsize::new(NO_FAILURE);

    let results = pool.install(|| {
        pages
            .par_iter()
            .map(|page| {
                let res = run_page(page, opts, &failed);
                if res.is_err() && opts.policy == ErrorPolicy::Abort {
                    failed.fetch_min(page.index, Ordering::Relaxed);
                }
                res
            })
            .collect::<Vec<_>>()
    });

    let mut report = BatchReport::default();
    for res in results {
        match res {
            Ok(page) => report.pages.push(page),
            Err(e) => report.failures.push(e),
        }
    }

    if opts.policy == ErrorPolicy::Abort && !report.failures.is_empty() {
        return Err(report.failures.remove(0));
    }
    Ok(report)
}

/// Composite one page and persist it.
///
/// `failed` holds the lowest page index known to have failed
/// ([`NO_FAILURE`] when none has). The page stops early, reporting
/// [`PageStatus::Cancelled`], once an earlier page has failed.
///
/// Inputs beyond the last slot (the grown final page) are still opened and
/// decoded so that broken files fail the same way everywhere, but they are
/// not drawn.
#[tracing::instrument(skip_all, fields(page = page.index))]
pub fn run_page(page: &Page, opts: &BatchOpts, failed: &AtomicUsize) -> TilerResult<PageReport> {
    let index = page.index;
    let out = opts.output.path_for(index);
    let cancelled = || failed.load(Ordering::Relaxed) < index;
    tracing::debug!(images = ?page.images, "generating tiled image");

    let mut tiler = Tiler::with_filter(opts.background, opts.size, opts.tiles, opts.filter)
        .map_err(|e| e.in_page(index, &out))?;
    let mut report = PageReport {
        index,
        decoders: Vec::with_capacity(page.images.len()),
        skipped: 0,
        status: PageStatus::Cancelled,
    };

    for path in &page.images {
        if cancelled() {
            tracing::debug!("cancelled");
            return Ok(report);
        }

        let reader = open_reader(path).map_err(|e| e.in_page(index, path))?;
        if tiler.is_full() {
            decode_image(reader).map_err(|e| e.in_page(index, path))?;
            tracing::warn!(path = %path.display(), "no free slot left on page, image skipped");
            report.skipped += 1;
            continue;
        }

        let drawn = tiler
            .draw(reader, Some(&opts.format))
            .map_err(|e| e.in_page(index, path))?;
        tracing::debug!(
            path = %path.display(),
            slot = drawn.slot,
            decoder = drawn.decoder,
            "image written"
        );
        report.decoders.push(drawn.decoder);
    }

    if opts.dry_run {
        tracing::info!(path = %out.display(), "dry run, tiled image not written");
        report.status = PageStatus::DryRun(out);
        return Ok(report);
    }
    if cancelled() {
        return Ok(report);
    }

    write_jpeg(tiler.canvas(), opts.background, opts.quality, &out)
        .map_err(|e| e.in_page(index, &out))?;
    tracing::info!(path = %out.display(), "tiled image written");
    report.status = PageStatus::Written(out);
    Ok(report)
}

fn build_thread_pool(threads: Option<usize>) -> TilerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TilerError::validation(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TilerError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/scheduler.rs"]
mod tests;
