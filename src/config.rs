//! Job configuration.
//!
//! A [`TilerConfig`] is everything a run needs apart from the input list. It
//! can be loaded from a JSON job file and then overridden field by field
//! (the CLI does this with its flags).

use std::path::{Path, PathBuf};

use crate::{
    assets::color::parse_color,
    batch::{
        partition::{Page, partition},
        scheduler::{
            BatchOpts, BatchReport, ErrorPolicy, OutputPattern, run_batch, validate_batch,
        },
    },
    compose::{
        format::{Format, HAlign, ResizeMode, VAlign},
        scale::ScaleFilter,
    },
    encode::jpeg::DEFAULT_JPEG_QUALITY,
    foundation::error::{TilerError, TilerResult},
    layout::{
        grid::Grid,
        presets::{DEFAULT_SIZE_PRESET, resolve_size},
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilerConfig {
    /// Images per page; odd values round up to the next even number.
    pub tiles: usize,
    /// Size preset name or `WIDTHxHEIGHT`.
    pub size: String,
    /// Colour name or `#RRGGBB[AA]`.
    pub background: String,
    pub format: Format,
    /// Reverse the inputs before partitioning.
    pub reverse: bool,
    pub output: OutputPattern,
    pub dry_run: bool,
    pub quality: u8,
    pub filter: ScaleFilter,
    pub threads: Option<usize>,
    pub error_policy: ErrorPolicy,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            tiles: 4,
            size: DEFAULT_SIZE_PRESET.to_owned(),
            background: "white".to_owned(),
            format: Format {
                align: HAlign::Center,
                valign: VAlign::Middle,
                resize: ResizeMode::Contain,
                margin: 0,
            },
            reverse: false,
            output: OutputPattern::default(),
            dry_run: false,
            quality: DEFAULT_JPEG_QUALITY,
            filter: ScaleFilter::default(),
            threads: None,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl TilerConfig {
    pub fn from_json(json: &str) -> TilerResult<Self> {
        serde_json::from_str(json).map_err(|e| TilerError::serde(e.to_string()))
    }

    /// Load a JSON job file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> TilerResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("can't read job file '{}': {e}", path.display()))?;
        serde_json::from_str(&json)
            .map_err(|e| TilerError::serde(format!("job file '{}': {e}", path.display())))
    }

    pub fn to_json_pretty(&self) -> TilerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TilerError::serde(e.to_string()))
    }

    pub fn grid(&self) -> TilerResult<Grid> {
        Grid::new(self.tiles)
    }

    /// Resolve names into concrete values shared by every page.
    pub fn batch_opts(&self) -> TilerResult<BatchOpts> {
        Ok(BatchOpts {
            background: parse_color(&self.background)?,
            size: resolve_size(&self.size)?,
            tiles: self.grid()?.slots(),
            format: self.format,
            filter: self.filter,
            output: self.output.clone(),
            quality: self.quality,
            dry_run: self.dry_run,
            threads: self.threads,
            policy: self.error_policy,
        })
    }

    /// Split `images` into pages according to this configuration.
    pub fn plan(&self, images: &[PathBuf]) -> TilerResult<Vec<Page>> {
        partition(images, self.grid()?, self.reverse)
    }

    /// Validate everything that can be checked before touching any input.
    pub fn validate(&self, images: &[PathBuf]) -> TilerResult<(Vec<Page>, BatchOpts)> {
        let opts = self.batch_opts()?;
        let pages = self.plan(images)?;
        validate_batch(&pages, &opts)?;
        Ok((pages, opts))
    }

    /// Partition, composite and write every page.
    pub fn run(&self, images: &[PathBuf]) -> TilerResult<BatchReport> {
        let (pages, opts) = self.validate(images)?;
        run_batch(&pages, &opts)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
