use std::{
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use clap::Parser;
use tiler::{
    BatchReport, ErrorPolicy, HAlign, OutputPattern, ResizeMode, ScaleFilter, TilerConfig, VAlign,
};

#[derive(Parser, Debug)]
#[command(name = "tiler", version, about = "Compose images into tiled JPEG pages")]
struct Cli {
    /// Verbose output.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Debug output (implies --verbose).
    #[arg(long)]
    debug: bool,

    /// JSON job file. Flags given on the command line override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of tiles per page, at least 2. Odd counts round up.
    #[arg(short = 'n', long)]
    tiles: Option<usize>,

    /// Output size: a preset (letter72, letter200, letter300, hletter*) or WIDTHxHEIGHT.
    #[arg(long)]
    size: Option<String>,

    /// Output background colour: a colour name or #RRGGBB[AA].
    #[arg(long = "bg")]
    background: Option<String>,

    /// Resizing mode: none, auto, contain or cover.
    #[arg(long)]
    resize: Option<String>,

    /// Horizontal alignment: left, center or right.
    #[arg(long, value_parser = parse_halign)]
    align: Option<HAlign>,

    /// Vertical alignment: top, middle or bottom.
    #[arg(long, value_parser = parse_valign)]
    valign: Option<VAlign>,

    /// Inset in pixels applied to every side of each tile.
    #[arg(long)]
    margin: Option<u32>,

    /// Scaling filter: nearest, bilinear, catmull-rom or lanczos3.
    #[arg(long, value_parser = parse_filter)]
    filter: Option<ScaleFilter>,

    /// Tile the given images in reverse order.
    #[arg(long)]
    reverse: bool,

    /// Output file; %d is replaced by the page number.
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// JPEG quality, 1-100.
    #[arg(long)]
    quality: Option<u8>,

    /// Worker threads (defaults to one per CPU).
    #[arg(long)]
    threads: Option<usize>,

    /// Keep processing the other pages when one fails.
    #[arg(long)]
    keep_going: bool,

    /// Process the images but don't write to disk.
    #[arg(long)]
    dry_run: bool,

    /// Print the resolved job as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Images to tile.
    #[arg(required_unless_present = "print_config")]
    images: Vec<PathBuf>,
}

impl Cli {
    fn apply(&self, cfg: &mut TilerConfig) {
        if let Some(tiles) = self.tiles {
            cfg.tiles = tiles;
        }
        if let Some(size) = &self.size {
            cfg.size = size.clone();
        }
        if let Some(bg) = &self.background {
            cfg.background = bg.clone();
        }
        if let Some(resize) = &self.resize {
            cfg.format.resize = ResizeMode::from_name(resize);
        }
        if let Some(align) = self.align {
            cfg.format.align = align;
        }
        if let Some(valign) = self.valign {
            cfg.format.valign = valign;
        }
        if let Some(margin) = self.margin {
            cfg.format.margin = margin;
        }
        if let Some(filter) = self.filter {
            cfg.filter = filter;
        }
        if let Some(output) = &self.output {
            cfg.output = OutputPattern::new(output.clone());
        }
        if let Some(quality) = self.quality {
            cfg.quality = quality;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }
        if self.reverse {
            cfg.reverse = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.keep_going {
            cfg.error_policy = ErrorPolicy::Collect;
        }
    }
}

fn parse_halign(s: &str) -> Result<HAlign, String> {
    s.parse().map_err(|e: tiler::TilerError| e.to_string())
}

fn parse_valign(s: &str) -> Result<VAlign, String> {
    s.parse().map_err(|e: tiler::TilerError| e.to_string())
}

fn parse_filter(s: &str) -> Result<ScaleFilter, String> {
    s.parse().map_err(|e: tiler::TilerError| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose || cli.debug, cli.debug);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tiler: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let start = Instant::now();

    let mut cfg = match &cli.config {
        Some(path) => TilerConfig::from_path(path)?,
        None => TilerConfig::default(),
    };
    cli.apply(&mut cfg);

    if cli.print_config {
        println!("{}", cfg.to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    let report = cfg.run(&cli.images)?;
    for failure in &report.failures {
        eprintln!("tiler: {failure}");
    }

    if cli.verbose || cli.debug {
        print_summary(&cfg, &report, cli.images.len(), start.elapsed());
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(cfg: &TilerConfig, report: &BatchReport, images: usize, elapsed: Duration) {
    println!("Used options:");
    if cfg.reverse {
        println!("  Reverse mode: true");
    }
    if cfg.dry_run {
        println!("  Dry run: true");
    }
    println!("  Name: {}", cfg.output.as_str());
    println!("  Size: {}", cfg.size);
    println!("  Background color: {}", cfg.background);
    let slots = cfg.grid().map_or(cfg.tiles, |grid| grid.slots());
    if slots == cfg.tiles {
        println!("  Tiles: {slots}");
    } else {
        println!("  Tiles: {slots} (requested {})", cfg.tiles);
    }
    println!("    Resize mode: {}", cfg.format.resize);
    println!("    Alignment: {}", cfg.format.align);
    println!("    Vertical alignment: {}", cfg.format.valign);
    println!("    Margin: {}", cfg.format.margin);
    println!("    Filter: {}", cfg.filter);

    let files = report.written().count();
    println!("\n{files} files generated from {images} images in {elapsed:.2?}");
}
