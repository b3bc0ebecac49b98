use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};

use super::*;
use crate::{batch::partition::partition, layout::grid::Grid};

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_scheduler").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &Path, name: &str, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(8, 6, Rgba(color))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

fn small_opts(dir: &Path) -> BatchOpts {
    BatchOpts {
        size: CanvasSize {
            width: 40,
            height: 30,
        },
        output: OutputPattern::new(dir.join("page%d.jpg").to_string_lossy().into_owned()),
        threads: Some(2),
        ..BatchOpts::default()
    }
}

fn inputs(dir: &Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| write_png(dir, &format!("in{i}.png"), [(i * 20) as u8, 0, 0, 255]))
        .collect()
}

#[test]
fn output_pattern_replaces_every_placeholder_and_cleans() {
    let p = OutputPattern::new("./out//sheet%d-%d.jpg");
    assert!(p.is_indexed());
    assert_eq!(p.path_for(3), PathBuf::from("out/sheet3-3.jpg"));
    assert_eq!(OutputPattern::default().path_for(0), PathBuf::from("output0.jpg"));
    assert!(!OutputPattern::new("single.jpg").is_indexed());
}

#[test]
fn every_page_is_written_under_its_index() {
    let dir = scratch("written");
    let images = inputs(&dir, 9);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let opts = small_opts(&dir);

    let report = run_batch(&pages, &opts).unwrap();
    assert!(report.is_success());
    assert_eq!(report.pages.len(), 2);

    let expected = [dir.join("page0.jpg"), dir.join("page1.jpg")];
    let written: Vec<&Path> = report.written().collect();
    assert_eq!(
        written,
        expected.iter().map(PathBuf::as_path).collect::<Vec<_>>()
    );
    for path in written {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    assert_eq!(report.pages[0].decoders, vec!["png"; 4]);
    assert_eq!(report.pages[1].decoders, vec!["png"; 4]);
    assert_eq!(report.pages[1].skipped, 1);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = scratch("dry_run");
    let images = inputs(&dir, 4);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let opts = BatchOpts {
        dry_run: true,
        ..small_opts(&dir)
    };

    let report = run_batch(&pages, &opts).unwrap();
    assert_eq!(
        report.pages[0].status,
        PageStatus::DryRun(dir.join("page0.jpg"))
    );
    assert!(!dir.join("page0.jpg").exists());
}

#[test]
fn abort_policy_returns_the_failing_file() {
    let dir = scratch("abort");
    let mut images = inputs(&dir, 8);
    let broken = dir.join("broken.png");
    std::fs::write(&broken, b"not a png").unwrap();
    images[5] = broken.clone();

    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let err = run_batch(&pages, &small_opts(&dir)).unwrap_err();
    match err {
        TilerError::Page { index, path, source } => {
            assert_eq!(index, 1);
            assert_eq!(path, broken);
            assert!(matches!(*source, TilerError::Decode(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn collect_policy_reports_all_failures_in_page_order() {
    let dir = scratch("collect");
    let mut images = inputs(&dir, 12);
    images[1] = dir.join("missing-a.png");
    images[9] = dir.join("missing-b.png");

    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let opts = BatchOpts {
        policy: ErrorPolicy::Collect,
        ..small_opts(&dir)
    };

    let report = run_batch(&pages, &opts).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0], TilerError::Page { index: 0, .. }));
    assert!(matches!(report.failures[1], TilerError::Page { index: 2, .. }));
    assert!(report.failures[0].to_string().contains("missing-a.png"));

    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages[0].status,
        PageStatus::Written(dir.join("page1.jpg"))
    );
}

#[test]
fn page_after_a_failure_stops_before_drawing() {
    let dir = scratch("cancelled");
    let images = inputs(&dir, 8);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let failed = AtomicUsize::new(0);

    let report = run_page(&pages[1], &small_opts(&dir), &failed).unwrap();
    assert_eq!(report.status, PageStatus::Cancelled);
    assert!(report.decoders.is_empty());
    assert!(!dir.join("page1.jpg").exists());
}

#[test]
fn page_before_a_failure_still_completes() {
    let dir = scratch("before_failure");
    let images = inputs(&dir, 8);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let failed = AtomicUsize::new(1);

    let report = run_page(&pages[0], &small_opts(&dir), &failed).unwrap();
    assert_eq!(report.status, PageStatus::Written(dir.join("page0.jpg")));
    assert_eq!(report.decoders.len(), 4);
}

#[test]
fn abort_reports_the_lowest_failing_page_whatever_the_thread_count() {
    let dir = scratch("abort_order");
    let mut images = Vec::new();
    for i in 0..3 {
        let path = dir.join(format!("big{i}.png"));
        RgbaImage::from_pixel(600, 400, Rgba([0, 90, 0, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        images.push(path);
    }
    let broken0 = dir.join("broken0.png");
    let broken1 = dir.join("broken1.png");
    std::fs::write(&broken0, b"not a png").unwrap();
    std::fs::write(&broken1, b"not a png either").unwrap();
    images.push(broken0.clone());
    images.push(broken1);
    images.extend((0..3).map(|i| write_png(&dir, &format!("ok{i}.png"), [0, 0, 200, 255])));

    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    for threads in [1, 2, 4] {
        for _ in 0..3 {
            let opts = BatchOpts {
                threads: Some(threads),
                ..small_opts(&dir)
            };
            match run_batch(&pages, &opts).unwrap_err() {
                TilerError::Page { index, path, .. } => {
                    assert_eq!(index, 0, "threads={threads}");
                    assert_eq!(path, broken0, "threads={threads}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}

#[test]
fn unindexed_pattern_with_several_pages_is_rejected() {
    let dir = scratch("unindexed");
    let images = inputs(&dir, 8);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let opts = BatchOpts {
        output: OutputPattern::new("same.jpg"),
        ..small_opts(&dir)
    };
    assert!(matches!(
        run_batch(&pages, &opts),
        Err(TilerError::Validation(_))
    ));
}

#[test]
fn zero_threads_is_rejected() {
    let dir = scratch("zero_threads");
    let images = inputs(&dir, 4);
    let pages = partition(&images, Grid::new(4).unwrap(), false).unwrap();
    let opts = BatchOpts {
        threads: Some(0),
        ..small_opts(&dir)
    };
    assert!(run_batch(&pages, &opts).is_err());
}
