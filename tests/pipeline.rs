//! End-to-end runs through the public API on generated fixtures.

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage, RgbaImage};
use imgshrink::imaging::{EncodeSpec, Quality, TransformApplied, TransformPolicy};
use imgshrink::output::{format_process_event, format_summary};
use imgshrink::process::{ProcessEvent, RunRequest, optimize};
use imgshrink::types::{FileError, ProcessingResult, SyncOutcome};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 251) as u8, (y % 241) as u8, ((x * y) % 239) as u8])
    })
}

fn write_image(path: &Path, img: DynamicImage, format: ImageFormat) {
    img.save_with_format(path, format).unwrap();
}

fn dims(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

/// `a.png` portrait with alpha, `b.jpg` landscape, plus noise the run must skip.
fn setup_source() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let portrait = RgbaImage::from_fn(500, 1000, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, 200])
    });
    write_image(
        &tmp.path().join("a.png"),
        DynamicImage::ImageRgba8(portrait),
        ImageFormat::Png,
    );
    write_image(
        &tmp.path().join("b.jpg"),
        DynamicImage::ImageRgb8(photo(1200, 600)),
        ImageFormat::Jpeg,
    );
    fs::write(tmp.path().join("readme.txt"), "not an image").unwrap();
    fs::create_dir(tmp.path().join("nested")).unwrap();
    write_image(
        &tmp.path().join("nested/c.jpg"),
        DynamicImage::ImageRgb8(photo(10, 10)),
        ImageFormat::Jpeg,
    );
    tmp
}

#[test]
fn downscale_run_matches_expected_sizes_and_report() {
    let tmp = setup_source();
    let request = RunRequest::new(
        tmp.path(),
        TransformPolicy::MaxWidthDownscale { max_width: 1024 },
        EncodeSpec::jpeg(Quality::new(85)),
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let report = optimize(&request, Some(tx)).unwrap();
    let lines: Vec<String> = rx.iter().flat_map(|e| format_process_event(&e)).collect();

    assert_eq!(report.found(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(dims(&request.output_dir.join("a.jpg")), (500, 1000));
    assert_eq!(dims(&request.output_dir.join("b.jpg")), (1024, 512));
    assert!(!request.output_dir.join("c.jpg").exists());

    assert_eq!(lines[1], "Found 2 images to process...");
    assert_eq!(lines[2], "Copying a.png (already small enough)...");
    assert!(lines[3].starts_with("Saved: a.jpg ("));
    assert!(lines[3].contains("KB) - Reduced by "));
    assert_eq!(lines[4], "Resizing b.jpg...");

    let summary = format_summary(&report);
    assert!(summary[0].starts_with("Processed 2 of 2 images (0 failed), "));
    assert_eq!(
        summary[1],
        format!("Done! Check the '{}' directory.", request.output_dir.display())
    );
}

#[test]
fn fit_run_produces_exact_size_and_syncs_png_source() {
    let tmp = setup_source();
    let jpeg_before = fs::read(tmp.path().join("b.jpg")).unwrap();
    let request = RunRequest::new(
        tmp.path(),
        TransformPolicy::FitExact {
            width: 1024,
            height: 1024,
        },
        EncodeSpec::jpeg(Quality::new(85)),
    );

    let report = optimize(&request, None).unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(dims(&request.output_dir.join("a.jpg")), (1024, 1024));
    assert_eq!(dims(&request.output_dir.join("b.jpg")), (1024, 1024));

    let a = report.successes().find(|r| r.source == "a.png").unwrap();
    assert_eq!(
        a.applied,
        TransformApplied::Fitted {
            width: 1024,
            height: 1024
        }
    );
    assert_eq!(a.source_sync, Some(SyncOutcome::Rewritten));
    assert_eq!(dims(&tmp.path().join("a.png")), (1024, 1024));

    let b = report.successes().find(|r| r.source == "b.jpg").unwrap();
    assert_eq!(b.source_sync, None);
    assert_eq!(fs::read(tmp.path().join("b.jpg")).unwrap(), jpeg_before);

    // Second run: the synced PNG is already fitted, so it is left alone
    let report = optimize(&request, None).unwrap();
    let a = report.successes().find(|r| r.source == "a.png").unwrap();
    assert_eq!(a.source_sync, Some(SyncOutcome::Unchanged));
}

#[test]
fn bad_files_are_reported_and_skipped() {
    let tmp = setup_source();
    fs::write(tmp.path().join("corrupt.png"), b"\x89PNG\r\n\x1a\nbroken").unwrap();
    fs::write(tmp.path().join("empty.bmp"), b"").unwrap();

    let request = RunRequest::new(
        tmp.path(),
        TransformPolicy::MaxWidthDownscale { max_width: 2048 },
        EncodeSpec::webp(Quality::new(80)),
    );
    let (tx, rx) = std::sync::mpsc::channel();
    let report = optimize(&request, Some(tx)).unwrap();
    let events: Vec<ProcessEvent> = rx.iter().collect();

    assert_eq!(report.found(), 4);
    assert_eq!(report.succeeded(), 2);
    assert!(request.output_dir.join("a.webp").exists());
    assert!(request.output_dir.join("b.webp").exists());

    let errors: Vec<(&str, &FileError)> = report
        .results
        .iter()
        .filter_map(|r| match r {
            ProcessingResult::Failure(f) => Some((f.file_name.as_str(), &f.error)),
            ProcessingResult::Success(_) => None,
        })
        .collect();
    assert!(matches!(errors[0], ("corrupt.png", FileError::Decode(_))));
    assert!(matches!(errors[1], ("empty.bmp", FileError::DegenerateInput(_))));

    let error_lines: Vec<String> = events
        .iter()
        .flat_map(format_process_event)
        .filter(|l| l.starts_with("Error processing"))
        .collect();
    assert_eq!(error_lines.len(), 2);
    assert!(error_lines[0].starts_with("Error processing corrupt.png: "));
}

#[test]
fn report_serializes_to_json() {
    let tmp = setup_source();
    let request = RunRequest::new(
        tmp.path(),
        TransformPolicy::MaxWidthDownscale { max_width: 1024 },
        EncodeSpec::jpeg(Quality::new(70)),
    );
    let report = optimize(&request, None).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[0]["source"], "a.png");
    assert_eq!(results[0]["applied"]["kind"], "unchanged");
    assert_eq!(results[1]["applied"]["kind"], "resized");
    assert_eq!(results[1]["applied"]["width"], 1024);
}
