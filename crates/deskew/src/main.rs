//! deskew: batch CLI for straightening scanned document images.
//!
//! Walks an input directory, runs the `deskew-pipeline` on every
//! supported image, and writes one corrected image per input into the
//! output directory. Individual failures are logged and never abort the
//! batch; the only fatal error is being unable to create the output
//! directory.
//!
//! # Usage
//!
//! ```text
//! deskew [OPTIONS] <INPUT_DIR> <OUTPUT_DIR>
//! ```

#![allow(clippy::print_stdout)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use deskew_pipeline::{DeskewConfig, StagedDeskew};
use image::ImageFormat;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

/// Deskew scanned document images in bulk.
///
/// Every supported image found in the input directory is processed
/// independently: the text region is isolated, the background is
/// blackened, and the page is rotated so the text long axis is
/// horizontal. Failures are logged and skipped.
#[derive(Parser)]
#[command(name = "deskew", version)]
struct Cli {
    /// Directory containing the input images.
    input_dir: PathBuf,

    /// Directory to write corrected images into (created if missing).
    output_dir: PathBuf,

    /// Canny edge detector low threshold.
    #[arg(long, default_value_t = DeskewConfig::DEFAULT_CANNY_LOW)]
    canny_low: f32,

    /// Canny edge detector high threshold.
    #[arg(long, default_value_t = DeskewConfig::DEFAULT_CANNY_HIGH)]
    canny_high: f32,

    /// Minimum contour area in square pixels; smaller regions are
    /// discarded as noise.
    #[arg(long, default_value_t = DeskewConfig::DEFAULT_MIN_REGION_AREA)]
    min_area: f64,

    /// Write per-stage debug images (edge map, filtered canvas, mask,
    /// masked image) while processing. These are scratch files and are
    /// removed again when each image's processing scope ends.
    #[arg(long)]
    dump_stages: bool,

    /// Worker pool size. 0 uses all available cores.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the batch summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Extensions used to pre-filter directory entries. Final acceptance is
/// decided by content sniffing, not the extension.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "bmp", "tiff", "tif"];

/// Formats the pipeline accepts after sniffing file content.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

// ---------------------------------------------------------------------------
// Scratch-file lifecycle
// ---------------------------------------------------------------------------

/// Collects scratch filenames created while processing one image and
/// removes them when dropped, on every exit path.
#[derive(Default)]
struct ScratchGuard {
    paths: Vec<PathBuf>,
}

impl ScratchGuard {
    /// Register a path for removal when this guard goes out of scope,
    /// handing it back for immediate use.
    fn register(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed scratch file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove scratch file"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Per-image processing
// ---------------------------------------------------------------------------

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Deskewed image written to the output directory.
    Saved,
    /// File skipped because its sniffed format is unsupported.
    Skipped,
    /// Processing or I/O failed; logged and the batch continued.
    Failed,
}

/// Counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BatchSummary {
    saved: usize,
    skipped: usize,
    failed: usize,
}

/// Sniff file content and return its format if it is in the supported set.
fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .filter(|format| SUPPORTED_FORMATS.contains(format))
}

/// Output path for one input: `<stem>_deskewed.<ext>` in the output
/// directory. Derived from the input's own basename, so concurrent
/// workers never collide.
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| String::from("image"), |s| s.to_string_lossy().into_owned());
    let ext = input.extension().map_or_else(
        || String::from("png"),
        |e| e.to_string_lossy().to_ascii_lowercase(),
    );
    output_dir.join(format!("{stem}_deskewed.{ext}"))
}

/// Write per-stage debug images, registering each with the scratch guard
/// before the write so partial artifacts are cleaned up too.
fn dump_stage_artifacts(
    staged: &StagedDeskew,
    input: &Path,
    output_dir: &Path,
    scratch: &mut ScratchGuard,
) -> anyhow::Result<()> {
    let stem = input
        .file_stem()
        .map_or_else(|| String::from("image"), |s| s.to_string_lossy().into_owned());

    let path = scratch.register(output_dir.join(format!("{stem}_edges.png")));
    staged.edges.save(&path)?;
    let path = scratch.register(output_dir.join(format!("{stem}_filtered.png")));
    staged.filtered.save(&path)?;
    let path = scratch.register(output_dir.join(format!("{stem}_mask.png")));
    staged.mask.save(&path)?;
    let path = scratch.register(output_dir.join(format!("{stem}_masked.png")));
    staged.masked.save(&path)?;
    Ok(())
}

/// Process one input file end to end. Never propagates an error: every
/// failure is logged here and reported through the returned [`Outcome`].
fn process_file(
    input: &Path,
    output_dir: &Path,
    config: &DeskewConfig,
    dump_stages: bool,
) -> Outcome {
    let bytes = match fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %input.display(), error = %e, "failed to read input file");
            return Outcome::Failed;
        }
    };

    if sniff_format(&bytes).is_none() {
        warn!(path = %input.display(), "skipped unsupported image format");
        return Outcome::Skipped;
    }

    // Scratch files registered below are removed when this guard drops,
    // success or failure alike.
    let mut scratch = ScratchGuard::default();

    let staged = match deskew_pipeline::process_staged(&bytes, config) {
        Ok(staged) => staged,
        Err(e) => {
            error!(path = %input.display(), error = %e, "deskewing failed");
            return Outcome::Failed;
        }
    };

    if dump_stages {
        if let Err(e) = dump_stage_artifacts(&staged, input, output_dir, &mut scratch) {
            error!(path = %input.display(), error = %e, "failed to write stage artifacts");
        }
    }

    let out = output_path(input, output_dir);
    match staged.deskewed.save(&out) {
        Ok(()) => {
            info!(
                path = %out.display(),
                angle = staged.angle,
                "saved deskewed image"
            );
            Outcome::Saved
        }
        Err(e) => {
            error!(path = %out.display(), error = %e, "failed to encode result");
            Outcome::Failed
        }
    }
}

// ---------------------------------------------------------------------------
// Batch orchestration
// ---------------------------------------------------------------------------

/// Enumerate candidate files in the input directory by extension.
/// Enumeration order is irrelevant: images are fully independent.
fn candidate_files(input_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read input directory {}", input_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", input_dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Process every candidate over the current rayon pool and tally the
/// outcomes.
fn run_batch(
    files: &[PathBuf],
    output_dir: &Path,
    config: &DeskewConfig,
    dump_stages: bool,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map(|path| process_file(path, output_dir, config, dump_stages))
        .collect();
    for outcome in outcomes {
        match outcome {
            Outcome::Saved => summary.saved += 1,
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Failed => summary.failed += 1,
        }
    }
    summary
}

fn run(cli: &Cli) -> anyhow::Result<BatchSummary> {
    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            cli.output_dir.display()
        )
    })?;

    let config = DeskewConfig {
        canny_low: cli.canny_low,
        canny_high: cli.canny_high,
        min_region_area: cli.min_area,
    };

    let files = candidate_files(&cli.input_dir)?;
    info!(
        input = %cli.input_dir.display(),
        count = files.len(),
        "started processing images"
    );

    let summary = if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build()
            .context("failed to build worker pool")?
            .install(|| run_batch(&files, &cli.output_dir, &config, cli.dump_stages))
    } else {
        run_batch(&files, &cli.output_dir, &config, cli.dump_stages)
    };

    info!(
        saved = summary.saved,
        skipped = summary.skipped,
        failed = summary.failed,
        "finished processing images"
    );
    Ok(summary)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "saved": summary.saved,
                        "skipped": summary.skipped,
                        "failed": summary.failed,
                    })
                );
            }
            // Per-image failures are logged, not fatal: the batch
            // completed, so the process reports success.
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deskew_pipeline::RgbaImage;
    use image::Rgba;

    /// PNG bytes of a white tilted rectangle on black, processable by
    /// the full pipeline.
    fn deskewable_png() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(120, 100, Rgba([0, 0, 0, 255]));
        for y in 30..60 {
            for x in 20..100 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    // --- sniffing ---

    #[test]
    fn sniff_accepts_png_content() {
        assert_eq!(sniff_format(&deskewable_png()), Some(ImageFormat::Png));
    }

    #[test]
    fn sniff_rejects_non_image_content() {
        assert_eq!(sniff_format(b"this is not an image"), None);
    }

    #[test]
    fn sniff_rejects_formats_outside_supported_set() {
        // A GIF signature sniffs as GIF, which is not in the supported set.
        assert_eq!(sniff_format(b"GIF89a\x01\x00\x01\x00"), None);
    }

    // --- naming ---

    #[test]
    fn output_name_derives_from_input_basename() {
        let out = output_path(Path::new("/in/scan_01.JPG"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/scan_01_deskewed.jpg"));
    }

    #[test]
    fn output_name_without_extension_defaults_to_png() {
        let out = output_path(Path::new("/in/scan"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/scan_deskewed.png"));
    }

    // --- scratch lifecycle ---

    #[test]
    fn scratch_guard_removes_registered_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scratch.png");
        fs::write(&file, b"data").unwrap();
        {
            let mut guard = ScratchGuard::default();
            guard.register(file.clone());
        }
        assert!(!file.exists(), "scratch file survived guard drop");
    }

    #[test]
    fn scratch_guard_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut guard = ScratchGuard::default();
        guard.register(dir.path().join("never_written.png"));
        drop(guard); // must not panic
    }

    #[test]
    fn scratch_guard_cleans_up_when_processing_fails_midway() {
        // Register a file, then bail out: the guard must still clean up.
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("partial.png");
        let run = || -> anyhow::Result<()> {
            let mut guard = ScratchGuard::default();
            fs::write(&guard.register(file.clone()), b"partial")?;
            anyhow::bail!("stage failed");
        };
        assert!(run().is_err());
        assert!(!file.exists(), "scratch file survived failure path");
    }

    // --- batch isolation ---

    #[test]
    fn batch_isolates_bad_inputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        // One valid image, one non-image with an image extension, and
        // one file that sniffs as PNG but is corrupt.
        fs::write(input.path().join("good.png"), deskewable_png()).unwrap();
        fs::write(input.path().join("fake.png"), b"not an image at all").unwrap();
        let mut corrupt = b"\x89PNG\r\n\x1a\n".to_vec();
        corrupt.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        fs::write(input.path().join("corrupt.png"), corrupt).unwrap();

        let files = candidate_files(input.path()).unwrap();
        assert_eq!(files.len(), 3);

        let summary = run_batch(&files, output.path(), &DeskewConfig::default(), false);
        assert_eq!(
            summary,
            BatchSummary {
                saved: 1,
                skipped: 1,
                failed: 1,
            }
        );
        assert!(output.path().join("good_deskewed.png").exists());
        // Exactly one output file: bad inputs produce nothing.
        let written = fs::read_dir(output.path()).unwrap().count();
        assert_eq!(written, 1);
    }

    #[test]
    fn stage_dumps_are_cleaned_up() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("page.png"), deskewable_png()).unwrap();

        let files = candidate_files(input.path()).unwrap();
        let summary = run_batch(&files, output.path(), &DeskewConfig::default(), true);
        assert_eq!(summary.saved, 1);

        // Only the final image remains; every stage artifact was scratch.
        assert!(output.path().join("page_deskewed.png").exists());
        assert!(!output.path().join("page_edges.png").exists());
        assert!(!output.path().join("page_filtered.png").exists());
        assert!(!output.path().join("page_mask.png").exists());
        assert!(!output.path().join("page_masked.png").exists());
    }

    #[test]
    fn candidate_files_filter_by_extension() {
        let input = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.png"), b"x").unwrap();
        fs::write(input.path().join("b.TIF"), b"x").unwrap();
        fs::write(input.path().join("notes.txt"), b"x").unwrap();
        fs::write(input.path().join("noext"), b"x").unwrap();

        let mut files = candidate_files(input.path()).unwrap();
        files.sort();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.TIF"]);
    }
}
