//! Converter Module
//!
//! Sequential batch driver: scan, staleness check, convert, report. One file
//! is fully processed before the next starts; a failing file is reported and
//! the batch moves on.

use crate::conversion_api::{convert_one, ConvertOptions, WEBP_EXTENSION};
use console::style;
use shared_utils::{
    check_dangerous_directory, determine_output_path, discover, format_directory_missing,
    format_no_images, print_result_line, print_simple_summary, should_convert, BatchResult,
    ConversionResult, ConversionStatus, ImageFile, JsonReport, ScanEntry, ScanError,
};
use std::path::{Path, PathBuf};

/// Directory scanned when no input is given.
pub const DEFAULT_ROOT: &str = "assets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    #[default]
    Human,
    Json,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Root directory does not exist; nothing was touched.
    DirectoryMissing,
    /// Root exists but holds no PNG/JPEG files; nothing was touched.
    NoImages,
    Completed {
        summary: BatchResult,
        results: Vec<ConversionResult>,
    },
}

#[derive(Debug, Clone)]
pub struct Converter {
    root: PathBuf,
    options: ConvertOptions,
    report: ReportMode,
    verbose: bool,
}

impl Converter {
    pub fn new(root: impl Into<PathBuf>, options: ConvertOptions) -> Self {
        Self {
            root: root.into(),
            options,
            report: ReportMode::Human,
            verbose: false,
        }
    }

    pub fn with_report_mode(mut self, report: ReportMode) -> Self {
        self.report = report;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn discover(&self) -> Result<Vec<ScanEntry>, ScanError> {
        discover(&self.root)
    }

    /// Destination for `source`: same directory and stem, `.webp` extension.
    pub fn destination_for(source: &Path) -> PathBuf {
        determine_output_path(source, WEBP_EXTENSION)
    }

    pub fn should_convert(&self, source: &ImageFile, destination: &Path) -> bool {
        self.options.force || should_convert(source, destination)
    }

    pub fn convert_one(&self, source: &Path, destination: &Path) -> ConversionResult {
        convert_one(source, destination, &self.options)
    }

    /// Plain-text notice. Goes to stderr in JSON mode so stdout stays parseable.
    fn notice(&self, message: &str) {
        match self.report {
            ReportMode::Human => println!("{}", message),
            ReportMode::Json => eprintln!("{}", message),
        }
    }

    fn process_file(&self, file: &ImageFile) -> ConversionResult {
        let destination = Self::destination_for(&file.path);
        if self.should_convert(file, &destination) {
            self.convert_one(&file.path, &destination)
        } else {
            tracing::debug!(path = %file.path.display(), "WebP is newer than source, skipping");
            ConversionResult::skipped_existing(file, &destination)
        }
    }

    /// Processes one scan entry and folds the outcome into `summary`.
    fn process(&self, entry: &ScanEntry, summary: &mut BatchResult) -> ConversionResult {
        let result = match entry {
            ScanEntry::Image(file) => self.process_file(file),
            ScanEntry::Unreadable { path, error } => {
                ConversionResult::failed(path, &Self::destination_for(path), error)
            }
        };

        match result.status {
            ConversionStatus::Converted => {
                summary.converted(result.input_size, result.output_size.unwrap_or(0))
            }
            ConversionStatus::SkippedExisting => summary.skip(),
            ConversionStatus::Failed => summary.fail(
                result.input_path.clone(),
                result.error.clone().unwrap_or_default(),
            ),
        }

        if self.report == ReportMode::Human {
            print_result_line(&result, self.verbose);
        }
        result
    }

    /// Runs the whole batch.
    ///
    /// A missing root or an empty scan is not an error: a message is printed
    /// and the matching `RunOutcome` returned. Only a root that cannot be
    /// scanned at all (protected, not a directory) is an `Err`.
    pub fn run(&self) -> Result<RunOutcome, ScanError> {
        let _span = tracing::info_span!("run", root = %self.root.display()).entered();

        check_dangerous_directory(&self.root)?;

        let entries = match self.discover() {
            Ok(entries) => entries,
            Err(ScanError::DirectoryNotFound(path)) => {
                tracing::warn!(root = %path.display(), "Input directory not found");
                self.notice(&style(format_directory_missing(&path)).red().to_string());
                return Ok(RunOutcome::DirectoryMissing);
            }
            Err(e) => return Err(e),
        };

        if entries.is_empty() {
            tracing::info!("No images found");
            self.notice(&format_no_images(&self.root));
            return Ok(RunOutcome::NoImages);
        }

        if self.report == ReportMode::Human {
            println!("Found {} images to convert...\n", entries.len());
        }
        tracing::info!(
            count = entries.len(),
            quality = self.options.quality,
            method = self.options.method,
            force = self.options.force,
            "Starting conversion"
        );

        let mut summary = BatchResult::new();
        let results: Vec<ConversionResult> = entries
            .iter()
            .map(|entry| self.process(entry, &mut summary))
            .collect();

        match self.report {
            ReportMode::Human => print_simple_summary(&summary),
            ReportMode::Json => {
                match serde_json::to_string_pretty(&JsonReport::new(&summary, &results)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!(error = %e, "Failed to serialize JSON report"),
                }
            }
        }

        tracing::info!(
            total = summary.total(),
            converted = summary.converted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Conversion complete"
        );

        Ok(RunOutcome::Completed { summary, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;

    fn write_png_with_alpha(path: &Path) {
        RgbaImage::from_fn(96, 96, |x, y| Rgba([x as u8, y as u8, 200, (x + y) as u8]))
            .save(path)
            .expect("save png");
    }

    fn write_jpeg(path: &Path) {
        RgbImage::from_fn(40, 30, |x, y| Rgb([x as u8 * 3, y as u8 * 5, 90]))
            .save_with_format(path, image::ImageFormat::Jpeg)
            .expect("save jpeg");
    }

    fn set_mtime(path: &Path, secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).expect("mtime");
    }

    fn completed(outcome: RunOutcome) -> (BatchResult, Vec<ConversionResult>) {
        match outcome {
            RunOutcome::Completed { summary, results } => (summary, results),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    fn dir_listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_destination_extension_is_canonical() {
        for name in ["a.png", "a.PNG", "a.jpg", "a.JPG", "a.jpeg", "a.JPEG"] {
            let dest = Converter::destination_for(&Path::new("assets").join(name));
            assert_eq!(dest, Path::new("assets").join("a.webp"), "source {}", name);
        }
    }

    #[test]
    fn test_png_with_alpha_is_converted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).expect("mkdir");
        write_png_with_alpha(&assets.join("a.png"));

        let outcome = Converter::new(&assets, ConvertOptions::default())
            .run()
            .expect("run");
        let (summary, results) = completed(outcome);

        assert!(assets.join("a.webp").exists());
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped_total(), 0);

        let original = fs::metadata(assets.join("a.png")).unwrap().len() as f64;
        let new = fs::metadata(assets.join("a.webp")).unwrap().len() as f64;
        let expected = (original - new) / original * 100.0;
        let reported = results[0].size_reduction.expect("reduction");
        assert_eq!(format!("{:.1}", reported), format!("{:.1}", expected));
    }

    #[test]
    fn test_newer_webp_is_skipped_and_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).expect("mkdir");
        let src = assets.join("b.jpg");
        let dst = assets.join("b.webp");
        write_jpeg(&src);
        fs::write(&dst, b"existing webp bytes").expect("write");
        set_mtime(&src, 1_600_000_000);
        set_mtime(&dst, 1_700_000_000);
        let before = fs::metadata(&dst).unwrap();

        let (summary, results) = completed(
            Converter::new(&assets, ConvertOptions::default())
                .run()
                .expect("run"),
        );

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.converted, 0);
        assert_eq!(results[0].status, ConversionStatus::SkippedExisting);

        let after = fs::metadata(&dst).unwrap();
        assert_eq!(after.len(), before.len());
        assert_eq!(
            FileTime::from_last_modification_time(&after),
            FileTime::from_last_modification_time(&before)
        );
        assert_eq!(fs::read(&dst).unwrap(), b"existing webp bytes");
    }

    #[test]
    fn test_stale_webp_is_reconverted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("c.jpeg");
        let dst = dir.path().join("c.webp");
        write_jpeg(&src);
        fs::write(&dst, b"stale").expect("write");
        set_mtime(&src, 1_700_000_000);
        set_mtime(&dst, 1_700_000_000);

        let (summary, _) = completed(
            Converter::new(dir.path(), ConvertOptions::default())
                .run()
                .expect("run"),
        );

        assert_eq!(summary.converted, 1);
        assert_ne!(fs::read(&dst).unwrap(), b"stale");
    }

    #[test]
    fn test_force_ignores_staleness() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("d.png");
        let dst = dir.path().join("d.webp");
        write_png_with_alpha(&src);
        fs::write(&dst, b"old").expect("write");
        set_mtime(&src, 1_600_000_000);
        set_mtime(&dst, 1_700_000_000);

        let converter = Converter::new(dir.path(), ConvertOptions::default().with_force(true));
        let scanned = ImageFile::from_path(&src).expect("stat");
        assert!(converter.should_convert(&scanned, &dst));
        let (summary, _) = completed(converter.run().expect("run"));
        assert_eq!(summary.converted, 1);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("e.png");
        write_png_with_alpha(&src);
        set_mtime(&src, 1_600_000_000);

        let converter = Converter::new(dir.path(), ConvertOptions::default());
        let (first, _) = completed(converter.run().expect("first run"));
        assert_eq!(first.converted, 1);
        assert_eq!(dir_listing(dir.path()), vec!["e.png", "e.webp"]);

        let (second, _) = completed(converter.run().expect("second run"));
        assert_eq!(second.converted, 0);
        assert_eq!(second.skipped, 1);
    }

    #[test]
    fn test_empty_directory_reports_no_images() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).expect("mkdir");
        fs::write(assets.join("readme.txt"), b"hi").expect("write");

        let outcome = Converter::new(&assets, ConvertOptions::default())
            .run()
            .expect("run");
        assert!(matches!(outcome, RunOutcome::NoImages));
        assert_eq!(dir_listing(&assets), vec!["readme.txt"]);
    }

    #[test]
    fn test_missing_directory_reports_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = dir.path().join("assets");

        let outcome = Converter::new(&assets, ConvertOptions::default())
            .run()
            .expect("run");
        assert!(matches!(outcome, RunOutcome::DirectoryMissing));
        assert!(!assets.exists());
        assert!(dir_listing(dir.path()).is_empty());
    }

    #[test]
    fn test_root_is_a_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("assets");
        fs::write(&file, b"x").expect("write");

        let err = Converter::new(&file, ConvertOptions::default())
            .run()
            .expect_err("file root");
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_corrupt_file_does_not_stop_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(dir.path().join("broken.png"), b"definitely not an image").expect("write");
        write_jpeg(&nested.join("ok.JPG"));

        let (summary, results) = completed(
            Converter::new(dir.path(), ConvertOptions::default())
                .with_report_mode(ReportMode::Json)
                .run()
                .expect("run"),
        );

        assert_eq!(results.len(), 2);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped_total(), 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].0.ends_with("broken.png"));
        assert!(nested.join("ok.webp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_reported_as_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png_with_alpha(&dir.path().join("ok.png"));
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("dangling.png"))
            .expect("symlink");

        let (summary, results) = completed(
            Converter::new(dir.path(), ConvertOptions::default())
                .run()
                .expect("run"),
        );

        assert_eq!(results.len(), 2);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped_total(), 1);
        assert_eq!(summary.total(), 2);
        assert!(summary.errors[0].0.ends_with("dangling.png"));

        let failed = results
            .iter()
            .find(|r| r.status == ConversionStatus::Failed)
            .expect("failed result");
        assert!(failed.input_path.ends_with("dangling.png"));
        assert!(failed.output_path.ends_with("dangling.webp"));
        assert!(failed.error.is_some());
        assert!(!dir.path().join("dangling.webp").exists());
    }

    #[test]
    fn test_json_mode_early_exits_keep_outcome() {
        let dir = tempfile::tempdir().expect("tempdir");
        let converter = Converter::new(dir.path().join("assets"), ConvertOptions::default())
            .with_report_mode(ReportMode::Json);
        assert!(matches!(converter.run().expect("run"), RunOutcome::DirectoryMissing));

        let converter =
            Converter::new(dir.path(), ConvertOptions::default()).with_report_mode(ReportMode::Json);
        assert!(matches!(converter.run().expect("run"), RunOutcome::NoImages));
    }
}
