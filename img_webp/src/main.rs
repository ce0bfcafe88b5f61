use clap::{Parser, ValueEnum};
use img_webp::{ConvertOptions, Converter, ReportMode, DEFAULT_QUALITY, DEFAULT_ROOT, MAX_METHOD};
use shared_utils::logging::{init_logging, LogConfig};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "img-webp")]
#[command(version, about = "Convert PNG/JPEG images under a directory to WebP", long_about = None)]
struct Cli {
    /// Directory scanned recursively for .png/.jpg/.jpeg files.
    #[arg(value_name = "INPUT", default_value = DEFAULT_ROOT)]
    input: PathBuf,

    /// Lossy WebP quality (0-100).
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Compression effort (0 = fastest, 6 = smallest output).
    #[arg(short, long, default_value_t = MAX_METHOD, value_parser = clap::value_parser!(u8).range(0..=6))]
    method: u8,

    /// Re-encode even when the WebP is newer than its source.
    #[arg(short, long)]
    force: bool,

    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

impl From<OutputFormat> for ReportMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => ReportMode::Human,
            OutputFormat::Json => ReportMode::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::default()
            .with_level(Level::DEBUG)
            .with_stderr_level(Level::INFO)
    } else {
        LogConfig::default()
    };
    if let Err(e) = init_logging("img_webp", log_config) {
        eprintln!("⚠️  Could not initialize logging: {:#}", e);
    }

    let options = ConvertOptions::default()
        .with_quality(cli.quality)
        .with_method(cli.method)
        .with_force(cli.force);

    let converter = Converter::new(cli.input, options)
        .with_report_mode(cli.output.into())
        .with_verbose(cli.verbose);

    if let Err(e) = converter.run() {
        tracing::error!(
            root = %converter.root().display(),
            error = %e,
            category = %e.category(),
            "Run aborted"
        );
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
