use clap::{Parser, Subcommand, ValueEnum};
use imgshrink::config::{self, ArgumentError, OptimizerConfig};
use imgshrink::imaging::{EncodeSpec, OutputFormat, Quality, TransformPolicy};
use imgshrink::process::{self, RunRequest};
use imgshrink::{logging, output};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "imgshrink")]
#[command(version)]
#[command(about = "Batch-optimize a directory of images for the web")]
#[command(long_about = "\
Batch-optimize a directory of images for the web

Every image directly inside SOURCE (png, jpg, jpeg, tiff, bmp; plus webp when
writing WEBP) is re-encoded into the output directory, by default
SOURCE/optimized_images. Subdirectories are ignored.

  downscale   Shrink images wider than MAX_WIDTH, keeping aspect ratio
  fit         Make every image exactly WIDTH x HEIGHT (scale to cover, crop center)

Fit runs also overwrite .png sources in place with the fitted image, encoded
as PNG. Pass --no-sync-png to leave sources untouched.

Settings are read from SOURCE/imgshrink.toml when present. Run
'imgshrink gen-config' to print a documented one.")]
struct Cli {
    /// Config file to use instead of SOURCE/imgshrink.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the batch report as JSON to this file
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Codec flags shared by both transform commands.
#[derive(clap::Args, Clone)]
struct EncodeArgs {
    /// Output codec (defaults to the config value, jpeg)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Encoder quality 1-100 (defaults: jpeg 85, webp 80)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy)]
enum FormatArg {
    Jpeg,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Webp => OutputFormat::Webp,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Shrink images wider than MAX_WIDTH, preserving aspect ratio
    Downscale {
        /// Directory with the images
        #[arg(default_value = ".")]
        source: PathBuf,
        /// Output directory (default: SOURCE/optimized_images)
        output: Option<PathBuf>,
        /// Width limit in pixels (default: 2048)
        max_width: Option<String>,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Resize and center-crop every image to exactly WIDTH x HEIGHT
    Fit {
        /// Directory with the images
        #[arg(default_value = ".")]
        source: PathBuf,
        /// Output directory (default: SOURCE/optimized_images)
        output: Option<PathBuf>,
        /// Target width in pixels (default: 1024)
        width: Option<String>,
        /// Target height in pixels (default: 1024)
        height: Option<String>,
        #[command(flatten)]
        encode: EncodeArgs,
        /// Leave .png sources untouched
        #[arg(long)]
        no_sync_png: bool,
    },
    /// Print a stock imgshrink.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let request = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Downscale {
            source,
            output,
            max_width,
            encode,
        } => {
            let config = load_config(cli.config.as_deref(), &source)?;
            let max_width = dimension_or_default(
                "max_width",
                max_width.as_deref(),
                config.downscale.max_width,
            );
            build_request(
                &config,
                source,
                output,
                TransformPolicy::MaxWidthDownscale { max_width },
                &encode,
                false,
            )
        }
        Command::Fit {
            source,
            output,
            width,
            height,
            encode,
            no_sync_png,
        } => {
            let config = load_config(cli.config.as_deref(), &source)?;
            let width = dimension_or_default("width", width.as_deref(), config.fit.width);
            let height = dimension_or_default("height", height.as_deref(), config.fit.height);
            let sync = config.fit.sync_png_sources && !no_sync_png;
            build_request(
                &config,
                source,
                output,
                TransformPolicy::FitExact { width, height },
                &encode,
                sync,
            )
        }
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::optimize(&request, Some(tx));
    printer.join().map_err(|_| "output printer panicked")?;
    let report = result?;

    output::print_summary(&report);

    if let Some(path) = cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
    }

    Ok(())
}

fn load_config(
    explicit: Option<&Path>,
    source: &Path,
) -> Result<OptimizerConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(source),
    }
}

/// Parse a numeric positional, falling back to `default` with a warning.
fn dimension_or_default(name: &'static str, raw: Option<&str>, default: u32) -> u32 {
    config::parse_dimension_arg(name, raw, default).unwrap_or_else(|err: ArgumentError| {
        warn!(argument = name, value = %err.value, default, "invalid argument");
        println!("{}", output::format_argument_warning(&err));
        err.default
    })
}

fn build_request(
    config: &OptimizerConfig,
    source: PathBuf,
    output: Option<PathBuf>,
    policy: TransformPolicy,
    encode: &EncodeArgs,
    sync_png_sources: bool,
) -> RunRequest {
    let format = encode
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.encode.format);
    let quality = encode
        .quality
        .map(Quality::new)
        .unwrap_or_else(|| config.quality(format));
    let spec = EncodeSpec {
        format,
        quality,
        lossless: format == OutputFormat::Webp && config.encode.lossless,
    };

    RunRequest {
        output_dir: output.unwrap_or_else(|| source.join(&config.output_dir_name)),
        extensions: config.extensions(format),
        source_dir: source,
        policy,
        encode: spec,
        sync_png_sources,
    }
}
