//! Compute the normalized signed difference of two grayscale images and
//! write it as a 16-bit PNG, an 8-bit PNG, and a color-mapped PNG.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use isocell_pipeline::diff::load_grayscale;
use isocell_pipeline::{ColormapKind, DiffConfig, DiffResult, diff_images};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Colormap choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColormapArg {
    /// Blue to red ramp.
    Jet,
    /// Plain grayscale.
    Gray,
}

impl From<ColormapArg> for ColormapKind {
    fn from(arg: ColormapArg) -> Self {
        match arg {
            ColormapArg::Jet => Self::Jet,
            ColormapArg::Gray => Self::Gray,
        }
    }
}

/// Difference `SECOND − FIRST` of two grayscale images, stretched to the
/// full output range.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Reference image.
    #[arg(default_value = "images/3/A.pgm")]
    first: PathBuf,

    /// Image compared against the reference.
    #[arg(default_value = "images/3/B.pgm")]
    second: PathBuf,

    /// Directory the results are written to (created if missing).
    #[arg(long, default_value = "images/3/results")]
    output_dir: PathBuf,

    /// Lookup table for `colorDiff.png`.
    #[arg(long, value_enum, default_value_t = ColormapArg::Jet)]
    colormap: ColormapArg,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> DiffConfig {
        DiffConfig {
            colormap: self.colormap.into(),
        }
    }
}

/// Write the three result images into `dir`, returning their paths.
fn write_results(dir: &Path, result: &DiffResult) -> Result<[PathBuf; 3], Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {e}", dir.display()))?;

    let wide = dir.join("diff.png");
    result.normalized.to_luma16().save(&wide)?;

    let quantized = dir.join("intDiff.png");
    result.quantized.save(&quantized)?;

    let colored = dir.join("colorDiff.png");
    result.colored.save(&colored)?;

    Ok([wide, quantized, colored])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.config();
    let first = load_grayscale(&args.first)?;
    let second = load_grayscale(&args.second)?;
    info!(
        first = %args.first.display(),
        second = %args.second.display(),
        width = first.width(),
        height = first.height(),
        "loaded images"
    );

    let result = diff_images(&first, &second, config.colormap)?;

    for path in write_results(&args.output_dir, &result)? {
        info!(path = %path.display(), "wrote image");
        println!("{}", path.display());
    }

    Ok(())
}
