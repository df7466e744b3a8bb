//! Classify every cell of a scalar field and render the contour mosaic
//! twice: once with edge-midpoint crossings, once interpolated.

use std::path::{Path, PathBuf};

use clap::Parser;
use isocell_export::{SvgMetadata, SvgStyle, to_svg};
use isocell_pipeline::{ClassifierConfig, JsonReport, Report, ScalarField, run_classifier};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Classify the cells of a scalar field with marching squares and the
/// asymptotic decider, then write the contour mosaics.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Iso-value the samples are thresholded against.
    #[arg(long)]
    alpha: Option<f64>,

    /// JSON file holding the field as an array of rows. Defaults to the
    /// built-in 4x4 demonstration field.
    #[arg(long, value_name = "FILE.json")]
    field: Option<PathBuf>,

    /// Directory the mosaics are written to (created if missing).
    #[arg(long, default_value = "images/4/results")]
    output_dir: PathBuf,

    /// Also write the interpolated contours as `contours.svg`.
    #[arg(long)]
    svg: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Treat decider results within this distance of zero as `D = 0`.
    #[arg(long, value_name = "EPS")]
    decider_tolerance: Option<f64>,

    /// Radius of the corner markers in pixels (0 disables them).
    #[arg(long, value_name = "PX")]
    corner_radius: Option<u32>,

    /// Complete classifier configuration as JSON; overrides the
    /// individual flags.
    #[arg(long, value_name = "JSON")]
    config_json: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Combine defaults, individual flags, and `--config-json`.
    fn config(&self) -> Result<ClassifierConfig, String> {
        if let Some(json) = &self.config_json {
            return serde_json::from_str(json).map_err(|e| format!("--config-json: {e}"));
        }
        let defaults = ClassifierConfig::default();
        Ok(ClassifierConfig {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            decider_tolerance: self
                .decider_tolerance
                .unwrap_or(defaults.decider_tolerance),
            corner_radius: self.corner_radius.unwrap_or(defaults.corner_radius),
        })
    }
}

fn load_field(path: Option<&Path>) -> Result<ScalarField, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ScalarField::demo());
    };
    info!(path = %path.display(), "reading field");
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let field = serde_json::from_str(&text)
        .map_err(|e| format!("invalid field in {}: {e}", path.display()))?;
    Ok(field)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.config()?;
    let field = load_field(args.field.as_deref())?;
    info!(
        rows = field.rows(),
        cols = field.cols(),
        alpha = config.alpha,
        "classifying field"
    );

    let result = run_classifier(&field, &config)?;

    if args.json {
        let report = JsonReport::new(&field, config.alpha, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", Report::new(&field, config.alpha, &result));
    }

    std::fs::create_dir_all(&args.output_dir)
        .map_err(|e| format!("failed to create {}: {e}", args.output_dir.display()))?;

    let plain = args.output_dir.join("WithoutInterpolation.png");
    result.plain_mosaic.save(&plain)?;
    info!(path = %plain.display(), "wrote mosaic");

    let interpolated = args.output_dir.join("WithInterpolation.png");
    result.interpolated_mosaic.save(&interpolated)?;
    info!(path = %interpolated.display(), "wrote mosaic");

    if args.svg {
        let description = format!("alpha={}, interpolated", config.alpha);
        let metadata = SvgMetadata {
            title: Some("contours"),
            description: Some(&description),
        };
        let svg = to_svg(&result.interpolated, &metadata, &SvgStyle::from(&config));
        let path = args.output_dir.join("contours.svg");
        std::fs::write(&path, svg)?;
        info!(path = %path.display(), "wrote svg");
    }

    Ok(())
}
