//! Tulana - compare EKF estimate logs and render diagnostic plots.
//!
//! # Usage
//!
//! ```bash
//! tulana --reference ekf_a.log ekf_b.log --output report/
//! tulana --reference ekf_a.log ekf_b.log ekf_c.log --interpolate --max-offset 0.01
//! ```
//!
//! Each comparison log is aligned against the reference, differenced,
//! and summarized; diagnostic pages are written to the output directory
//! as numbered SVG files.

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use tulana::align::{align, AlignConfig, AlignMethod};
use tulana::io::EstimateSeries;
use tulana::metrics::{DiffSummary, SeriesDiff};
use tulana::render::{
    attitude_page, covariance_page, position_difference_page, spatial_error_page, ChartConfig,
    PagedDocument,
};
use tulana::Result;

#[derive(Parser)]
#[command(name = "tulana")]
#[command(about = "Compare EKF estimate logs and render diagnostic plots")]
#[command(version)]
struct Args {
    /// Reference estimate log
    #[arg(short, long)]
    reference: PathBuf,

    /// Comparison estimate logs
    #[arg(required = true)]
    logs: Vec<PathBuf>,

    /// Output directory for rendered pages
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Maximum time offset accepted when pairing samples (seconds)
    #[arg(long, default_value = "0.02")]
    max_offset: f64,

    /// Interpolate comparison series at reference timestamps instead of
    /// nearest-neighbor pairing
    #[arg(long)]
    interpolate: bool,

    /// Write a JSON summary of all comparisons to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = AlignConfig {
        max_offset_us: (args.max_offset * 1_000_000.0) as u64,
        method: if args.interpolate {
            AlignMethod::Interpolate
        } else {
            AlignMethod::Nearest
        },
    };
    let chart = ChartConfig::default();

    let reference = EstimateSeries::load(&args.reference)?;
    info!(
        "Reference '{}': {} records over {:.1}s ({:.1} Hz)",
        reference.name(),
        reference.len(),
        reference.duration_secs(),
        reference.mean_rate_hz()
    );

    let mut document = PagedDocument::new();
    let mut summaries: Vec<DiffSummary> = Vec::new();

    if let Some(page) = covariance_page(&reference, &chart) {
        document.push(format!("Covariance {}", reference.name()), page);
    }

    for path in &args.logs {
        let compared = EstimateSeries::load(path)?;
        info!(
            "Comparing '{}': {} records over {:.1}s ({:.1} Hz)",
            compared.name(),
            compared.len(),
            compared.duration_secs(),
            compared.mean_rate_hz()
        );

        let pairs = align(&reference, &compared, &config);
        if pairs.is_empty() {
            warn!(
                "No aligned samples between '{}' and '{}' (disjoint time ranges?)",
                reference.name(),
                compared.name()
            );
            continue;
        }
        info!(
            "Aligned {} of {} reference samples",
            pairs.len(),
            reference.len()
        );

        let diff = SeriesDiff::compute(reference.name(), compared.name(), &pairs);
        let summary = diff.summary();
        summary.print();

        if diff.samples.len() < 2 {
            warn!(
                "Only {} aligned sample(s), skipping plots for '{}'",
                diff.samples.len(),
                compared.name()
            );
        } else {
            document.push(
                format!("Position {}", compared.name()),
                position_difference_page(&diff, &chart),
            );
            document.push(
                format!("Attitude {}", compared.name()),
                attitude_page(&diff, &chart),
            );
            document.push(
                format!("Spatial {}", compared.name()),
                spatial_error_page(&diff, &chart),
            );
        }

        if let Some(page) = covariance_page(&compared, &chart) {
            document.push(format!("Covariance {}", compared.name()), page);
        }

        summaries.push(summary);
    }

    let paths = document.save(&args.output)?;
    info!("Wrote {} pages to {}", paths.len(), args.output.display());

    if let Some(json_path) = &args.summary_json {
        let file = File::create(json_path)?;
        serde_json::to_writer_pretty(file, &summaries)?;
        info!("Wrote summary to {}", json_path.display());
    }

    Ok(())
}
