//! CLI entry-point for a one-shot safety analysis.

use std::{fmt::Write as _, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    analysis::{self, AnalysisReport},
    config::Settings,
    data,
    output::{JsonFileSink, ReportSink},
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Output JSON file path (defaults to SAFETY_OUTPUT or public/safety_predictions.json).
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Location dataset to read instead of LOCATIONS_SOURCE.
    #[arg(long)]
    pub source: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let source_path = args.source.unwrap_or_else(|| settings.locations_source.clone());
    let output = args.output.unwrap_or_else(|| settings.output_path.clone());

    println!("Fetching location data...");
    let source = data::open_source(&source_path);
    let records = data::fetch_locations(source.as_ref());

    println!("Analyzing safety...");
    let report = analysis::analyze(records, &settings.analysis).context("safety analysis failed")?;

    println!("Writing predictions to {}", output.display());
    JsonFileSink::new(&output).write(&report)?;

    print!("{}", render_summary(&report));
    if !report.is_success() {
        bail!(
            "analysis finished with status error: {}",
            report.message.as_deref().unwrap_or("unknown failure")
        );
    }
    Ok(())
}

/// Human-readable digest printed after a run.
pub fn render_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    if !report.is_success() {
        let _ = writeln!(
            out,
            "\nAnalysis failed: {}",
            report.message.as_deref().unwrap_or("unknown failure")
        );
        return out;
    }
    let _ = writeln!(out, "\nAnalysis complete:");
    let _ = writeln!(out, "- Total locations analyzed: {}", report.total_locations);
    match report.overall_rating {
        Some(rating) => {
            let _ = writeln!(out, "- Overall safety rating: {rating:.1}/5.0");
        }
        None => {
            let _ = writeln!(out, "- Overall safety rating: n/a");
        }
    }
    let _ = writeln!(out, "- Safe locations: {}", report.safe_locations);
    let _ = writeln!(out, "- Unsafe locations: {}", report.unsafe_locations);
    if !report.risk_factors.is_empty() {
        let _ = writeln!(out, "- Top risk factors: {}", report.risk_factors.join(", "));
    }
    if let Some(note) = &report.note {
        let _ = writeln!(out, "- Note: {note}");
    }
    out
}
