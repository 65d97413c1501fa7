//! Batch command evaluating every run below a directory.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use ost_core::batch::{self, BatchSummary, RunSummary};

#[derive(Debug, Serialize)]
struct Report<'a> {
    runs: &'a [RunSummary],
    summary: &'a BatchSummary,
}

pub fn run<W: Write>(
    writer: &mut W,
    runs_dir: &Path,
    log_name: &str,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let runs = batch::scan_runs(runs_dir, log_name)
        .with_context(|| format!("failed to scan {}", runs_dir.display()))?;
    let summary = batch::summarize(&runs);

    if let Some(output) = output {
        // The aggregate file keeps the exact shape the box-plot renderer
        // consumes.
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(output, json)
            .with_context(|| format!("failed to write {}", output.display()))?;
        tracing::info!(path = %output.display(), "batch summary written");
    }

    if json {
        let report = Report {
            runs: &runs,
            summary: &summary,
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    if runs.is_empty() {
        writeln!(writer, "No runs found in {}", runs_dir.display())?;
        return Ok(());
    }

    writeln!(writer, "Evaluated {} run(s):", runs.len())?;
    for run in &runs {
        let ratio = run
            .tracked_ratio
            .map_or_else(|| "unknown".to_string(), |r| format!("{:.2}%", r * 100.0));
        writeln!(
            writer,
            "- {}: {} frames tracked ({ratio}), lost {} time(s)",
            run.name, run.frames_tracked, run.times_lost
        )?;
    }

    Ok(())
}
