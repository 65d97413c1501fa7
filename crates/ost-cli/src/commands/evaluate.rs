//! Evaluate command for a single status log.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use ost_core::{MetricsError, Session, TrackingSpan};

/// Machine-readable evaluation report.
#[derive(Debug, Serialize)]
struct Report<'a> {
    log: String,
    total_frame_count: Option<u32>,
    frames_tracked: u32,
    tracked_ratio: Option<f64>,
    times_lost: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    spans: Option<&'a [TrackingSpan]>,
}

pub fn run<W: Write>(writer: &mut W, log: &Path, json: bool, include_spans: bool) -> Result<()> {
    let session = Session::load(log)
        .with_context(|| format!("failed to interpret {}", log.display()))?;

    let frames_tracked = session
        .frames_tracked()
        .with_context(|| format!("corrupt event sequence in {}", log.display()))?;
    let tracked_ratio = match session.tracked_ratio() {
        Ok(ratio) => Some(ratio),
        Err(MetricsError::UnknownTotal) => None,
        Err(err @ MetricsError::Span(_)) => return Err(err.into()),
    };
    let spans = session.spans()?;

    if json {
        let report = Report {
            log: log.display().to_string(),
            total_frame_count: session.total_frame_count(),
            frames_tracked,
            tracked_ratio,
            times_lost: session.times_lost(),
            spans: include_spans.then_some(spans),
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Frames tracked: {frames_tracked}")?;
    match tracked_ratio {
        Some(ratio) => writeln!(writer, "Tracked ratio: {:.2}%", ratio * 100.0)?,
        None => writeln!(writer, "Tracked ratio: unknown (no total frame count)")?,
    }
    writeln!(writer, "Times lost: {}", session.times_lost())?;

    if include_spans {
        writeln!(writer, "Spans:")?;
        for span in spans {
            writeln!(
                writer,
                "- frames {}..{} ({} tracked)",
                span.start,
                span.end,
                span.len()
            )?;
        }
    }

    Ok(())
}
