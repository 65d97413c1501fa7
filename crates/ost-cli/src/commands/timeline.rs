//! Timeline command emitting the segment and marker lists.
//!
//! Output is the JSON a timeline renderer consumes; there is no
//! human-readable mode.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use ost_core::{Session, Timeline, timeline};

#[derive(Debug, Serialize)]
struct Report {
    log: String,
    total_frame_count: Option<u32>,
    #[serde(flatten)]
    timeline: Timeline,
}

pub fn run<W: Write>(writer: &mut W, log: &Path) -> Result<()> {
    let session = Session::load(log)
        .with_context(|| format!("failed to interpret {}", log.display()))?;

    let report = Report {
        log: log.display().to_string(),
        total_frame_count: session.total_frame_count(),
        timeline: timeline::segment(session.events()),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;

    Ok(())
}
