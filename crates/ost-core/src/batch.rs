//! Batch evaluation over many runs.
//!
//! Scans a directory of run subdirectories, each holding one status log,
//! and produces per-run summaries plus the aggregate lists the downstream
//! box-plot renderer consumes. Runs with corrupt logs are skipped with a
//! warning instead of aborting the whole batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Default status log file name written by the tracker.
pub const DEFAULT_LOG_NAME: &str = "orb_slam_status.log";

/// Per-run evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run directory name.
    pub name: String,
    pub frames_tracked: u32,
    /// `None` when the run's total frame count could not be derived.
    pub tracked_ratio: Option<f64>,
    pub times_lost: usize,
}

/// Aggregate lists over a batch, in the JSON shape consumed by the
/// box-plot renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub tracked_ratios: Vec<f64>,
    pub times_lost: Vec<usize>,
}

/// Collapses per-run summaries into the aggregate lists.
///
/// Runs without a known total contribute no ratio but still count their
/// losses.
#[must_use]
pub fn summarize(runs: &[RunSummary]) -> BatchSummary {
    BatchSummary {
        tracked_ratios: runs.iter().filter_map(|run| run.tracked_ratio).collect(),
        times_lost: runs.iter().map(|run| run.times_lost).collect(),
    }
}

#[derive(Debug)]
struct RunLog {
    name: String,
    path: PathBuf,
}

/// Scans `runs_dir` for run subdirectories containing `log_name` and
/// evaluates each in parallel. Results are sorted by run name.
pub fn scan_runs(runs_dir: &Path, log_name: &str) -> std::io::Result<Vec<RunSummary>> {
    if !runs_dir.exists() {
        return Ok(Vec::new());
    }

    let mut run_logs: Vec<RunLog> = Vec::new();
    for entry in std::fs::read_dir(runs_dir)? {
        let entry = entry?;
        let run_path = entry.path();
        if !run_path.is_dir() {
            continue;
        }

        let log_path = run_path.join(log_name);
        if !log_path.is_file() {
            tracing::debug!(path = ?run_path, "directory without status log, skipping");
            continue;
        }

        let name = run_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        run_logs.push(RunLog {
            name,
            path: log_path,
        });
    }

    let mut runs: Vec<RunSummary> = run_logs
        .par_iter()
        .filter_map(|run| evaluate_run(run))
        .collect();

    runs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(runs)
}

fn evaluate_run(run: &RunLog) -> Option<RunSummary> {
    let session = match Session::load(&run.path) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(path = ?run.path, error = %err, "skipping unreadable run");
            return None;
        }
    };

    let frames_tracked = match session.frames_tracked() {
        Ok(frames) => frames,
        Err(err) => {
            tracing::warn!(path = ?run.path, error = %err, "skipping run with corrupt event sequence");
            return None;
        }
    };

    let tracked_ratio = match session.tracked_ratio() {
        Ok(ratio) => Some(ratio),
        Err(err) => {
            tracing::warn!(path = ?run.path, error = %err, "run has no tracked ratio");
            None
        }
    };

    Some(RunSummary {
        name: run.name.clone(),
        frames_tracked,
        tracked_ratio,
        times_lost: session.times_lost(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn write_run(runs_dir: &Path, name: &str, log: &str) {
        let run_dir = runs_dir.join(name);
        std::fs::create_dir_all(&run_dir).unwrap();
        let mut file = std::fs::File::create(run_dir.join(DEFAULT_LOG_NAME)).unwrap();
        write!(file, "{log}").unwrap();
    }

    #[test]
    fn scans_and_sorts_runs() {
        let temp = TempDir::new().unwrap();
        write_run(
            temp.path(),
            "run-b",
            "Initialization OK! 0/100\nEnd of process. 100/100\n",
        );
        write_run(
            temp.path(),
            "run-a",
            "Initialization OK! 0/200\nTracking LOST! 100/200\nEnd of process. 200/200\n",
        );

        let runs = scan_runs(temp.path(), DEFAULT_LOG_NAME).unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].name, "run-a");
        assert_eq!(runs[0].frames_tracked, 99);
        assert_eq!(runs[0].times_lost, 1);
        assert_eq!(runs[1].name, "run-b");
        assert_eq!(runs[1].frames_tracked, 99);
    }

    #[test]
    fn corrupt_run_is_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        write_run(
            temp.path(),
            "good",
            "Initialization OK! 0/100\nEnd of process. 100/100\n",
        );
        // Double start, fatal for this run only.
        write_run(
            temp.path(),
            "corrupt",
            "Initialization OK! 0/100\nRelocalization OK! 10/100\n",
        );

        let runs = scan_runs(temp.path(), DEFAULT_LOG_NAME).unwrap();

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].name, "good");
    }

    #[test]
    fn run_without_total_keeps_losses_but_no_ratio() {
        let temp = TempDir::new().unwrap();
        write_run(
            temp.path(),
            "no-total",
            "starting up\nInitialization OK! 0/100\nTracking LOST! 40/100\nEnd of process. 100/100\n",
        );

        let runs = scan_runs(temp.path(), DEFAULT_LOG_NAME).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].tracked_ratio, None);
        assert_eq!(runs[0].times_lost, 1);

        let summary = summarize(&runs);
        assert!(summary.tracked_ratios.is_empty());
        assert_eq!(summary.times_lost, vec![1]);
    }

    #[test]
    fn summary_matches_renderer_shape() {
        let runs = vec![
            RunSummary {
                name: "a".into(),
                frames_tracked: 88,
                tracked_ratio: Some(0.88),
                times_lost: 1,
            },
            RunSummary {
                name: "b".into(),
                frames_tracked: 99,
                tracked_ratio: Some(0.99),
                times_lost: 0,
            },
        ];

        let json = serde_json::to_value(summarize(&runs)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tracked_ratios": [0.88, 0.99],
                "times_lost": [1, 0],
            })
        );
    }

    #[test]
    fn nonexistent_directory_yields_empty_batch() {
        let runs = scan_runs(Path::new("/nonexistent/runs"), DEFAULT_LOG_NAME).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn directories_without_logs_are_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("empty-run")).unwrap();

        let runs = scan_runs(temp.path(), DEFAULT_LOG_NAME).unwrap();
        assert!(runs.is_empty());
    }
}
