//! Core log interpretation for the ORB-SLAM status tool.
//!
//! This crate turns a tracker status log into a semantic timeline of the
//! run:
//! - Classification: each raw log line becomes a typed [`Event`]
//! - Interpretation: a [`Session`] holds the ordered event sequence and the
//!   run's total frame count
//! - Reconstruction: the tracking spans and derived metrics
//!   (`frames_tracked`, `tracked_ratio`)
//! - Segmentation and batch summaries for downstream rendering

pub mod batch;
pub mod event;
pub mod session;
pub mod spans;
pub mod timeline;

pub use batch::{BatchSummary, RunSummary, scan_runs, summarize};
pub use event::{Event, EventKind};
pub use session::{MetricsError, Session, SessionError};
pub use spans::{SpanError, TrackingSpan};
pub use timeline::{Category, Marker, MarkerLabel, Segment, Timeline};
