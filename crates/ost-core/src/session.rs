//! Session interpretation of a whole status log.
//!
//! A [`Session`] is the typed representation of one tracker run: the ordered
//! event sequence plus the run's total frame count. It is read-only after
//! construction; derived metrics are computed on first access and cached.

use std::cell::OnceCell;
use std::path::Path;

use thiserror::Error;

use crate::event::{self, Event, EventKind};
use crate::spans::{self, SpanError, TrackingSpan};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log contains no usable lines")]
    NoEvents,
}

/// Failures of ratio-level metrics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    /// The log's first line carried no `current/total` marker, so there is
    /// no denominator to compute a ratio against.
    #[error("total frame count could not be derived from the log")]
    UnknownTotal,
    #[error(transparent)]
    Span(#[from] SpanError),
}

/// One interpreted tracker run.
#[derive(Debug)]
pub struct Session {
    events: Vec<Event>,
    total_frame_count: Option<u32>,
    /// Lazily computed span reconstruction, at most once per session.
    reconstruction: OnceCell<Result<Vec<TrackingSpan>, SpanError>>,
}

impl Session {
    /// Interprets a log given as text.
    ///
    /// Empty lines are discarded before indexing, so event indices are
    /// positions among non-empty lines, not original line numbers.
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        let first = lines.first().ok_or(SessionError::NoEvents)?;

        let total_frame_count = event::extract_frame_pair(first).map(|(_, total)| total);
        if total_frame_count.is_none() {
            tracing::warn!(line = *first, "no total frame count found in first line");
        }

        let events = lines
            .iter()
            .enumerate()
            .map(|(index, line)| Event::classify(line, index))
            .collect();

        Ok(Self {
            events,
            total_frame_count,
            reconstruction: OnceCell::new(),
        })
    }

    /// Reads and interprets a log file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The ordered event sequence, insertion order = log line order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Total frame count from the first line's `current/total` marker,
    /// `None` when extraction failed.
    #[must_use]
    pub const fn total_frame_count(&self) -> Option<u32> {
        self.total_frame_count
    }

    fn reconstruction(&self) -> &Result<Vec<TrackingSpan>, SpanError> {
        self.reconstruction
            .get_or_init(|| spans::reconstruct(&self.events))
    }

    /// The closed tracking spans of this run.
    pub fn spans(&self) -> Result<&[TrackingSpan], SpanError> {
        match self.reconstruction() {
            Ok(spans) => Ok(spans),
            Err(err) => Err(*err),
        }
    }

    /// Total number of successfully tracked frames.
    pub fn frames_tracked(&self) -> Result<u32, SpanError> {
        self.spans().map(spans::frames_tracked)
    }

    /// Fraction of the run's frames that were tracked.
    ///
    /// Fails with [`MetricsError::UnknownTotal`] when the total frame count
    /// is unknown, independent of event content.
    pub fn tracked_ratio(&self) -> Result<f64, MetricsError> {
        let total = self.total_frame_count.ok_or(MetricsError::UnknownTotal)?;
        let tracked = self.frames_tracked()?;
        Ok(f64::from(tracked) / f64::from(total))
    }

    /// How many times tracking was lost during the run.
    #[must_use]
    pub fn times_lost(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.kind == EventKind::Lost)
            .count()
    }
}
