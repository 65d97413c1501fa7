//! Tracking-span reconstruction.
//!
//! Replays the ordered event sequence through a small state machine to
//! recover the contiguous frame ranges during which tracking was successful.
//! A run opens on `Init` or `Reloc` and closes on `Lost`, `Reset` or `Done`.
//! The frame on which a failure is reported was itself never tracked, so a
//! failure at frame `f` closes the run at `f - 1`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{Event, EventKind};

/// Sequence violations the state machine cannot recover from.
///
/// These indicate a corrupt log or an uncatalogued event and are surfaced to
/// the caller rather than swallowed, so batch tooling can flag the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpanError {
    /// Two run openers without an intervening close.
    #[error("double tracking start at event {index}")]
    DoubleStart { index: usize },
    /// Two run closers without an intervening open, outside the tolerated
    /// repeated-failure case.
    #[error("double tracking end at event {index}")]
    DoubleEnd { index: usize },
    /// A state-machine event carried no parseable frame number.
    #[error("event {index} has no frame number")]
    MissingFrame { index: usize },
}

/// A half-open frame interval `[start, end)` of unbroken tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSpan {
    pub start: u32,
    pub end: u32,
}

impl TrackingSpan {
    /// Number of frames tracked in this span.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sums the lengths of all spans.
#[must_use]
pub fn frames_tracked(spans: &[TrackingSpan]) -> u32 {
    spans.iter().map(TrackingSpan::len).sum()
}

const fn is_opener(kind: EventKind) -> bool {
    matches!(kind, EventKind::Init | EventKind::Reloc)
}

const fn is_failure(kind: EventKind) -> bool {
    matches!(kind, EventKind::Lost | EventKind::Reset)
}

/// Replays the event sequence and returns the closed tracking spans.
///
/// Only `Init`, `Reloc`, `Lost`, `Reset` and `Done` drive the machine;
/// `Loop` and `Broken` events are ignored here. Consecutive failures with no
/// intervening opener collapse into a single close: the tracker repeatedly
/// failing to initialize emits failure markers back to back, and those must
/// contribute zero tracked frames rather than be mis-paired into a span.
pub fn reconstruct(events: &[Event]) -> Result<Vec<TrackingSpan>, SpanError> {
    let considered = events
        .iter()
        .filter(|event| is_opener(event.kind) || is_failure(event.kind) || event.kind == EventKind::Done);

    let mut start: Option<u32> = None;
    let mut end: Option<u32> = None;
    // Synthetic start-of-log state; only failure kinds matter for the lookback.
    let mut last_kind: Option<EventKind> = None;
    let mut spans = Vec::new();

    for event in considered {
        let frame = event
            .frame
            .ok_or(SpanError::MissingFrame { index: event.index })?;
        tracing::debug!(index = event.index, kind = %event.kind, frame, "considering event");

        match event.kind {
            kind if is_opener(kind) => {
                if start.is_some() {
                    return Err(SpanError::DoubleStart { index: event.index });
                }
                start = Some(frame);
            }
            kind if is_failure(kind) => {
                if last_kind.is_some_and(is_failure) {
                    // Repeated failure while initialization keeps failing;
                    // not a second close. The lookback is deliberately left
                    // untouched so a third failure is skipped the same way.
                    tracing::debug!(index = event.index, "ignoring repeated failure event");
                    continue;
                }
                if end.is_some() {
                    return Err(SpanError::DoubleEnd { index: event.index });
                }
                end = Some(frame.saturating_sub(1));
            }
            _ => {
                // Done terminates the run, closing any open span.
                let close = frame.saturating_sub(1);
                if let Some(s) = start {
                    if close >= s {
                        spans.push(TrackingSpan { start: s, end: close });
                    }
                }
                return Ok(spans);
            }
        }

        if let (Some(s), Some(e)) = (start, end) {
            if e >= s {
                spans.push(TrackingSpan { start: s, end: e });
                start = None;
            } else {
                // A bare failure recorded before this run opened; dropping
                // it keeps the open run and forbids negative-length spans.
                tracing::warn!(start = s, end = e, "dropping stale close preceding the open");
            }
            end = None;
        }

        last_kind = Some(event.kind);
    }

    Ok(spans)
}
