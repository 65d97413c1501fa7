//! Timeline segmentation for rendering.
//!
//! Cuts the run into colored segments plus point annotations. A segment is
//! closed whenever a separator event is reached, and its category comes from
//! the separator that closed the *previous* segment: the stretch between two
//! boundaries reflects the state the tracker entered at the first of them.
//! Downstream renderers rely on this exact convention.

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind};

/// Tracker state over a stretch of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Initializing,
    Tracking,
    Relocalizing,
}

/// A `[start, end)` stretch of frames in one tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
    pub category: Category,
}

/// Point annotation label. Rendered as a single letter above the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerLabel {
    Reset,
    Loop,
}

impl MarkerLabel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "R",
            Self::Loop => "L",
        }
    }
}

/// A point annotation at a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub frame: u32,
    pub label: MarkerLabel,
}

/// Segments and markers for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    pub markers: Vec<Marker>,
}

const fn is_separator(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Init | EventKind::Lost | EventKind::Reset | EventKind::Reloc | EventKind::Done
    )
}

/// Category of the segment *ending* at the next separator, given the
/// separator that opened it (`None` = synthetic start of log).
const fn category_after(separator: Option<EventKind>) -> Category {
    match separator {
        Some(EventKind::Init | EventKind::Reloc) => Category::Tracking,
        Some(EventKind::Lost) => Category::Relocalizing,
        // Start of log, after a reset, and the (degenerate) post-Done tail
        // are all pre-initialization stretches.
        _ => Category::Initializing,
    }
}

/// Computes the segment and marker lists for an event sequence.
///
/// Separator or marker events without a frame number cannot be placed and
/// are skipped with a warning; the timeline is advisory output, not a
/// metric, so a partial timeline beats none at all.
#[must_use]
pub fn segment(events: &[Event]) -> Timeline {
    let mut timeline = Timeline::default();
    let mut cursor: u32 = 0;
    let mut last_separator: Option<EventKind> = None;

    for event in events {
        if is_separator(event.kind) {
            let Some(frame) = event.frame else {
                tracing::warn!(index = event.index, kind = %event.kind, "separator event without frame, skipping");
                continue;
            };

            if frame > cursor {
                timeline.segments.push(Segment {
                    start: cursor,
                    end: frame,
                    category: category_after(last_separator),
                });
            }

            cursor = frame;
            if event.kind == EventKind::Lost {
                // The frame the loss was reported on belongs to the
                // relocalizing stretch that follows.
                cursor = cursor.saturating_sub(1);
            }
            last_separator = Some(event.kind);
        }

        match event.kind {
            EventKind::Reset | EventKind::Loop => {
                if let Some(frame) = event.frame {
                    let label = if event.kind == EventKind::Reset {
                        MarkerLabel::Reset
                    } else {
                        MarkerLabel::Loop
                    };
                    timeline.markers.push(Marker { frame, label });
                } else {
                    tracing::warn!(index = event.index, kind = %event.kind, "marker event without frame, skipping");
                }
            }
            _ => {}
        }
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, frame: u32, index: usize) -> Event {
        Event {
            frame: Some(frame),
            kind,
            index,
        }
    }

    #[test]
    fn reference_run_segments() {
        let events = [
            event(EventKind::Init, 0, 0),
            event(EventKind::Lost, 50, 1),
            event(EventKind::Reloc, 60, 2),
            event(EventKind::Done, 100, 3),
        ];
        let timeline = segment(&events);

        assert_eq!(
            timeline.segments,
            vec![
                Segment {
                    start: 0,
                    end: 50,
                    category: Category::Tracking,
                },
                // Backs up one frame: the loss frame itself was not tracked.
                Segment {
                    start: 49,
                    end: 60,
                    category: Category::Relocalizing,
                },
                Segment {
                    start: 60,
                    end: 100,
                    category: Category::Tracking,
                },
            ]
        );
        assert!(timeline.markers.is_empty());
    }

    #[test]
    fn initializing_until_first_init() {
        let events = [
            event(EventKind::Init, 20, 0),
            event(EventKind::Done, 100, 1),
        ];
        let timeline = segment(&events);

        assert_eq!(timeline.segments[0].category, Category::Initializing);
        assert_eq!(timeline.segments[0].start, 0);
        assert_eq!(timeline.segments[0].end, 20);
    }

    #[test]
    fn reset_yields_marker_and_initializing_segment() {
        let events = [
            event(EventKind::Init, 10, 0),
            event(EventKind::Reset, 40, 1),
            event(EventKind::Init, 55, 2),
            event(EventKind::Done, 100, 3),
        ];
        let timeline = segment(&events);

        assert_eq!(
            timeline.markers,
            vec![Marker {
                frame: 40,
                label: MarkerLabel::Reset,
            }]
        );
        // Segment after the reset is initializing again.
        assert_eq!(
            timeline.segments[2],
            Segment {
                start: 40,
                end: 55,
                category: Category::Initializing,
            }
        );
    }

    #[test]
    fn loop_is_marker_only_not_boundary() {
        let events = [
            event(EventKind::Init, 0, 0),
            event(EventKind::Loop, 30, 1),
            event(EventKind::Done, 100, 2),
        ];
        let timeline = segment(&events);

        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].end, 100);
        assert_eq!(
            timeline.markers,
            vec![Marker {
                frame: 30,
                label: MarkerLabel::Loop,
            }]
        );
    }

    #[test]
    fn zero_length_segments_are_not_emitted() {
        let events = [
            event(EventKind::Init, 0, 0),
            event(EventKind::Done, 100, 1),
        ];
        let timeline = segment(&events);

        // The Init at frame 0 closes an empty initializing stretch.
        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].category, Category::Tracking);
    }

    #[test]
    fn separator_without_frame_is_skipped() {
        let events = [
            Event {
                frame: None,
                kind: EventKind::Init,
                index: 0,
            },
            event(EventKind::Done, 100, 1),
        ];
        let timeline = segment(&events);

        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].category, Category::Initializing);
    }

    #[test]
    fn broken_events_do_not_affect_the_timeline() {
        let events = [
            event(EventKind::Init, 0, 0),
            Event {
                frame: Some(40),
                kind: EventKind::Broken,
                index: 1,
            },
            event(EventKind::Done, 80, 2),
        ];
        let timeline = segment(&events);

        assert_eq!(timeline.segments.len(), 1);
        assert!(timeline.markers.is_empty());
    }

    #[test]
    fn marker_labels_render_as_letters() {
        assert_eq!(MarkerLabel::Reset.as_str(), "R");
        assert_eq!(MarkerLabel::Loop.as_str(), "L");
    }
}
