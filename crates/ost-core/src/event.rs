//! Log line classification into typed events.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches the `current/total` frame marker embedded in status lines.
static FRAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)/(\d+)").unwrap());

/// Canonical event types recognized in a status log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Map initialization succeeded, tracking begins.
    Init,
    /// Tracking was lost.
    Lost,
    /// Relocalization succeeded, tracking resumes.
    Reloc,
    /// A loop closure was detected.
    Loop,
    /// The tracker reset its map.
    Reset,
    /// The run finished.
    Done,
    /// The line matched no catalogued phrase.
    Broken,
}

/// Phrase catalogue, checked in order. Phrases are mutually exclusive
/// substrings, so order only matters for determinism.
const EVENT_MESSAGES: &[(&str, EventKind)] = &[
    ("Initialization OK!", EventKind::Init),
    ("Tracking LOST!", EventKind::Lost),
    ("Relocalization OK!", EventKind::Reloc),
    ("Loop detected!", EventKind::Loop),
    ("RESET!", EventKind::Reset),
    ("End of process.", EventKind::Done),
];

impl EventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Lost => "lost",
            Self::Reloc => "reloc",
            Self::Loop => "loop",
            Self::Reset => "reset",
            Self::Done => "done",
            Self::Broken => "broken",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Self::Init),
            "lost" => Ok(Self::Lost),
            "reloc" => Ok(Self::Reloc),
            "loop" => Ok(Self::Loop),
            "reset" => Ok(Self::Reset),
            "done" => Ok(Self::Done),
            "broken" => Ok(Self::Broken),
            _ => Err(format!("invalid event kind: {s}")),
        }
    }
}

/// A classified occurrence extracted from one log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Frame index from the line's `current/total` marker, `None` when the
    /// marker could not be extracted.
    pub frame: Option<u32>,
    /// The classified event type.
    pub kind: EventKind,
    /// 0-based position in the original line order. The sole ordering key;
    /// no timestamps are parsed.
    pub index: usize,
}

impl Event {
    /// Classifies one raw log line.
    ///
    /// Classification is total: malformed lines become [`EventKind::Broken`]
    /// or lose their frame number, with a warning, but are never dropped.
    #[must_use]
    pub fn classify(line: &str, index: usize) -> Self {
        let frame = extract_frame_pair(line).map(|(current, _)| current);
        if frame.is_none() {
            tracing::warn!(index, line, "no frame marker found in line");
        }

        let kind = EVENT_MESSAGES
            .iter()
            .find(|(phrase, _)| line.contains(phrase))
            .map_or_else(
                || {
                    tracing::warn!(index, line, "line matched no catalogued event phrase");
                    EventKind::Broken
                },
                |(_, kind)| *kind,
            );

        Self { frame, kind, index }
    }
}

/// Extracts the first `current/total` integer pair from a line.
///
/// Integers too large for `u32` are treated as absent.
pub(crate) fn extract_frame_pair(line: &str) -> Option<(u32, u32)> {
    let caps = FRAME_RE.captures(line)?;
    let current = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;
    Some((current, total))
}
