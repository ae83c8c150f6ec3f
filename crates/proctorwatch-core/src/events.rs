use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::Verdict;

/// Every session transition and every attention edge produces an Event.
/// Hosts poll for them; `frame_index` is zero-based within the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    /// The host window lost input focus.
    FocusLost {
        frame_index: u64,
        at: DateTime<Utc>,
    },
    FocusRegained {
        frame_index: u64,
        /// Length of the unfocused run that just ended.
        lost_frames: u64,
        at: DateTime<Utc>,
    },
    /// First frame of a run in which a prohibited object is visible.
    ProhibitedObjectSeen {
        frame_index: u64,
        label: String,
        at: DateTime<Utc>,
    },
    SessionFinished {
        session_id: Uuid,
        total_frames: u64,
        verdict: Verdict,
        at: DateTime<Utc>,
    },
}
