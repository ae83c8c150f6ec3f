//! Session aggregator implementation.
//!
//! A one-way state machine that owns the session counters. Each instance
//! runs exactly one session; a new session needs a new aggregator.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Active -> Finished
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SessionAggregator::new();
//! session.start()?;
//! // Once per frame:
//! session.record(classify_frame(&signals))?;
//! let stats = session.finish()?;
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::stats::SessionStats;
use crate::classifier::{FrameState, PHONE_ALERT};
use crate::error::SessionError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Active,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Finished => "finished",
        })
    }
}

/// Owns the counters of a single session.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    id: Uuid,
    state: SessionState,
    stats: SessionStats,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    /// State of the previous frame. The session starts as if focused.
    last_state: Option<FrameState>,
    /// Frames in the current unfocused run.
    unfocused_run: u64,
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            stats: SessionStats::default(),
            started_at: None,
            finished_at: None,
            last_state: None,
            unfocused_run: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle -> Active. Counters start from zero.
    pub fn start(&mut self) -> Result<Event, SessionError> {
        self.expect_state(SessionState::Idle, "start")?;
        let at = Utc::now();
        self.state = SessionState::Active;
        self.stats = SessionStats::default();
        self.started_at = Some(at);
        self.last_state = None;
        self.unfocused_run = 0;
        info!("session {} started", self.id);
        Ok(Event::SessionStarted {
            session_id: self.id,
            at,
        })
    }

    /// Count one classified frame.
    ///
    /// Returns the events this frame triggers: opening or closing a
    /// focus-loss run, and opening a prohibited-object run.
    pub fn record(&mut self, state: FrameState) -> Result<Vec<Event>, SessionError> {
        self.expect_state(SessionState::Active, "record")?;
        let frame_index = self.stats.total_frames;
        let previous = self.last_state.replace(state);
        self.stats.increment(state);

        let mut events = Vec::new();
        let was_unfocused = previous == Some(FrameState::FocusLost);
        if state == FrameState::FocusLost {
            self.unfocused_run += 1;
            if !was_unfocused {
                self.stats.focus_lost_events += 1;
                events.push(Event::FocusLost {
                    frame_index,
                    at: Utc::now(),
                });
            }
        } else if was_unfocused {
            events.push(Event::FocusRegained {
                frame_index,
                lost_frames: std::mem::take(&mut self.unfocused_run),
                at: Utc::now(),
            });
        }

        if state == FrameState::ProhibitedObject && previous != Some(FrameState::ProhibitedObject) {
            events.push(Event::ProhibitedObjectSeen {
                frame_index,
                label: PHONE_ALERT.to_string(),
                at: Utc::now(),
            });
        }
        Ok(events)
    }

    /// Active -> Finished. Returns the frozen counters.
    pub fn finish(&mut self) -> Result<SessionStats, SessionError> {
        self.expect_state(SessionState::Active, "finish")?;
        self.state = SessionState::Finished;
        self.finished_at = Some(Utc::now());
        info!(
            "session {} finished after {} frames",
            self.id, self.stats.total_frames
        );
        Ok(self.stats)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expect_state(&self, required: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == required {
            return Ok(());
        }
        warn!("rejected {operation} on session {} ({})", self.id, self.state);
        Err(SessionError::InvalidTransition {
            operation,
            state: self.state,
        })
    }
}
