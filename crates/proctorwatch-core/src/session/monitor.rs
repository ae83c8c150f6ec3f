//! Thread-safe host facade over [`SessionAggregator`].
//!
//! Classification is pure and runs outside the lock; only the counter update
//! and the lifecycle transitions take it, so `record` calls are serialized
//! and never interleave with `start`/`finish`.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use log::info;

use super::aggregator::{SessionAggregator, SessionState};
use super::stats::SessionStats;
use crate::classifier::{classify_frame, FrameState};
use crate::error::{Result, SessionError};
use crate::events::Event;
use crate::report::Report;
use crate::signals::FrameSignals;

#[derive(Debug, Default)]
struct Inner {
    session: SessionAggregator,
    events: Vec<Event>,
}

#[derive(Debug, Default)]
pub struct SessionMonitor {
    subject: String,
    inner: Mutex<Inner>,
}

impl SessionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label stored on every report this monitor produces.
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            inner: Mutex::default(),
        }
    }

    // Counter updates never panic midway; a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.lock().session.state()
    }

    /// Snapshot of the live counters.
    pub fn current_stats(&self) -> SessionStats {
        self.lock().session.stats()
    }

    pub fn start(&self) -> Result<Event> {
        let mut inner = self.lock();
        let event = inner.session.start()?;
        inner.events.push(event.clone());
        Ok(event)
    }

    /// Classify one frame and count it.
    pub fn record(&self, signals: &FrameSignals) -> Result<FrameState> {
        let state = classify_frame(signals);
        let mut inner = self.lock();
        let events = inner.session.record(state)?;
        inner.events.extend(events);
        Ok(state)
    }

    /// Freeze the session and compute its report.
    pub fn finish(&self) -> Result<Report> {
        let mut inner = self.lock();
        let stats = inner.session.finish()?;
        let session = &inner.session;
        let finished_at = session.finished_at().unwrap_or_else(Utc::now);
        let report = Report::new(
            session.id(),
            self.subject.clone(),
            session.started_at().unwrap_or(finished_at),
            finished_at,
            &stats,
        );
        info!(
            "session {}: {:.2}% distracted, verdict {}",
            report.session_id,
            report.assessment.percentage,
            report.verdict()
        );
        inner.events.push(Event::SessionFinished {
            session_id: report.session_id,
            total_frames: stats.total_frames,
            verdict: report.verdict(),
            at: finished_at,
        });
        Ok(report)
    }

    /// Discard the current session and install a fresh idle one.
    ///
    /// # Errors
    /// Returns `InvalidTransition` while a session is active.
    pub fn reset(&self) -> Result<()> {
        let mut inner = self.lock();
        let state = inner.session.state();
        if state == SessionState::Active {
            return Err(SessionError::InvalidTransition {
                operation: "reset",
                state,
            }
            .into());
        }
        *inner = Inner::default();
        Ok(())
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.lock().events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::report::Verdict;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn record_before_start_is_rejected() {
        let monitor = SessionMonitor::new();
        let err = monitor.record(&FrameSignals::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::InvalidTransition { operation: "record", .. })
        ));
    }

    #[test]
    fn finish_produces_report_and_event() {
        let monitor = SessionMonitor::with_subject("bob");
        monitor.start().unwrap();
        for _ in 0..3 {
            assert_eq!(monitor.record(&FrameSignals::unfocused()).unwrap(), FrameState::FocusLost);
        }
        let report = monitor.finish().unwrap();
        assert_eq!(report.subject, "bob");
        assert_eq!(report.assessment.total_frames, 3);
        assert_eq!(report.verdict(), Verdict::Review);

        let events = monitor.drain_events();
        assert!(matches!(events.first(), Some(Event::SessionStarted { .. })));
        assert!(matches!(events.get(1), Some(Event::FocusLost { frame_index: 0, .. })));
        assert!(matches!(
            events.last(),
            Some(Event::SessionFinished { total_frames: 3, verdict: Verdict::Review, .. })
        ));
        assert!(monitor.drain_events().is_empty());
    }

    #[test]
    fn reset_only_outside_active_session() {
        let monitor = SessionMonitor::new();
        monitor.start().unwrap();
        assert!(monitor.reset().is_err());
        monitor.record(&FrameSignals::default()).unwrap();
        monitor.finish().unwrap();

        monitor.reset().unwrap();
        assert_eq!(monitor.state(), SessionState::Idle);
        assert_eq!(monitor.current_stats(), SessionStats::default());
        monitor.start().unwrap();
    }

    #[test]
    fn concurrent_records_are_all_counted() {
        let monitor = Arc::new(SessionMonitor::new());
        monitor.start().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let monitor = Arc::clone(&monitor);
                thread::spawn(move || {
                    for _ in 0..250 {
                        monitor.record(&FrameSignals::default()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = monitor.current_stats();
        assert_eq!(stats.total_frames, 1000);
        assert_eq!(stats.no_face_frames, 1000);
    }
}
