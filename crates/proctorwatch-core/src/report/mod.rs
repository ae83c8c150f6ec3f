//! Session reports.
//!
//! A [`Report`] is the value a host receives when a session finishes. It
//! pairs the session's identity and timing with the [`Assessment`] computed
//! from its counters. `Display` renders the plain-text report shown to the
//! proctor; serde gives the JSON form used by the CLI and the history store.

mod verdict;

pub use verdict::{assess, Assessment, Breakdown, Verdict, REVIEW_THRESHOLD_PCT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::session::SessionStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub session_id: Uuid,
    #[serde(default)]
    pub subject: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(flatten)]
    pub assessment: Assessment,
}

impl Report {
    pub fn new(
        session_id: Uuid,
        subject: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        stats: &SessionStats,
    ) -> Self {
        Self {
            session_id,
            subject: subject.into(),
            started_at,
            finished_at,
            assessment: assess(stats),
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.assessment.verdict
    }

    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds().max(0)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.assessment;
        let b = &a.breakdown;
        writeln!(f, "--- FINAL REPORT ---")?;
        writeln!(f, "Session: {}", self.session_id)?;
        if !self.subject.is_empty() {
            writeln!(f, "Subject: {}", self.subject)?;
        }
        writeln!(f, "Duration: {}s", self.duration_secs())?;
        writeln!(f, "Total time (frames): {}", a.total_frames)?;
        writeln!(f, "Distracted time: {} ({:.2}%)", a.distracted_frames, a.percentage)?;
        match a.verdict {
            Verdict::Pass => writeln!(f, "Verdict: PASS")?,
            Verdict::Review => writeln!(
                f,
                "Verdict: REVIEW (suspicious > {REVIEW_THRESHOLD_PCT:.0}%)"
            )?,
        }
        writeln!(f, "--------------------")?;
        writeln!(f, "INCIDENT DETAIL:")?;
        writeln!(f, "- Window switches: {}", b.focus_lost_events)?;
        writeln!(f, "- Time outside app: {}", b.focus_lost_frames)?;
        writeln!(f, "- Gaze left: {}", b.gaze_left_frames)?;
        writeln!(f, "- Gaze right: {}", b.gaze_right_frames)?;
        writeln!(f, "- Gaze up: {}", b.gaze_up_frames)?;
        writeln!(f, "- Gaze down: {}", b.gaze_down_frames)?;
        writeln!(f, "- No face: {}", b.no_face_frames)?;
        writeln!(f, "- Phone use: {}", b.object_alert_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn report(total: u64, left: u64) -> Report {
        let stats = SessionStats {
            total_frames: total,
            gaze_left_frames: left,
            ..SessionStats::default()
        };
        let start = Utc::now();
        Report::new(Uuid::new_v4(), "alice", start, start + Duration::seconds(90), &stats)
    }

    #[test]
    fn text_report_lists_totals_and_incidents() {
        let text = report(100, 41).to_string();
        assert!(text.contains("Total time (frames): 100"));
        assert!(text.contains("Distracted time: 41 (41.00%)"));
        assert!(text.contains("Verdict: REVIEW"));
        assert!(text.contains("- Gaze left: 41"));
        assert!(text.contains("Subject: alice"));
        assert!(text.contains("Duration: 90s"));
    }

    #[test]
    fn passing_report_text() {
        let text = report(100, 0).to_string();
        assert!(text.contains("(0.00%)"));
        assert!(text.contains("Verdict: PASS"));
    }

    #[test]
    fn json_is_flat() {
        let json = serde_json::to_value(report(10, 5)).unwrap();
        assert_eq!(json["total_frames"], 10);
        assert_eq!(json["distracted_frames"], 5);
        assert_eq!(json["percentage"], 50.0);
        assert_eq!(json["verdict"], "REVIEW");
        assert_eq!(json["breakdown"]["gaze_left_frames"], 5);
    }
}
