//! Final verdict over a finished session's counters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::SessionStats;

/// Sessions distracted for more than this share of frames go to review.
pub const REVIEW_THRESHOLD_PCT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Review,
}

impl Verdict {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= REVIEW_THRESHOLD_PCT {
            Verdict::Pass
        } else {
            Verdict::Review
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Pass => "PASS",
            Verdict::Review => "REVIEW",
        })
    }
}

/// Incident counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub focus_lost_frames: u64,
    pub focus_lost_events: u64,
    pub object_alert_frames: u64,
    pub no_face_frames: u64,
    pub gaze_left_frames: u64,
    pub gaze_right_frames: u64,
    pub gaze_up_frames: u64,
    pub gaze_down_frames: u64,
}

impl From<&SessionStats> for Breakdown {
    fn from(stats: &SessionStats) -> Self {
        Self {
            focus_lost_frames: stats.focus_lost_frames,
            focus_lost_events: stats.focus_lost_events,
            object_alert_frames: stats.prohibited_object_frames,
            no_face_frames: stats.no_face_frames,
            gaze_left_frames: stats.gaze_left_frames,
            gaze_right_frames: stats.gaze_right_frames,
            gaze_up_frames: stats.gaze_up_frames,
            gaze_down_frames: stats.gaze_down_frames,
        }
    }
}

/// Outcome of a session, derived only from its counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub total_frames: u64,
    pub distracted_frames: u64,
    /// Share of distracted frames, rounded to two decimals.
    pub percentage: f64,
    pub verdict: Verdict,
    pub breakdown: Breakdown,
}

/// Compute the assessment for a finished session.
///
/// The verdict is taken from the unrounded percentage, so 40.004% is a
/// review even though it prints as 40.00.
pub fn assess(stats: &SessionStats) -> Assessment {
    let distracted_frames = stats.distracted_frames();
    let percentage = 100.0 * distracted_frames as f64 / stats.total_frames.max(1) as f64;

    Assessment {
        total_frames: stats.total_frames,
        distracted_frames,
        percentage: round2(percentage),
        verdict: Verdict::from_percentage(percentage),
        breakdown: Breakdown::from(stats),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u64, focus_lost: u64) -> SessionStats {
        SessionStats {
            total_frames: total,
            focus_lost_frames: focus_lost,
            focus_lost_events: u64::from(focus_lost > 0),
            ..SessionStats::default()
        }
    }

    #[test]
    fn all_centered_passes() {
        let a = assess(&stats(100, 0));
        assert_eq!(a.distracted_frames, 0);
        assert_eq!(a.percentage, 0.0);
        assert_eq!(a.verdict, Verdict::Pass);
    }

    #[test]
    fn forty_one_percent_is_review() {
        let a = assess(&stats(100, 41));
        assert_eq!(a.distracted_frames, 41);
        assert_eq!(a.percentage, 41.0);
        assert_eq!(a.verdict, Verdict::Review);
        assert_eq!(a.breakdown.focus_lost_frames, 41);
        assert_eq!(a.breakdown.focus_lost_events, 1);
    }

    #[test]
    fn exactly_forty_percent_passes() {
        assert_eq!(assess(&stats(100, 40)).verdict, Verdict::Pass);
    }

    #[test]
    fn verdict_uses_unrounded_percentage() {
        // 10001 / 25000 = 40.004%
        let a = assess(&stats(25_000, 10_001));
        assert_eq!(a.percentage, 40.0);
        assert_eq!(a.verdict, Verdict::Review);
    }

    #[test]
    fn empty_session_is_zero_percent() {
        let a = assess(&SessionStats::default());
        assert_eq!(a.total_frames, 0);
        assert_eq!(a.percentage, 0.0);
        assert_eq!(a.verdict, Verdict::Pass);
    }

    #[test]
    fn percentage_is_rounded_to_two_places() {
        let a = assess(&stats(3, 1));
        assert_eq!(a.percentage, 33.33);
    }

    #[test]
    fn breakdown_copies_every_category() {
        let s = SessionStats {
            total_frames: 20,
            focus_lost_frames: 1,
            focus_lost_events: 1,
            prohibited_object_frames: 2,
            no_face_frames: 3,
            gaze_left_frames: 4,
            gaze_right_frames: 5,
            gaze_up_frames: 1,
            gaze_down_frames: 2,
        };
        let a = assess(&s);
        assert_eq!(a.distracted_frames, 18);
        assert_eq!(a.percentage, 90.0);
        assert_eq!(
            a.breakdown,
            Breakdown {
                focus_lost_frames: 1,
                focus_lost_events: 1,
                object_alert_frames: 2,
                no_face_frames: 3,
                gaze_left_frames: 4,
                gaze_right_frames: 5,
                gaze_up_frames: 1,
                gaze_down_frames: 2,
            }
        );
    }
}
