//! Head orientation from five face landmarks.
//!
//! The horizontal ratio compares the nose-to-left-edge distance with the
//! nose-to-right-edge distance; the vertical ratio compares nose-to-forehead
//! with nose-to-chin. Both are scale free, so camera resolution and the
//! subject's distance from the camera do not move the boundaries.
//!
//! Thresholds and the denominator clamp are fixed. Changing any of them
//! shifts classification boundaries for previously recorded sessions.

use serde::{Deserialize, Serialize};

use crate::signals::FaceLandmarks;

/// Lower bound for the right-hand and chin distances.
pub const MIN_DENOMINATOR: f64 = 0.001;
/// `ratio_h` strictly below this is a left turn.
pub const LEFT_RATIO: f64 = 0.4;
/// `ratio_h` strictly above this is a right turn.
pub const RIGHT_RATIO: f64 = 2.5;
/// `ratio_v` strictly below this is an upward tilt.
pub const UP_RATIO: f64 = 0.6;
/// `ratio_v` strictly above this is a downward tilt.
pub const DOWN_RATIO: f64 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeDirection {
    Left,
    Right,
    Up,
    Down,
    Centered,
}

/// Raw ratios behind a classification, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeRatios {
    pub horizontal: f64,
    pub vertical: f64,
}

impl GazeRatios {
    pub fn from_landmarks(lm: &FaceLandmarks) -> Self {
        let dist_nose_left = lm.nose.x - lm.left_face.x;
        let dist_nose_right = (lm.right_face.x - lm.nose.x).max(MIN_DENOMINATOR);

        let dist_nose_forehead = lm.nose.y - lm.forehead.y;
        let dist_nose_chin = (lm.chin.y - lm.nose.y).max(MIN_DENOMINATOR);

        Self {
            horizontal: dist_nose_left / dist_nose_right,
            vertical: dist_nose_forehead / dist_nose_chin,
        }
    }

    /// Horizontal checks run first: lateral turns win over tilts.
    pub fn direction(&self) -> GazeDirection {
        if self.horizontal < LEFT_RATIO {
            GazeDirection::Left
        } else if self.horizontal > RIGHT_RATIO {
            GazeDirection::Right
        } else if self.vertical < UP_RATIO {
            GazeDirection::Up
        } else if self.vertical > DOWN_RATIO {
            GazeDirection::Down
        } else {
            GazeDirection::Centered
        }
    }
}

/// Classify where the subject's head is pointing.
pub fn classify_gaze(landmarks: &FaceLandmarks) -> GazeDirection {
    GazeRatios::from_landmarks(landmarks).direction()
}
