//! Per-frame attention state.
//!
//! ## Priority
//!
//! ```text
//! focus lost > prohibited object > no face > gaze direction
//! ```
//!
//! A frame is attributed to exactly one state, the most severe one that
//! applies, so no frame is ever counted twice.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::gaze::{classify_gaze, GazeDirection};
use super::objects::detect_prohibited;
use crate::signals::FrameSignals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameState {
    FocusLost,
    ProhibitedObject,
    GazeLeft,
    GazeRight,
    GazeUp,
    GazeDown,
    Centered,
    NoFace,
}

impl FrameState {
    pub const ALL: [FrameState; 8] = [
        FrameState::FocusLost,
        FrameState::ProhibitedObject,
        FrameState::GazeLeft,
        FrameState::GazeRight,
        FrameState::GazeUp,
        FrameState::GazeDown,
        FrameState::Centered,
        FrameState::NoFace,
    ];

    /// Every state except `Centered` counts against the subject.
    pub fn is_distraction(self) -> bool {
        self != FrameState::Centered
    }

    /// Overlay text for a host that draws on the video feed.
    pub fn status_text(self) -> &'static str {
        match self {
            FrameState::FocusLost => "ALERT: WINDOW INACTIVE",
            FrameState::ProhibitedObject => super::objects::PHONE_ALERT,
            FrameState::GazeLeft => "GAZE: LEFT",
            FrameState::GazeRight => "GAZE: RIGHT",
            FrameState::GazeUp => "GAZE: UP",
            FrameState::GazeDown => "GAZE: DOWN",
            FrameState::Centered => "OK",
            FrameState::NoFace => "NO FACE DETECTED",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FrameState::FocusLost => "FOCUS_LOST",
            FrameState::ProhibitedObject => "PROHIBITED_OBJECT",
            FrameState::GazeLeft => "GAZE_LEFT",
            FrameState::GazeRight => "GAZE_RIGHT",
            FrameState::GazeUp => "GAZE_UP",
            FrameState::GazeDown => "GAZE_DOWN",
            FrameState::Centered => "CENTERED",
            FrameState::NoFace => "NO_FACE",
        }
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GazeDirection> for FrameState {
    fn from(direction: GazeDirection) -> Self {
        match direction {
            GazeDirection::Left => FrameState::GazeLeft,
            GazeDirection::Right => FrameState::GazeRight,
            GazeDirection::Up => FrameState::GazeUp,
            GazeDirection::Down => FrameState::GazeDown,
            GazeDirection::Centered => FrameState::Centered,
        }
    }
}

/// Reduce one frame's signals to a single state.
///
/// Malformed landmarks degrade to `NoFace` instead of failing the frame.
pub fn classify_frame(signals: &FrameSignals) -> FrameState {
    if !signals.window_focused {
        return FrameState::FocusLost;
    }

    if detect_prohibited(&signals.objects).present {
        return FrameState::ProhibitedObject;
    }

    let Some(landmarks) = signals.landmarks.as_ref() else {
        return FrameState::NoFace;
    };

    if let Err(e) = landmarks.validate() {
        debug!("treating frame as no face: {e}");
        return FrameState::NoFace;
    }

    classify_gaze(landmarks).into()
}
