use serde::{Deserialize, Serialize};

use crate::classifier::FrameState;

/// Running counters for one session.
///
/// `Centered` frames are never stored on their own; they are the part of
/// `total_frames` not covered by any other counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_frames: u64,
    pub focus_lost_frames: u64,
    /// Focused-to-unfocused edges, not frames.
    pub focus_lost_events: u64,
    pub prohibited_object_frames: u64,
    pub no_face_frames: u64,
    pub gaze_left_frames: u64,
    pub gaze_right_frames: u64,
    pub gaze_up_frames: u64,
    pub gaze_down_frames: u64,
}

impl SessionStats {
    /// Frames attributed to `state`.
    pub fn count(&self, state: FrameState) -> u64 {
        match state {
            FrameState::FocusLost => self.focus_lost_frames,
            FrameState::ProhibitedObject => self.prohibited_object_frames,
            FrameState::GazeLeft => self.gaze_left_frames,
            FrameState::GazeRight => self.gaze_right_frames,
            FrameState::GazeUp => self.gaze_up_frames,
            FrameState::GazeDown => self.gaze_down_frames,
            FrameState::NoFace => self.no_face_frames,
            FrameState::Centered => self.centered_frames(),
        }
    }

    /// Sum of every stored (non-centered) counter.
    pub fn distracted_frames(&self) -> u64 {
        self.focus_lost_frames
            + self.prohibited_object_frames
            + self.no_face_frames
            + self.gaze_left_frames
            + self.gaze_right_frames
            + self.gaze_up_frames
            + self.gaze_down_frames
    }

    pub fn centered_frames(&self) -> u64 {
        self.total_frames.saturating_sub(self.distracted_frames())
    }

    pub(crate) fn increment(&mut self, state: FrameState) {
        self.total_frames += 1;
        let slot = match state {
            FrameState::FocusLost => &mut self.focus_lost_frames,
            FrameState::ProhibitedObject => &mut self.prohibited_object_frames,
            FrameState::GazeLeft => &mut self.gaze_left_frames,
            FrameState::GazeRight => &mut self.gaze_right_frames,
            FrameState::GazeUp => &mut self.gaze_up_frames,
            FrameState::GazeDown => &mut self.gaze_down_frames,
            FrameState::NoFace => &mut self.no_face_frames,
            FrameState::Centered => return,
        };
        *slot += 1;
    }
}
