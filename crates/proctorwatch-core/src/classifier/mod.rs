mod frame;
mod gaze;
mod objects;

pub use frame::{classify_frame, FrameState};
pub use gaze::{
    classify_gaze, GazeDirection, GazeRatios, DOWN_RATIO, LEFT_RATIO, MIN_DENOMINATOR,
    RIGHT_RATIO, UP_RATIO,
};
pub use objects::{detect_prohibited, ObjectAlert, PHONE_ALERT, PHONE_MIN_CONFIDENCE};
