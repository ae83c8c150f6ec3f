//! Prohibited object detection over one frame's detector output.

use log::debug;

use crate::signals::{DetectedObject, ObjectClass};

/// A phone must be reported with confidence strictly above this.
pub const PHONE_MIN_CONFIDENCE: f64 = 0.4;

/// Alert text shown while a prohibited object is in view.
pub const PHONE_ALERT: &str = "ALERT: PHONE DETECTED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAlert {
    pub present: bool,
    pub label: &'static str,
}

impl ObjectAlert {
    const NONE: ObjectAlert = ObjectAlert {
        present: false,
        label: "",
    };
}

fn is_prohibited(object: &DetectedObject) -> bool {
    if let Err(e) = object.validate() {
        debug!("ignoring detection: {e}");
        return false;
    }
    object.class == ObjectClass::Phone && object.confidence > PHONE_MIN_CONFIDENCE
}

/// Scan a frame's detections for a phone.
///
/// Several qualifying phones still produce a single alert. Detections with a
/// confidence outside [0, 1] are treated as if they were never reported.
pub fn detect_prohibited(objects: &[DetectedObject]) -> ObjectAlert {
    if objects.iter().any(is_prohibited) {
        ObjectAlert {
            present: true,
            label: PHONE_ALERT,
        }
    } else {
        ObjectAlert::NONE
    }
}
