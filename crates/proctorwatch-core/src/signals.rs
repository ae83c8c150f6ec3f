//! Per-frame input signals supplied by the host.
//!
//! Nothing here is produced by the engine: the object detector, the face
//! landmark detector and the OS focus events all live outside the crate.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// COCO class id the object detector uses for a person.
pub const COCO_PERSON: u32 = 0;
/// COCO class id the object detector uses for a cell phone.
pub const COCO_CELL_PHONE: u32 = 67;

/// A 2D landmark in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The five face landmarks the gaze classifier reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub nose: LandmarkPoint,
    pub left_face: LandmarkPoint,
    pub right_face: LandmarkPoint,
    pub chin: LandmarkPoint,
    pub forehead: LandmarkPoint,
}

impl FaceLandmarks {
    /// Number of points a complete landmark set carries.
    pub const POINTS: usize = 5;

    /// Build from an ordered slice: nose, left face, right face, chin, forehead.
    ///
    /// # Errors
    /// Returns `MissingLandmarks` when fewer than five points are given.
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, ValidationError> {
        match points {
            [nose, left_face, right_face, chin, forehead, ..] => Ok(Self {
                nose: *nose,
                left_face: *left_face,
                right_face: *right_face,
                chin: *chin,
                forehead: *forehead,
            }),
            _ => Err(ValidationError::MissingLandmarks {
                expected: Self::POINTS,
                got: points.len(),
            }),
        }
    }

    /// Check every coordinate is a real number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("nose", &self.nose),
            ("left_face", &self.left_face),
            ("right_face", &self.right_face),
            ("chin", &self.chin),
            ("forehead", &self.forehead),
        ];
        for (name, point) in named {
            if !point.is_finite() {
                return Err(ValidationError::NonFiniteCoordinate { point: name });
            }
        }
        Ok(())
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let s = |p: LandmarkPoint| LandmarkPoint::new(p.x * factor, p.y * factor);
        Self {
            nose: s(self.nose),
            left_face: s(self.left_face),
            right_face: s(self.right_face),
            chin: s(self.chin),
            forehead: s(self.forehead),
        }
    }
}

/// Landmarks as hosts send them: an ordered list, or named points any of
/// which may be missing.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLandmarks {
    Ordered(Vec<LandmarkPoint>),
    Named {
        nose: Option<LandmarkPoint>,
        left_face: Option<LandmarkPoint>,
        right_face: Option<LandmarkPoint>,
        chin: Option<LandmarkPoint>,
        forehead: Option<LandmarkPoint>,
    },
}

impl RawLandmarks {
    fn complete(self) -> Result<FaceLandmarks, ValidationError> {
        match self {
            RawLandmarks::Ordered(points) => FaceLandmarks::from_points(&points),
            RawLandmarks::Named {
                nose,
                left_face,
                right_face,
                chin,
                forehead,
            } => {
                let present: Vec<LandmarkPoint> = [nose, left_face, right_face, chin, forehead]
                    .into_iter()
                    .flatten()
                    .collect();
                FaceLandmarks::from_points(&present)
            }
        }
    }
}

/// An incomplete landmark set reads as "no face" rather than failing the frame.
fn lenient_landmarks<'de, D>(deserializer: D) -> Result<Option<FaceLandmarks>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawLandmarks>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.complete() {
        Ok(landmarks) => Ok(Some(landmarks)),
        Err(e) => {
            debug!("dropping landmarks: {e}");
            Ok(None)
        }
    }
}

/// Object classes reported by the detector.
///
/// Accepts either a name (`"phone"`, `"cell phone"`, `"person"`) or the raw
/// COCO class id. Unknown classes serialize back as their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ClassRepr", into = "ClassRepr")]
pub enum ObjectClass {
    Person,
    Phone,
    /// Any other detector class, by raw id.
    Other(u32),
}

impl ObjectClass {
    pub fn from_coco_id(id: u32) -> Self {
        match id {
            COCO_PERSON => ObjectClass::Person,
            COCO_CELL_PHONE => ObjectClass::Phone,
            other => ObjectClass::Other(other),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ClassRepr {
    Id(u32),
    Name(NamedClass),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamedClass {
    Person,
    #[serde(alias = "cell phone")]
    Phone,
}

impl From<ClassRepr> for ObjectClass {
    fn from(repr: ClassRepr) -> Self {
        match repr {
            ClassRepr::Id(id) => ObjectClass::from_coco_id(id),
            ClassRepr::Name(NamedClass::Person) => ObjectClass::Person,
            ClassRepr::Name(NamedClass::Phone) => ObjectClass::Phone,
        }
    }
}

impl From<ObjectClass> for ClassRepr {
    fn from(class: ObjectClass) -> Self {
        match class {
            ObjectClass::Person => ClassRepr::Name(NamedClass::Person),
            ObjectClass::Phone => ClassRepr::Name(NamedClass::Phone),
            ObjectClass::Other(id) => ClassRepr::Id(id),
        }
    }
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One candidate from the object detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub class: ObjectClass,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl DetectedObject {
    /// Check that confidence lies in [0, 1]. NaN is rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if (0.0..=1.0).contains(&self.confidence) {
            Ok(())
        } else {
            Err(ValidationError::ConfidenceOutOfRange(self.confidence))
        }
    }
}

/// Everything the host observed for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSignals {
    #[serde(default = "default_true")]
    pub window_focused: bool,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    /// `None` when the landmark detector found no face.
    #[serde(default, deserialize_with = "lenient_landmarks")]
    pub landmarks: Option<FaceLandmarks>,
}

fn default_true() -> bool {
    true
}

impl Default for FrameSignals {
    fn default() -> Self {
        Self {
            window_focused: true,
            objects: Vec::new(),
            landmarks: None,
        }
    }
}

impl FrameSignals {
    pub fn focused(landmarks: Option<FaceLandmarks>) -> Self {
        Self {
            landmarks,
            ..Self::default()
        }
    }

    pub fn unfocused() -> Self {
        Self {
            window_focused: false,
            ..Self::default()
        }
    }

    pub fn with_object(mut self, object: DetectedObject) -> Self {
        self.objects.push(object);
        self
    }
}
