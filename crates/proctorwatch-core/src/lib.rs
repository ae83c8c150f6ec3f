//! # ProctorWatch Core Library
//!
//! This library implements the attention state engine behind ProctorWatch.
//! It classifies each frame of a proctored session from signals the host has
//! already computed (window focus, object detections, face landmarks) and
//! aggregates those classifications into a final report and verdict. It never
//! touches video or runs inference itself.
//!
//! ## Architecture
//!
//! - **Classifier**: pure per-frame policy. Focus loss beats a prohibited
//!   object, which beats a missing face, which beats head orientation
//! - **Session**: a one-way `Idle -> Active -> Finished` state machine that
//!   owns the counters, plus a mutex-guarded facade for hosts
//! - **Report**: distraction percentage, PASS/REVIEW verdict and breakdown
//! - **Storage**: TOML configuration and SQLite report history
//!
//! ## Key Components
//!
//! - [`classify_frame`]: one frame of signals to one [`FrameState`]
//! - [`SessionAggregator`]: session counters and lifecycle
//! - [`SessionMonitor`]: thread-safe `start`/`record`/`finish` for hosts
//! - [`Report`]: the finished session's assessment
//! - [`ReportStore`]: report history persistence
//! - [`Config`]: application configuration management

pub mod classifier;
pub mod error;
pub mod events;
pub mod report;
pub mod session;
pub mod signals;
pub mod storage;

pub use classifier::{classify_frame, classify_gaze, detect_prohibited, FrameState, GazeDirection};
pub use error::{ConfigError, CoreError, DatabaseError, SessionError, ValidationError};
pub use events::Event;
pub use report::{assess, Assessment, Breakdown, Report, Verdict};
pub use session::{SessionAggregator, SessionMonitor, SessionState, SessionStats};
pub use signals::{
    BoundingBox, DetectedObject, FaceLandmarks, FrameSignals, LandmarkPoint, ObjectClass,
};
pub use storage::{Config, HistorySummary, ReportFormat, ReportStore};
