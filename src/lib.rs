//! Predictive single-target tracking.
//!
//! A [`TrackerController`] keeps a bounding region locked onto a target by
//! fusing a constant-velocity Kalman prediction with an appearance match.
//! Each frame it predicts, plans a search window, scans a move-to-front
//! [`TemplateBank`] (or a single back-projection model) and corrects the
//! motion estimate only when the match clears the acceptance threshold.
//!
//! The raw scoring numerics are supplied by the caller through
//! [`ScoringPrimitive`] or [`AdaptiveWindowPrimitive`].

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use integration::{FrameSink, FrameSource, PipelineStep, TrackerPipeline};
pub use tracker::{
    AdaptiveMatch, AdaptiveWindowMatcher, AdaptiveWindowPrimitive, AppearanceModel, Command,
    EventSender, Frame, FrameOutput, FrameStatus, MatchResult, MotionEstimator, Point, Rect,
    Score, ScoringPrimitive, SearchWindowPlanner, TemplateBank, TemplateDescriptor,
    TemplateMatcher, TrackerConfig, TrackerController, TrackerEvent, TrackerState,
};
