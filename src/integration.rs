//! Collaborator seams around the tracker.
//!
//! Frame capture and rendering stay outside the core; this module defines
//! the traits they implement and a pipeline that drives a
//! [`TrackerController`](crate::TrackerController) one frame at a time.

mod pipeline;
mod sink;
mod source;

pub use pipeline::{PipelineError, PipelineStep, TrackerPipeline};
pub use sink::{Color, FrameSink, RED, WHITE, YELLOW};
pub use source::FrameSource;
