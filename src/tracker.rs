mod config;
mod controller;
mod events;
mod frame;
mod kalman_filter;
mod matching;
mod rect;
mod search_window;
mod selection;
mod template_bank;
mod track_state;

pub use config::TrackerConfig;
pub use controller::{FrameOutput, FrameStatus, TrackerController};
pub use events::{Command, EventSender, TrackerEvent};
pub use frame::Frame;
pub use kalman_filter::{MotionConfig, MotionEstimator, TargetState};
pub use matching::{
    AdaptiveMatch, AdaptiveWindowMatcher, AdaptiveWindowPrimitive, AppearanceModel, MatchResult,
    Score, ScoringPrimitive, TemplateMatcher, scan_bank,
};
pub use rect::{Point, Rect};
pub use search_window::{SearchMode, SearchWindowPlanner};
pub use selection::SelectionDrag;
pub use template_bank::{TemplateBank, TemplateDescriptor};
pub use track_state::TrackerState;
