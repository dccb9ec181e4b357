//! Tracker state machine: selection, training, tracking and reacquisition.

use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::tracker::config::TrackerConfig;
use crate::tracker::events::{Command, EventSender, TrackerEvent};
use crate::tracker::frame::Frame;
use crate::tracker::kalman_filter::MotionEstimator;
use crate::tracker::matching::{
    AdaptiveWindowMatcher, AdaptiveWindowPrimitive, AppearanceModel, MatchResult,
    ScoringPrimitive, TemplateMatcher,
};
use crate::tracker::rect::{Point, Rect};
use crate::tracker::search_window::{SearchMode, SearchWindowPlanner};
use crate::tracker::selection::{self, SelectionDrag};
use crate::tracker::track_state::TrackerState;

/// What happened to a frame handed to [`TrackerController::track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// No target is being tracked
    Inactive,
    /// The controller is paused; the frame was not processed
    Paused,
    /// The best match cleared the acceptance threshold
    Accepted,
    /// No acceptable match; the estimate was left uncorrected
    Rejected,
}

/// Per-frame results for rendering and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Number of frames processed by the tracking loop so far
    pub frame_index: u64,
    /// State after this frame
    pub state: TrackerState,
    pub status: FrameStatus,
    /// Prior position from the motion model
    pub predicted: Option<Point>,
    /// Centre of the best match, if anything was scored
    pub measured: Option<Point>,
    /// Posterior position; only set when the match was accepted
    pub corrected: Option<Point>,
    /// Best matched rectangle
    pub matched: Option<Rect>,
    /// Region that was searched
    pub search_window: Option<Rect>,
    pub score: Option<f32>,
    /// Descriptors evaluated this frame
    pub scanned: usize,
    /// Selection being drawn, for highlighting
    pub selection: Option<Rect>,
}

/// Where the next frame should be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextSearch {
    Narrow,
    Fallback,
    FullFrame,
}

/// Owns the target state, appearance model and configuration, and sequences
/// each frame through predict, plan, match and correct.
pub struct TrackerController<M: AppearanceModel> {
    config: TrackerConfig,
    model: M,
    estimator: MotionEstimator,
    planner: SearchWindowPlanner,
    state: TrackerState,
    /// State to return to when a selection is abandoned
    resume_state: TrackerState,
    drag: Option<SelectionDrag>,
    next_search: NextSearch,
    last_extent: (i32, i32),
    last_position: Point,
    paused: bool,
    debug: bool,
    frame_index: u64,
    sender: EventSender,
    events: Receiver<TrackerEvent>,
}

impl<S: ScoringPrimitive> TrackerController<TemplateMatcher<S>> {
    /// Controller for the multi-template variant.
    pub fn with_templates(config: TrackerConfig, scorer: S) -> Result<Self> {
        let model = TemplateMatcher::new(
            scorer,
            config.template_count,
            config.early_exit_threshold,
        );
        Self::new(config, model)
    }
}

impl<P: AdaptiveWindowPrimitive> TrackerController<AdaptiveWindowMatcher<P>> {
    /// Controller for the back-projection variant.
    pub fn with_adaptive_window(config: TrackerConfig, primitive: P) -> Result<Self> {
        Self::new(config, AdaptiveWindowMatcher::new(primitive))
    }
}

impl<M: AppearanceModel> TrackerController<M> {
    pub fn new(config: TrackerConfig, model: M) -> Result<Self> {
        config.validate()?;
        let (tx, rx) = unbounded();
        Ok(Self {
            estimator: MotionEstimator::new(config.motion()),
            planner: SearchWindowPlanner::new(
                config.search_expansion_factor,
                config.fallback_window_fraction,
            ),
            config,
            model,
            state: TrackerState::Idle,
            resume_state: TrackerState::Idle,
            drag: None,
            next_search: NextSearch::Narrow,
            last_extent: (0, 0),
            last_position: Point::default(),
            paused: false,
            debug: true,
            frame_index: 0,
            sender: EventSender::new(tx),
            events: rx,
        })
    }

    /// Handle for UI collaborators to post events.
    pub fn events(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn estimator(&self) -> &MotionEstimator {
        &self.estimator
    }

    /// `(captured, required)` training exemplars.
    pub fn training_progress(&self) -> (usize, usize) {
        (self.model.captured(), self.model.required_exemplars())
    }

    /// Drain every queued event against `frame`, the frame currently shown
    /// (a training exemplar while training, the last live frame otherwise).
    pub fn handle_events(&mut self, frame: &Frame) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event, frame)?;
        }
        Ok(())
    }

    /// Block for up to `timeout` until an event arrives, then drain the queue
    /// against `frame`. Returns `false` if the wait timed out.
    pub fn wait_for_event(&mut self, frame: &Frame, timeout: Duration) -> Result<bool> {
        let Ok(event) = self.events.recv_timeout(timeout) else {
            return Ok(false);
        };
        self.apply(event, frame)?;
        self.handle_events(frame)?;
        Ok(true)
    }

    fn apply(&mut self, event: TrackerEvent, frame: &Frame) -> Result<()> {
        match event {
            TrackerEvent::SelectionStart { x, y } => {
                if self.state != TrackerState::Selecting {
                    self.resume_state = self.state;
                }
                self.drag = Some(SelectionDrag::start((x, y)));
                self.state = TrackerState::Selecting;
            }
            TrackerEvent::SelectionUpdate { x, y } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.update((x, y), frame.bounds());
                }
            }
            TrackerEvent::SelectionEnd(rect) => {
                if self.state != TrackerState::Selecting {
                    return Ok(());
                }
                self.drag = None;
                match selection::finish(rect, frame.bounds()) {
                    Some(rect) => self.finish_selection(frame, rect)?,
                    None => {
                        debug!(?rect, "discarding empty selection");
                        self.state = self.resume_state;
                    }
                }
            }
            TrackerEvent::Command(Command::Cancel) => self.cancel(),
            TrackerEvent::Command(Command::TogglePause) => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause toggled");
            }
            TrackerEvent::Command(Command::ToggleDebug) => {
                self.debug = !self.debug;
            }
        }
        Ok(())
    }

    fn finish_selection(&mut self, frame: &Frame, rect: Rect) -> Result<()> {
        if self.model.is_trained() {
            self.begin_tracking(rect);
            return Ok(());
        }

        self.model.capture(frame, rect)?;
        let (captured, required) = self.training_progress();
        info!(captured, required, ?rect, "captured training exemplar");

        if self.model.is_trained() {
            self.begin_tracking(rect);
        } else {
            self.state = TrackerState::Training;
        }
        Ok(())
    }

    /// Start tracking the target under `rect` without going through the event
    /// queue. The appearance model must already be trained.
    pub fn start_tracking(&mut self, frame: &Frame, rect: Rect) -> Result<()> {
        if !self.model.is_trained() {
            let (captured, required) = self.training_progress();
            return Err(TrackerError::Training { captured, required });
        }
        let rect = selection::finish(rect, frame.bounds()).ok_or(TrackerError::EmptySelection)?;
        self.drag = None;
        self.begin_tracking(rect);
        Ok(())
    }

    fn begin_tracking(&mut self, rect: Rect) {
        let center = rect.center();
        self.estimator.reset(center, self.config.motion());
        self.last_extent = rect.size();
        self.last_position = center;
        self.next_search = NextSearch::Narrow;
        self.state = TrackerState::Tracking;
        info!(x = center.x, y = center.y, ?rect, "tracking started");
    }

    /// Stop tracking and discard the target state. The appearance model is kept.
    pub fn cancel(&mut self) {
        if self.state.is_active() {
            self.state = TrackerState::Idle;
        } else if self.state == TrackerState::Selecting && self.resume_state.is_active() {
            self.resume_state = TrackerState::Idle;
        } else {
            return;
        }
        self.estimator = MotionEstimator::new(self.config.motion());
        self.next_search = NextSearch::Narrow;
        info!("tracking cancelled");
    }

    /// The state the tracking loop reports into. While a re-selection is being
    /// drawn over an active track, the loop keeps running against the state
    /// the selection will resume.
    fn loop_state(&mut self) -> Option<&mut TrackerState> {
        if self.state.is_active() {
            Some(&mut self.state)
        } else if self.state == TrackerState::Selecting && self.resume_state.is_active() {
            Some(&mut self.resume_state)
        } else {
            None
        }
    }

    /// Run one frame of the tracking loop.
    pub fn track(&mut self, frame: &Frame) -> FrameOutput {
        let mut out = FrameOutput {
            frame_index: self.frame_index,
            state: self.state,
            status: FrameStatus::Inactive,
            predicted: None,
            measured: None,
            corrected: None,
            matched: None,
            search_window: None,
            score: None,
            scanned: 0,
            selection: self.drag.map(|d| d.candidate()),
        };

        if self.paused {
            out.status = FrameStatus::Paused;
            return out;
        }
        if self.loop_state().is_none() {
            return out;
        }

        self.frame_index += 1;
        out.frame_index = self.frame_index;

        let predicted = self.estimator.predict();
        let mode = match self.next_search {
            NextSearch::Narrow => SearchMode::Narrow {
                center: predicted,
                extent: self.last_extent,
            },
            NextSearch::Fallback => SearchMode::Fallback {
                center: self.last_position,
            },
            NextSearch::FullFrame => SearchMode::FullFrame,
        };
        let region = self.planner.plan(mode, frame.bounds());
        let result = self.model.evaluate(frame, region);

        out.predicted = Some(predicted);
        out.search_window = Some(region);
        out.scanned = result.scanned;
        if result.template.is_some() {
            out.measured = Some(result.location.center());
            out.matched = Some(result.location);
            out.score = Some(result.score);
        }

        let next = if self.is_acceptable(&result) {
            let corrected = self.estimator.correct(result.location.center());
            self.model.promote(&result);
            self.last_extent = result.location.size();
            self.last_position = corrected;
            self.next_search = NextSearch::Narrow;

            out.corrected = Some(corrected);
            out.status = FrameStatus::Accepted;
            TrackerState::Tracking
        } else {
            self.next_search = if result.collapsed {
                NextSearch::Fallback
            } else {
                NextSearch::FullFrame
            };
            out.status = FrameStatus::Rejected;
            TrackerState::Reacquiring
        };
        if let Some(state) = self.loop_state() {
            *state = next;
        }
        out.state = self.state;

        debug!(
            frame = self.frame_index,
            status = ?out.status,
            score = result.score,
            scanned = result.scanned,
            window = ?region,
            "frame tracked"
        );
        out
    }

    fn is_acceptable(&self, result: &MatchResult) -> bool {
        result.template.is_some()
            && !result.collapsed
            && result.score >= self.config.acceptance_threshold
    }
}
