//! TrackerPipeline for driving a controller from a frame source.

use std::ops::ControlFlow;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::error::TrackerError;
use crate::tracker::{AppearanceModel, EventSender, Frame, FrameOutput, TrackerController};

use super::{FrameSink, FrameSource};

/// How long a paused pipeline blocks on the event queue per wait.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Errors from a pipeline step.
#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error("frame source failed")]
    Source(#[source] E),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Outcome of one [`TrackerPipeline::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineStep {
    /// A frame was admitted and processed
    Frame(FrameOutput),
    /// Paused; no frame was captured
    Paused,
    /// The source is exhausted
    EndOfStream,
}

/// Bundles a [`FrameSource`], a [`TrackerController`] and an optional
/// [`FrameSink`]. Frames are processed strictly one at a time.
pub struct TrackerPipeline<S: FrameSource, M: AppearanceModel> {
    source: S,
    controller: TrackerController<M>,
    sink: Option<Box<dyn FrameSink>>,
    last_frame: Option<Frame>,
}

impl<S: FrameSource, M: AppearanceModel> TrackerPipeline<S, M> {
    pub fn new(source: S, controller: TrackerController<M>) -> Self {
        Self {
            source,
            controller,
            sink: None,
            last_frame: None,
        }
    }

    /// Render every processed frame to `sink` while debug display is on.
    pub fn with_sink(mut self, sink: impl FrameSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Collect training descriptors, one per exemplar.
    ///
    /// `present` is called with each exemplar until a selection over it is
    /// captured; it is expected to show the exemplar and post selection
    /// events through the sender. Returning `ControlFlow::Break` aborts
    /// training.
    pub fn train<I, F>(&mut self, exemplars: I, mut present: F) -> Result<(), TrackerError>
    where
        I: IntoIterator<Item = Frame>,
        F: FnMut(&Frame, &EventSender) -> ControlFlow<()>,
    {
        let sender = self.controller.events();
        for exemplar in exemplars {
            let (before, required) = self.controller.training_progress();
            if before >= required {
                break;
            }
            loop {
                if present(&exemplar, &sender).is_break() {
                    return Err(TrackerError::Training {
                        captured: before,
                        required,
                    });
                }
                self.controller.handle_events(&exemplar)?;
                if self.controller.training_progress().0 > before {
                    break;
                }
            }
        }

        let (captured, required) = self.controller.training_progress();
        if captured < required {
            return Err(TrackerError::Training { captured, required });
        }
        info!(captured, "training complete");
        Ok(())
    }

    /// Admit and process at most one frame.
    ///
    /// Events are drained against the previously shown frame first. While
    /// paused no frame is captured.
    pub fn tick(&mut self) -> Result<PipelineStep, PipelineError<S::Error>> {
        if let Some(frame) = &self.last_frame {
            self.controller.handle_events(frame)?;
        }
        if self.controller.is_paused() {
            return Ok(PipelineStep::Paused);
        }

        let Some(frame) = self.source.next_frame().map_err(PipelineError::Source)? else {
            info!("end of stream");
            return Ok(PipelineStep::EndOfStream);
        };

        let out = self.controller.track(&frame);
        if self.controller.is_debug() {
            if let Some(sink) = self.sink.as_mut() {
                sink.render(&frame, &out);
            }
        }
        self.last_frame = Some(frame);
        Ok(PipelineStep::Frame(out))
    }

    /// Tick until the source is exhausted and return the number of frames
    /// processed. While paused, blocks on events from other threads.
    pub fn run(&mut self) -> Result<u64, PipelineError<S::Error>> {
        let mut frames = 0;
        loop {
            match self.tick()? {
                PipelineStep::Frame(_) => frames += 1,
                PipelineStep::Paused => self.wait_while_paused()?,
                PipelineStep::EndOfStream => return Ok(frames),
            }
        }
    }

    fn wait_while_paused(&mut self) -> Result<(), TrackerError> {
        match &self.last_frame {
            Some(frame) => {
                self.controller.wait_for_event(frame, PAUSE_POLL)?;
            }
            None => std::thread::sleep(PAUSE_POLL),
        }
        Ok(())
    }

    /// Get a reference to the underlying controller.
    pub fn controller(&self) -> &TrackerController<M> {
        &self.controller
    }

    /// Get a mutable reference to the underlying controller.
    pub fn controller_mut(&mut self) -> &mut TrackerController<M> {
        &mut self.controller
    }

    /// The most recently admitted frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}
