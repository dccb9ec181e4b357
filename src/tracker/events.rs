//! Events posted by UI collaborators and drained by the controller at frame
//! boundaries.

use crossbeam_channel::Sender;

use crate::tracker::rect::Rect;

/// User commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Stop tracking; the learned appearance is kept
    Cancel,
    /// Suspend or resume frame admission
    TogglePause,
    /// Show or hide diagnostic rendering
    ToggleDebug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    SelectionStart { x: i32, y: i32 },
    SelectionUpdate { x: i32, y: i32 },
    /// Final rectangle, already clamped by the sender to frame bounds
    SelectionEnd(Rect),
    Command(Command),
}

/// Cloneable handle for posting [`TrackerEvent`]s to a controller.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<TrackerEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: Sender<TrackerEvent>) -> Self {
        Self { tx }
    }

    /// Post an event. Returns `false` once the controller has been dropped.
    pub fn send(&self, event: TrackerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn start_selection(&self, x: i32, y: i32) -> bool {
        self.send(TrackerEvent::SelectionStart { x, y })
    }

    pub fn update_selection(&self, x: i32, y: i32) -> bool {
        self.send(TrackerEvent::SelectionUpdate { x, y })
    }

    pub fn end_selection(&self, rect: Rect) -> bool {
        self.send(TrackerEvent::SelectionEnd(rect))
    }

    /// Post a complete drag from `rect`'s top-left to its bottom-right.
    pub fn select(&self, rect: Rect) -> bool {
        self.start_selection(rect.x, rect.y)
            && self.update_selection(rect.x + rect.width, rect.y + rect.height)
            && self.end_selection(rect)
    }

    pub fn command(&self, command: Command) -> bool {
        self.send(TrackerEvent::Command(command))
    }
}
