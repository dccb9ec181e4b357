//! Rendering collaborator.

use crate::tracker::{Frame, FrameOutput, Point, Rect};

/// RGB colour.
pub type Color = [u8; 3];

pub const RED: Color = [255, 0, 0];
pub const YELLOW: Color = [255, 255, 0];
pub const WHITE: Color = [255, 255, 255];

/// Draws tracker output over frames.
///
/// Shapes drawn before [`show`](FrameSink::show) are overlaid on the frame
/// passed to it.
pub trait FrameSink {
    /// Draw an `X` of half-size `size` centred on `center`.
    fn draw_cross(&mut self, center: Point, color: Color, size: u32);

    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Display `frame` with the pending overlay.
    fn show(&mut self, frame: &Frame);

    /// Draw the standard overlay for one frame: search window and corrected
    /// estimate in red, match and measured centre in yellow, selection in
    /// progress in white.
    fn render(&mut self, frame: &Frame, out: &FrameOutput) {
        if let Some(window) = out.search_window {
            self.draw_rect(window, RED);
        }
        if let Some(matched) = out.matched {
            self.draw_rect(matched, YELLOW);
        }
        if let Some(selection) = out.selection {
            self.draw_rect(selection, WHITE);
        }
        if let Some(corrected) = out.corrected {
            self.draw_cross(corrected, RED, 5);
        }
        if let Some(measured) = out.measured {
            self.draw_cross(measured, YELLOW, 5);
        }
        self.show(frame);
    }
}
