//! Rubber-band selection driven by start/update/end events.

use crate::tracker::rect::Rect;

/// An in-progress selection drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionDrag {
    origin: (i32, i32),
    candidate: Rect,
}

impl SelectionDrag {
    pub fn start(origin: (i32, i32)) -> Self {
        Self {
            origin,
            candidate: Rect::new(origin.0, origin.1, 0, 0),
        }
    }

    /// Stretch the candidate to `point`, clamped to `bounds`.
    pub fn update(&mut self, point: (i32, i32), bounds: Rect) {
        self.candidate = Rect::from_corners(self.origin, point).intersect(&bounds);
    }

    /// The rectangle as currently drawn, for highlighting.
    pub fn candidate(&self) -> Rect {
        self.candidate
    }
}

/// Clamp a finished selection to `bounds`; `None` when nothing of positive
/// area remains.
pub fn finish(rect: Rect, bounds: Rect) -> Option<Rect> {
    let rect = rect.intersect(&bounds);
    (!rect.is_empty()).then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_is_clamped() {
        let bounds = Rect::frame(100, 100);
        let mut drag = SelectionDrag::start((90, 10));
        drag.update((130, 40), bounds);
        assert_eq!(drag.candidate(), Rect::new(90, 10, 10, 30));

        drag.update((20, -5), bounds);
        assert_eq!(drag.candidate(), Rect::new(20, 0, 70, 10));
    }

    #[test]
    fn test_finish_rejects_zero_area() {
        let bounds = Rect::frame(100, 100);
        assert_eq!(finish(Rect::new(10, 10, 0, 5), bounds), None);
        assert_eq!(finish(Rect::new(200, 10, 5, 5), bounds), None);
        assert_eq!(
            finish(Rect::new(95, 10, 20, 5), bounds),
            Some(Rect::new(95, 10, 5, 5))
        );
    }
}
