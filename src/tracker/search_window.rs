//! Per-frame search window planning.

use crate::tracker::rect::{Point, Rect};

/// How the next search region should be derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMode {
    /// Last match accepted: search around the prediction, scaled from the
    /// last matched extent.
    Narrow { center: Point, extent: (i32, i32) },
    /// Adaptive window collapsed: search a fixed-radius box around the last
    /// corrected position.
    Fallback { center: Point },
    /// Last match rejected: search everything.
    FullFrame,
}

/// Derives the search region for a frame. Every planned window is non-empty
/// and lies inside the frame.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindowPlanner {
    expansion_factor: f32,
    fallback_fraction: f32,
}

impl SearchWindowPlanner {
    pub fn new(expansion_factor: f32, fallback_fraction: f32) -> Self {
        Self {
            expansion_factor,
            fallback_fraction,
        }
    }

    pub fn plan(&self, mode: SearchMode, bounds: Rect) -> Rect {
        let window = match mode {
            SearchMode::Narrow { center, extent } => {
                let w = (extent.0.max(1) as f32 * self.expansion_factor).ceil() as i32;
                let h = (extent.1.max(1) as f32 * self.expansion_factor).ceil() as i32;
                Rect::centered_at(center, w, h).intersect(&bounds)
            }
            SearchMode::Fallback { center } => self.fallback(center, bounds),
            SearchMode::FullFrame => bounds,
        };

        // A prediction that has left the frame leaves nothing to clamp to.
        if window.is_empty() { bounds } else { window }
    }

    /// Radius of the recovery window: the configured fraction of the shorter
    /// frame side, rounded up.
    pub fn fallback_radius(&self, bounds: Rect) -> i32 {
        let shorter = bounds.width.min(bounds.height).max(0);
        ((shorter as f32 * self.fallback_fraction).ceil() as i32).max(1)
    }

    /// Square of side `2 * radius` centred on `center`, clamped to the frame.
    pub fn fallback(&self, center: Point, bounds: Rect) -> Rect {
        let r = self.fallback_radius(bounds);
        Rect::centered_at(center, 2 * r, 2 * r).intersect(&bounds)
    }
}

impl Default for SearchWindowPlanner {
    fn default() -> Self {
        Self::new(1.5, 1.0 / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect {
        x: 0,
        y: 0,
        width: 640,
        height: 480,
    };

    #[test]
    fn test_narrow_window_scales_extent() {
        let planner = SearchWindowPlanner::default();
        let w = planner.plan(
            SearchMode::Narrow {
                center: Point::new(320.0, 240.0),
                extent: (40, 20),
            },
            BOUNDS,
        );
        assert_eq!(w, Rect::new(290, 225, 60, 30));
        assert_eq!(w.center(), Point::new(320.0, 240.0));
    }

    #[test]
    fn test_narrow_window_clamped_at_edges() {
        let planner = SearchWindowPlanner::default();
        let w = planner.plan(
            SearchMode::Narrow {
                center: Point::new(5.0, 475.0),
                extent: (40, 40),
            },
            BOUNDS,
        );
        assert_eq!(w, Rect::new(0, 445, 35, 35));
        assert!(BOUNDS.contains_rect(&w));
    }

    #[test]
    fn test_prediction_outside_frame_searches_everything() {
        let planner = SearchWindowPlanner::default();
        let w = planner.plan(
            SearchMode::Narrow {
                center: Point::new(-500.0, -500.0),
                extent: (10, 10),
            },
            BOUNDS,
        );
        assert_eq!(w, BOUNDS);
    }

    #[test]
    fn test_fallback_radius_from_shorter_side() {
        let planner = SearchWindowPlanner::default();
        assert_eq!(planner.fallback_radius(BOUNDS), 80);
        assert_eq!(planner.fallback_radius(Rect::new(0, 0, 100, 100)), 17);

        let w = planner.plan(
            SearchMode::Fallback {
                center: Point::new(600.0, 100.0),
            },
            BOUNDS,
        );
        assert_eq!(w, Rect::new(520, 20, 120, 160));
    }

    #[test]
    fn test_windows_always_inside_frame() {
        let planner = SearchWindowPlanner::new(3.0, 0.5);
        let centers = [(-50.0, 10.0), (0.0, 0.0), (639.0, 479.0), (320.0, 900.0)];
        for (x, y) in centers {
            let center = Point::new(x, y);
            for mode in [
                SearchMode::Narrow {
                    center,
                    extent: (200, 300),
                },
                SearchMode::Fallback { center },
                SearchMode::FullFrame,
            ] {
                let w = planner.plan(mode, BOUNDS);
                assert!(!w.is_empty());
                assert!(BOUNDS.contains_rect(&w), "{w:?} escapes frame");
            }
        }
    }
}
