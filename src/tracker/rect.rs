/// Pixel rectangle and sub-pixel point types.
///
/// `Rect` uses the TLWH layout (top-left x, top-left y, width, height) in
/// integer pixel units. A rect with non-positive width or height is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: i32,
    /// Top-left y coordinate
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

/// A point in frame coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full rectangle of a `width` x `height` frame.
    #[inline]
    pub fn frame(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Rectangle spanned by a drag from `origin` to `current`, in either direction.
    #[inline]
    pub fn from_corners(origin: (i32, i32), current: (i32, i32)) -> Self {
        Self {
            x: origin.0.min(current.0),
            y: origin.1.min(current.1),
            width: (current.0 - origin.0).abs(),
            height: (current.1 - origin.1).abs(),
        }
    }

    /// A `width` x `height` rectangle whose center is as close to `center` as
    /// integer pixels allow.
    #[inline]
    pub fn centered_at(center: Point, width: i32, height: i32) -> Self {
        Self {
            x: (center.x - width as f32 / 2.0).round() as i32,
            y: (center.y - height as f32 / 2.0).round() as i32,
            width,
            height,
        }
    }

    /// Get the center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Get the area of the rectangle; empty rectangles have zero area.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Intersection of two rectangles. Disjoint inputs yield an empty rect
    /// anchored at the clamped corner.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 <= x1 || y2 <= y1 {
            return Rect::new(x1, y1, 0, 0);
        }
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_any_direction() {
        let a = Rect::from_corners((40, 60), (10, 20));
        assert_eq!(a, Rect::new(10, 20, 30, 40));

        let b = Rect::from_corners((10, 20), (40, 60));
        assert_eq!(a, b);
    }

    #[test]
    fn test_center_and_area() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.center(), Point::new(25.0, 40.0));
        assert_eq!(rect.area(), 1200);
        assert_eq!(Rect::new(5, 5, 0, 7).area(), 0);
        assert_eq!(Rect::new(5, 5, -3, 7).area(), 0);
    }

    #[test]
    fn test_centered_at() {
        let rect = Rect::centered_at(Point::new(50.0, 50.0), 20, 10);
        assert_eq!(rect, Rect::new(40, 45, 20, 10));
        assert_eq!(rect.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_intersect() {
        let frame = Rect::frame(100, 80);
        let r = Rect::new(-10, 70, 30, 30);
        assert_eq!(r.intersect(&frame), Rect::new(0, 70, 20, 10));

        let disjoint = Rect::new(200, 200, 5, 5).intersect(&frame);
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_contains_rect() {
        let frame = Rect::frame(100, 80);
        assert!(frame.contains_rect(&Rect::new(0, 0, 100, 80)));
        assert!(frame.contains_rect(&Rect::new(10, 10, 5, 5)));
        assert!(!frame.contains_rect(&Rect::new(90, 70, 20, 5)));
    }
}
