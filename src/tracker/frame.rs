//! Single-channel raster handed to the tracker each frame.

use ndarray::{Array2, ArrayView2, s};

use crate::error::{Result, TrackerError};
use crate::tracker::rect::Rect;

/// One plane of a video frame (grey or hue), shape `(height, width)`.
///
/// Colour conversion happens upstream; the tracker only needs pixel access
/// for descriptor capture and known dimensions for window planning.
#[derive(Debug, Clone)]
pub struct Frame {
    plane: Array2<u8>,
}

impl Frame {
    pub fn from_plane(plane: Array2<u8>) -> Self {
        Self { plane }
    }

    /// Build a frame from a row-major byte buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(TrackerError::InvalidFrame {
                width,
                height,
                len: data.len(),
            });
        }
        let plane = Array2::from_shape_vec((height as usize, width as usize), data)?;
        Ok(Self { plane })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.plane.ncols() as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.plane.nrows() as u32
    }

    /// The frame rectangle `(0, 0, width, height)`.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::frame(self.width(), self.height())
    }

    pub fn plane(&self) -> &Array2<u8> {
        &self.plane
    }

    /// View of the pixels under `rect`, clamped to the frame.
    pub fn view(&self, rect: Rect) -> ArrayView2<'_, u8> {
        let r = rect.intersect(&self.bounds());
        if r.is_empty() {
            return self.plane.slice(s![0..0, 0..0]);
        }
        let (x, y) = (r.x as usize, r.y as usize);
        let (w, h) = (r.width as usize, r.height as usize);
        self.plane.slice(s![y..y + h, x..x + w])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Frame::from_raw(4, 3, vec![0; 12]).is_ok());
        let err = Frame::from_raw(4, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidFrame { len: 11, .. }));
    }

    #[test]
    fn test_view_is_clamped() {
        let data: Vec<u8> = (0..20).collect();
        let frame = Frame::from_raw(5, 4, data).unwrap();
        assert_eq!(frame.bounds(), Rect::new(0, 0, 5, 4));

        let v = frame.view(Rect::new(3, 2, 10, 10));
        assert_eq!(v.dim(), (2, 2));
        assert_eq!(v[[0, 0]], 13);
        assert_eq!(v[[1, 1]], 19);

        assert_eq!(frame.view(Rect::new(9, 9, 2, 2)).len(), 0);
    }
}
