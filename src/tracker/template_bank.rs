//! Fixed pool of reference patches with a move-to-front scan order.

use ndarray::Array2;

use crate::error::{Result, TrackerError};
use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;

/// Reference appearance captured from one training exemplar.
#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    /// Pixels under the selection, shape `(height, width)`
    pub patch: Array2<u8>,
    /// Inclusion mask over `patch` (255 = included)
    pub mask: Array2<u8>,
    /// The selection this descriptor was captured from
    pub source: Rect,
}

impl TemplateDescriptor {
    /// Capture the pixels of `frame` under `selection`.
    ///
    /// The selection is clamped to the frame first; an empty result is an error.
    pub fn capture(frame: &Frame, selection: Rect) -> Result<Self> {
        let rect = selection.intersect(&frame.bounds());
        if rect.is_empty() {
            return Err(TrackerError::EmptySelection);
        }
        let patch = frame.view(rect).to_owned();
        let mask = Array2::from_elem(patch.dim(), 255u8);
        Ok(Self {
            patch,
            mask,
            source: rect,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.patch.ncols() as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.patch.nrows() as i32
    }
}

/// Ordered view over a fixed pool of descriptors.
///
/// Membership is fixed at construction; only the order changes. `order`
/// holds pool indices, so promotion never moves descriptor payloads.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    pool: Vec<TemplateDescriptor>,
    order: Vec<usize>,
}

impl TemplateBank {
    pub fn new(pool: Vec<TemplateDescriptor>) -> Result<Self> {
        if pool.is_empty() {
            return Err(TrackerError::EmptyBank);
        }
        let order = (0..pool.len()).collect();
        Ok(Self { pool, order })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptor at scan position `i` (0 = tried first).
    pub fn get(&self, i: usize) -> Option<&TemplateDescriptor> {
        self.order.get(i).map(|&id| &self.pool[id])
    }

    /// Pool index of the descriptor at scan position `i`.
    pub fn id_at(&self, i: usize) -> Option<usize> {
        self.order.get(i).copied()
    }

    /// Current scan order as pool indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Iterate descriptors in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> + '_ {
        self.order.iter().map(move |&id| &self.pool[id])
    }

    /// Move the descriptor at position `i` to the front. Entries ahead of it
    /// shift back by one; entries behind it keep their positions.
    pub fn promote(&mut self, i: usize) {
        if i == 0 || i >= self.order.len() {
            return;
        }
        let id = self.order.remove(i);
        self.order.insert(0, id);
    }
}
