//! Appearance matching: bank scans with early exit and the back-projection variant.

use tracing::trace;

use crate::error::{Result, TrackerError};
use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;
use crate::tracker::template_bank::{TemplateBank, TemplateDescriptor};

/// Output of one call to a [`ScoringPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Similarity, higher is better
    pub value: f32,
    /// Best top-left placement of the descriptor, relative to the region
    pub location: (i32, i32),
}

/// External correlation primitive.
///
/// Called synchronously; if the work is offloaded to an accelerator the
/// implementation must wait for the result before returning.
pub trait ScoringPrimitive {
    /// Slide `descriptor` over `region` of `frame` and report the best placement.
    /// `region` always lies inside the frame and is at least as large as the
    /// descriptor.
    fn score(&mut self, frame: &Frame, region: Rect, descriptor: &TemplateDescriptor) -> Score;
}

/// Output of one call to an [`AdaptiveWindowPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveMatch {
    /// The converged window, in frame coordinates
    pub window: Rect,
    /// Confidence of the converged window, higher is better
    pub score: f32,
}

/// External back-projection primitive with an adaptively sized window.
pub trait AdaptiveWindowPrimitive {
    /// Build the reference colour model from `selection` of `exemplar`.
    fn learn(&mut self, exemplar: &Frame, selection: Rect);

    /// Back-project the model onto `frame` and converge a window starting
    /// from `window`.
    fn locate(&mut self, frame: &Frame, window: Rect) -> AdaptiveMatch;
}

/// Best match of one frame. Recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub score: f32,
    /// Matched rectangle in frame coordinates
    pub location: Rect,
    /// Bank position of the winning descriptor, `None` if nothing could be scored
    pub template: Option<usize>,
    /// Number of descriptors evaluated
    pub scanned: usize,
    /// The adaptive window collapsed to at most one pixel
    pub collapsed: bool,
}

impl MatchResult {
    /// Result of a scan where no descriptor fit the region.
    pub fn none(region: Rect) -> Self {
        Self {
            score: f32::NEG_INFINITY,
            location: Rect::new(region.x, region.y, 0, 0),
            template: None,
            scanned: 0,
            collapsed: false,
        }
    }
}

/// Scan `bank` in order against `region`, stopping at the first score above
/// `early_exit`. Always returns the best result seen.
pub fn scan_bank<S: ScoringPrimitive>(
    scorer: &mut S,
    frame: &Frame,
    region: Rect,
    bank: &TemplateBank,
    early_exit: f32,
) -> MatchResult {
    let region = region.intersect(&frame.bounds());
    let mut best = MatchResult::none(region);

    for (i, descriptor) in bank.iter().enumerate() {
        if descriptor.width() > region.width || descriptor.height() > region.height {
            trace!(position = i, "descriptor larger than search region, skipped");
            continue;
        }

        let score = scorer.score(frame, region, descriptor);
        best.scanned += 1;
        trace!(position = i, score = score.value, "scored descriptor");

        if best.template.is_none() || score.value > best.score {
            best.score = score.value;
            best.template = Some(i);
            best.location = Rect::new(
                region.x + score.location.0,
                region.y + score.location.1,
                descriptor.width(),
                descriptor.height(),
            );
        }
        if score.value > early_exit {
            break;
        }
    }

    best
}

/// Appearance model driven by the controller.
pub trait AppearanceModel {
    /// Number of exemplars needed before tracking can start.
    fn required_exemplars(&self) -> usize;

    /// Number of exemplars captured so far.
    fn captured(&self) -> usize;

    /// Learn from one confirmed selection over a training exemplar.
    fn capture(&mut self, exemplar: &Frame, selection: Rect) -> Result<()>;

    /// Score `region` of `frame`. Never fails.
    fn evaluate(&mut self, frame: &Frame, region: Rect) -> MatchResult;

    /// Called when `result` was accepted.
    fn promote(&mut self, result: &MatchResult);

    fn is_trained(&self) -> bool {
        self.captured() >= self.required_exemplars()
    }
}

/// Multi-template matcher over a move-to-front [`TemplateBank`].
pub struct TemplateMatcher<S: ScoringPrimitive> {
    scorer: S,
    template_count: usize,
    early_exit_threshold: f32,
    pending: Vec<TemplateDescriptor>,
    bank: Option<TemplateBank>,
}

impl<S: ScoringPrimitive> TemplateMatcher<S> {
    pub fn new(scorer: S, template_count: usize, early_exit_threshold: f32) -> Self {
        Self {
            scorer,
            template_count,
            early_exit_threshold,
            pending: Vec::with_capacity(template_count),
            bank: None,
        }
    }

    /// The bank, once every exemplar has been captured.
    pub fn bank(&self) -> Option<&TemplateBank> {
        self.bank.as_ref()
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

impl<S: ScoringPrimitive> AppearanceModel for TemplateMatcher<S> {
    fn required_exemplars(&self) -> usize {
        self.template_count
    }

    fn captured(&self) -> usize {
        match &self.bank {
            Some(bank) => bank.len(),
            None => self.pending.len(),
        }
    }

    fn capture(&mut self, exemplar: &Frame, selection: Rect) -> Result<()> {
        if self.bank.is_some() {
            return Ok(());
        }
        self.pending.push(TemplateDescriptor::capture(exemplar, selection)?);
        if self.pending.len() >= self.template_count {
            self.bank = Some(TemplateBank::new(std::mem::take(&mut self.pending))?);
        }
        Ok(())
    }

    fn evaluate(&mut self, frame: &Frame, region: Rect) -> MatchResult {
        match &self.bank {
            Some(bank) => scan_bank(
                &mut self.scorer,
                frame,
                region,
                bank,
                self.early_exit_threshold,
            ),
            None => MatchResult::none(region),
        }
    }

    fn promote(&mut self, result: &MatchResult) {
        if let (Some(bank), Some(i)) = (self.bank.as_mut(), result.template) {
            bank.promote(i);
        }
    }
}

/// Single-model matcher: back-projection plus an adaptive window. The bank
/// degenerates to one entry learned from one exemplar.
pub struct AdaptiveWindowMatcher<P: AdaptiveWindowPrimitive> {
    primitive: P,
    learned: bool,
}

impl<P: AdaptiveWindowPrimitive> AdaptiveWindowMatcher<P> {
    pub fn new(primitive: P) -> Self {
        Self {
            primitive,
            learned: false,
        }
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }
}

impl<P: AdaptiveWindowPrimitive> AppearanceModel for AdaptiveWindowMatcher<P> {
    fn required_exemplars(&self) -> usize {
        1
    }

    fn captured(&self) -> usize {
        usize::from(self.learned)
    }

    fn capture(&mut self, exemplar: &Frame, selection: Rect) -> Result<()> {
        let rect = selection.intersect(&exemplar.bounds());
        if rect.is_empty() {
            return Err(TrackerError::EmptySelection);
        }
        self.primitive.learn(exemplar, rect);
        self.learned = true;
        Ok(())
    }

    fn evaluate(&mut self, frame: &Frame, region: Rect) -> MatchResult {
        if !self.learned {
            return MatchResult::none(region);
        }
        let found = self.primitive.locate(frame, region);
        let window = found.window.intersect(&frame.bounds());
        MatchResult {
            score: found.score,
            location: window,
            template: Some(0),
            scanned: 1,
            collapsed: window.area() <= 1,
        }
    }

    fn promote(&mut self, _result: &MatchResult) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Scores each descriptor by a table keyed on the descriptor's fill value.
    struct TableScorer {
        scores: Vec<f32>,
        calls: Vec<u8>,
    }

    impl ScoringPrimitive for TableScorer {
        fn score(&mut self, _frame: &Frame, _region: Rect, d: &TemplateDescriptor) -> Score {
            let id = d.patch[[0, 0]];
            self.calls.push(id);
            Score {
                value: self.scores[id as usize],
                location: (id as i32, 1),
            }
        }
    }

    fn bank_of(sizes: &[(i32, i32)]) -> TemplateBank {
        let pool = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let frame = Frame::from_plane(Array2::from_elem((32, 32), i as u8));
                TemplateDescriptor::capture(&frame, Rect::new(0, 0, w, h)).unwrap()
            })
            .collect();
        TemplateBank::new(pool).unwrap()
    }

    fn frame() -> Frame {
        Frame::from_plane(Array2::zeros((100, 100)))
    }

    #[test]
    fn test_scan_exits_early_on_good_match() {
        let bank = bank_of(&[(4, 4), (4, 4), (4, 4)]);
        let mut scorer = TableScorer {
            scores: vec![0.95, 0.99, 0.1],
            calls: vec![],
        };
        let r = scan_bank(&mut scorer, &frame(), Rect::new(10, 20, 30, 30), &bank, 0.8);
        assert_eq!(scorer.calls, vec![0]);
        assert_eq!(r.template, Some(0));
        assert_eq!(r.scanned, 1);
        assert_eq!(r.location, Rect::new(10, 21, 4, 4));
    }

    #[test]
    fn test_scan_returns_global_best_without_early_exit() {
        let bank = bank_of(&[(4, 4), (5, 6), (4, 4)]);
        let mut scorer = TableScorer {
            scores: vec![0.3, 0.7, 0.5],
            calls: vec![],
        };
        let r = scan_bank(&mut scorer, &frame(), Rect::new(0, 0, 50, 50), &bank, 0.8);
        assert_eq!(scorer.calls, vec![0, 1, 2]);
        assert_eq!(r.template, Some(1));
        assert_eq!(r.score, 0.7);
        assert_eq!(r.location, Rect::new(1, 1, 5, 6));
        assert_eq!(r.scanned, 3);
    }

    #[test]
    fn test_scan_skips_descriptors_larger_than_region() {
        let bank = bank_of(&[(20, 20), (4, 4)]);
        let mut scorer = TableScorer {
            scores: vec![0.99, 0.4],
            calls: vec![],
        };
        let r = scan_bank(&mut scorer, &frame(), Rect::new(0, 0, 10, 10), &bank, 0.8);
        assert_eq!(scorer.calls, vec![1]);
        assert_eq!(r.template, Some(1));

        let tiny = scan_bank(&mut scorer, &frame(), Rect::new(0, 0, 2, 2), &bank, 0.8);
        assert_eq!(tiny.template, None);
        assert_eq!(tiny.score, f32::NEG_INFINITY);
    }

    #[test]
    fn test_template_matcher_builds_bank_after_training() {
        let scorer = TableScorer {
            scores: vec![0.9, 0.9],
            calls: vec![],
        };
        let mut m = TemplateMatcher::new(scorer, 2, 0.8);
        let ex = Frame::from_plane(Array2::from_elem((10, 10), 1u8));
        assert!(!m.is_trained());
        assert_eq!(m.evaluate(&ex, ex.bounds()).template, None);

        m.capture(&ex, Rect::new(0, 0, 3, 3)).unwrap();
        assert!(m.bank().is_none());
        m.capture(&ex, Rect::new(2, 2, 3, 3)).unwrap();
        assert!(m.is_trained());
        assert_eq!(m.bank().map(TemplateBank::len), Some(2));
        assert_eq!(m.captured(), 2);
    }

    struct FixedWindow(AdaptiveMatch);

    impl AdaptiveWindowPrimitive for FixedWindow {
        fn learn(&mut self, _exemplar: &Frame, _selection: Rect) {}
        fn locate(&mut self, _frame: &Frame, _window: Rect) -> AdaptiveMatch {
            self.0
        }
    }

    #[test]
    fn test_adaptive_window_flags_collapse() {
        let mut m = AdaptiveWindowMatcher::new(FixedWindow(AdaptiveMatch {
            window: Rect::new(10, 10, 1, 1),
            score: 0.9,
        }));
        let f = frame();
        m.capture(&f, Rect::new(0, 0, 5, 5)).unwrap();
        assert!(m.is_trained());
        let r = m.evaluate(&f, f.bounds());
        assert!(r.collapsed);
        assert_eq!(r.template, Some(0));
    }
}
