//! Error type shared by the tracker and its integration layer.

use thiserror::Error;

/// Errors raised while configuring the tracker or feeding it data.
///
/// Recoverable tracking outcomes (a rejected match, a collapsed adaptive
/// window) are not errors; they are reported per frame in
/// [`FrameOutput`](crate::tracker::FrameOutput).
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("raw buffer of {len} bytes does not match a {width}x{height} plane")]
    InvalidFrame { width: u32, height: u32, len: usize },

    #[error(transparent)]
    FrameShape(#[from] ndarray::ShapeError),

    #[error("selection has zero area")]
    EmptySelection,

    #[error("template bank needs at least one descriptor")]
    EmptyBank,

    #[error("training incomplete: {captured} of {required} exemplars captured")]
    Training { captured: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
