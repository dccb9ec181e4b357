//! Trait for video frame producers.

use crate::tracker::Frame;

/// Trait for frame capture backends (camera, video file, test fixture).
///
/// # Example
///
/// ```ignore
/// use template_track_rs::{Frame, FrameSource};
///
/// struct Playlist {
///     frames: std::vec::IntoIter<Frame>,
/// }
///
/// impl FrameSource for Playlist {
///     type Error = std::convert::Infallible;
///
///     fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for capture failures.
    type Error: std::error::Error + 'static;

    /// Capture the next frame, already converted to the plane the appearance
    /// model expects.
    ///
    /// # Returns
    /// `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = Frame>,
{
    type Error = std::convert::Infallible;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        Ok(self.next())
    }
}
