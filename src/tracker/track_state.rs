/// Tracker lifecycle state.
///
/// Pausing is tracked separately on the controller and never changes this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// Nothing selected, nothing tracked
    #[default]
    Idle,
    /// A selection drag is in progress
    Selecting,
    /// Collecting exemplar descriptors for the bank
    Training,
    /// Last frame's match was accepted; search near the prediction
    Tracking,
    /// Last frame's match was rejected; search wide
    Reacquiring,
}

impl TrackerState {
    /// Whether the per-frame predict/match/correct loop runs in this state.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Tracking | Self::Reacquiring)
    }
}
