//! Error types for the scope controller.

use thiserror::Error;

use crate::cursor::CursorId;

/// Errors returned when the scope API is addressed with ids that do not
/// exist in the current configuration.
///
/// Interaction itself never fails; these only indicate caller misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The channel index is outside the configured channel count.
    #[error("unknown channel {channel} (scope has {channels} channels)")]
    UnknownChannel {
        /// Requested channel.
        channel: usize,
        /// Configured channel count.
        channels: usize,
    },
    /// The cursor id does not address a cursor of this scope.
    #[error("unknown cursor {0:?}")]
    UnknownCursor(CursorId),
    /// A sample frame carries a different number of channels than the scope.
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelCountMismatch {
        /// Configured channel count.
        expected: usize,
        /// Channels present in the frame.
        actual: usize,
    },
}
