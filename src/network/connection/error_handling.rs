//! Failure classification for transport errors.

use std::io;

use crate::error::ClientError;

/// What the read loop does after a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReadErrorAction {
    /// Interrupted read - try again.
    Retry,
    /// The stream is already closed, usually by a deliberate `close` racing
    /// the read - end the session without reporting.
    Stop,
    /// A real failure - report it as a read error and end the session.
    Report,
}

/// Classify a transport read error into an actionable category.
pub(super) fn classify_read_error(e: &io::Error) -> ReadErrorAction {
    match e.kind() {
        io::ErrorKind::Interrupted => ReadErrorAction::Retry,
        io::ErrorKind::NotConnected => ReadErrorAction::Stop,
        _ => ReadErrorAction::Report,
    }
}

/// Whether an I/O failure is the expected result of closing a stream while an
/// operation on it was in flight.
pub(crate) fn is_benign_io(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotConnected | io::ErrorKind::Interrupted
    )
}

/// Whether a reported error should be swallowed instead of emitted.
pub(crate) fn is_benign(error: &ClientError) -> bool {
    error.io_error().is_some_and(is_benign_io)
}
