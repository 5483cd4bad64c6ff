//! Session errors.

use thiserror::Error;

/// Errors surfaced by the session controller.
///
/// The rules engine itself cannot fail; these only cover the plumbing
/// around it.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session loop has stopped and no longer accepts actions.
    #[error("session closed")]
    Closed,

    /// An observer could not write its output.
    #[error("observer write failed: {0}")]
    Io(#[from] std::io::Error),

    /// An observer could not encode a snapshot.
    #[error("observer encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}
