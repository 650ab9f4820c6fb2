//! Error taxonomy for board and transfer operations.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong in the board core.
///
/// `Fetch` and `Transfer` carry human-readable causes meant to be surfaced
/// to the user; `NotFound`, `Validation` and `InFlight` are local guards
/// that block an action before any network call is made.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading the feedback collection failed; the local set is left empty.
    #[error("failed to load feedbacks: {0}")]
    Fetch(String),

    /// A transition targeted an id the board does not know.
    #[error("no feedback with id {0}")]
    NotFound(i64),

    /// A required submission field was blank. Checked before any request.
    #[error("{0} must not be empty")]
    Validation(&'static str),

    /// Upload or download failed: non-2xx status, empty body or a network
    /// error.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// The remote status update behind an optimistic transition failed; the
    /// local change has been rolled back.
    #[error("status update for feedback {id} failed: {cause}")]
    Sync { id: i64, cause: String },

    /// A transfer or submission for the same target is already running.
    #[error("{0} already in progress")]
    InFlight(String),

    /// The transfer was cancelled through its [`CancelToken`].
    ///
    /// [`CancelToken`]: crate::transfer::CancelToken
    #[error("transfer cancelled")]
    Cancelled,

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}
