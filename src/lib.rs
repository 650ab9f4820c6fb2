//! Core of an internal feedback-triage board.
//!
//! Users file feedback items with optional attachments; reviewers drag
//! them between status columns. This crate holds the state and transfer
//! logic behind that surface:
//!
//! - [`StatusBoard`] — the locally known feedback set, column
//!   projections, and optimistic status transitions reconciled with the
//!   remote service through a background sync worker.
//! - [`FileBatchAccumulator`] — pending attachments classified
//!   Ready/Waiting against a total-size budget.
//! - [`download_attachment`] / [`Submitter`] — streamed download and
//!   batched multipart submission, both reporting through a shared
//!   [`ProgressTracker`] and honoring a [`CancelToken`].
//!
//! Rendering, drag-gesture capture and persistence are the caller's
//! business; everything here is in-memory, per session, and exposed as
//! plain operations a UI layer can call.

pub mod api;
pub mod attachments;
pub mod board;
pub mod error;
pub mod transfer;

pub use api::ApiClient;
pub use attachments::{FileBatchAccumulator, FileStatus, PendingFile, MAX_TOTAL_SIZE_KB};
pub use board::{Feedback, FeedbackStatus, StatusBoard, StatusColumn, SyncHandle};
pub use error::{Error, Result};
pub use transfer::{
    download_attachment, CancelToken, DownloadedFile, FeedbackSubmission, ProgressTracker,
    Submitter,
};
