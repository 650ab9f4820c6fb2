//! Attachment transfer pipeline with streaming, progress tracking and
//! cancellation
//!
//! Provides the two transfer operations of the board:
//! - Streamed attachment download with percent progress and filename
//!   resolution from the response's disposition header
//! - Batched multipart feedback submission with a guarded in-flight flag
//!
//! Progress lives in a shared [`ProgressTracker`]; entries exist exactly
//! while a transfer is active, so the tracker is also the in-flight guard.

mod download;
mod progress;
mod types;
mod upload;

pub use download::{download_attachment, DownloadedFile};
pub use progress::ProgressTracker;
pub use types::CancelToken;
pub use upload::{FeedbackSubmission, Submitter};
