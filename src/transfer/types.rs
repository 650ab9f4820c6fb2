//! Transfer cancellation flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag for one transfer.
///
/// Clone it, hand one copy to the transfer and keep the other; `cancel`
/// takes effect at the transfer's next suspension point (before the
/// request, or between body chunks). A cancelled transfer ends with
/// [`Error::Cancelled`] and clears its progress entry like any other
/// terminal outcome.
///
/// [`Error::Cancelled`]: crate::Error::Cancelled
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
