//! Background worker that reconciles optimistic status changes with the
//! remote service.
//!
//! All status updates flow through one queue and are sent in dispatch
//! order, so rapid successive drags of the same card can never reach the
//! server out of order.

use std::sync::Arc;

use log::{info, warn};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::api::ApiClient;
use crate::board::types::{Feedback, FeedbackStatus};
use crate::error::{Error, Result};

pub(crate) struct SyncJob {
    pub id: i64,
    pub prev_status: String,
    pub new_status: FeedbackStatus,
    pub done: oneshot::Sender<Result<()>>,
}

/// Handle for one dispatched status update.
///
/// Await [`SyncHandle::outcome`] to learn whether the remote accepted the
/// change; dropping the handle instead leaves the update running
/// fire-and-forget (a failure still rolls the local status back).
#[derive(Debug)]
pub struct SyncHandle {
    id: i64,
    rx: oneshot::Receiver<Result<()>>,
}

impl SyncHandle {
    pub(crate) fn new(id: i64, rx: oneshot::Receiver<Result<()>>) -> Self {
        SyncHandle { id, rx }
    }

    pub async fn outcome(self) -> Result<()> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::Sync {
                id: self.id,
                cause: "status sync worker stopped".to_string(),
            }),
        }
    }
}

pub(crate) fn spawn_sync_worker(
    api: ApiClient,
    items: Arc<Mutex<Vec<Feedback>>>,
) -> mpsc::UnboundedSender<SyncJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SyncJob>();

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let result = api.update_status(job.id, job.new_status).await;
            match result.as_ref() {
                Ok(()) => info!("status sync: {} -> {}", job.id, job.new_status),
                Err(e) => {
                    warn!("status sync: {} -> {} failed: {}", job.id, job.new_status, e);
                    revert_if_current(&items, job.id, &job.prev_status, job.new_status);
                }
            }
            let _ = job.done.send(result);
        }
    });

    tx
}

/// Roll the optimistic change back, unless a later transition has already
/// moved the item somewhere else.
fn revert_if_current(
    items: &Mutex<Vec<Feedback>>,
    id: i64,
    prev_status: &str,
    applied: FeedbackStatus,
) {
    let mut items = items.lock();
    if let Some(item) = items.iter_mut().find(|f| f.id == id) {
        if item.status == applied.to_string() {
            item.status = prev_status.to_string();
        }
    }
}
