//! Triage board: the locally known feedback set, its column projections
//! and optimistic status transitions.
//!
//! The board is the only writer of its items. `transition` applies a
//! status change locally before the remote has confirmed it, then hands
//! the update to a background sync worker; a remote failure rolls the
//! local change back.

mod sync;
mod types;

pub use sync::SyncHandle;
pub use types::{Feedback, FeedbackStatus, StatusColumn};

use std::sync::Arc;

use log::info;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::api::ApiClient;
use crate::error::{Error, Result};
use sync::SyncJob;

pub struct StatusBoard {
    api: ApiClient,
    items: Arc<Mutex<Vec<Feedback>>>,
    sync_tx: mpsc::UnboundedSender<SyncJob>,
}

impl StatusBoard {
    /// Requires a running tokio runtime: the board spawns its status-sync
    /// worker at construction. The worker exits when the board is dropped.
    pub fn new(api: ApiClient) -> Self {
        let items = Arc::new(Mutex::new(Vec::new()));
        let sync_tx = sync::spawn_sync_worker(api.clone(), items.clone());
        StatusBoard {
            api,
            items,
            sync_tx,
        }
    }

    /// Fetch all feedbacks and replace the local set wholesale.
    ///
    /// On any failure (unreachable service, non-2xx, malformed payload)
    /// the board is left empty, never partially filled, and the error is
    /// returned for the caller to surface. No automatic retry.
    pub async fn load(&self) -> Result<usize> {
        match self.api.fetch_feedbacks().await {
            Ok(fetched) => {
                info!("board load: {} feedbacks", fetched.len());
                let mut items = self.items.lock();
                *items = fetched;
                Ok(items.len())
            }
            Err(e) => {
                self.items.lock().clear();
                Err(e)
            }
        }
    }

    /// Partition the current set into one column per status, preserving
    /// fetch order within each column. Items whose raw status is outside
    /// the enumerated set appear in no column.
    pub fn columns(&self) -> Vec<StatusColumn> {
        let items = self.items.lock();
        FeedbackStatus::ALL
            .iter()
            .map(|&status| StatusColumn {
                status,
                items: items
                    .iter()
                    .filter(|f| FeedbackStatus::parse(&f.status) == Some(status))
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Detail projection: the record behind a selected card, if known.
    pub fn item(&self, id: i64) -> Option<Feedback> {
        self.items.lock().iter().find(|f| f.id == id).cloned()
    }

    /// Snapshot of the full set in fetch order.
    pub fn items(&self) -> Vec<Feedback> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Move a feedback to another column.
    ///
    /// The local status changes synchronously, before this function
    /// returns; the remote update is queued behind any earlier ones and
    /// runs in the background. An unknown id is rejected with
    /// [`Error::NotFound`] and causes no remote call.
    pub fn transition(&self, id: i64, new_status: FeedbackStatus) -> Result<SyncHandle> {
        let prev_status = {
            let mut items = self.items.lock();
            let item = items
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or(Error::NotFound(id))?;
            std::mem::replace(&mut item.status, new_status.to_string())
        };

        let (done, rx) = oneshot::channel();
        let job = SyncJob {
            id,
            prev_status,
            new_status,
            done,
        };
        if let Err(mpsc::error::SendError(job)) = self.sync_tx.send(job) {
            // Worker gone (runtime shutting down): undo the local apply.
            let mut items = self.items.lock();
            if let Some(item) = items.iter_mut().find(|f| f.id == id) {
                item.status = job.prev_status;
            }
            return Err(Error::Sync {
                id,
                cause: "status sync worker stopped".to_string(),
            });
        }

        Ok(SyncHandle::new(id, rx))
    }
}
