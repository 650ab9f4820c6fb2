//! Batched feedback submission as a single multipart request

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use super::progress::ProgressTracker;
use crate::api::ApiClient;
use crate::attachments::FileBatchAccumulator;
use crate::error::{Error, Result};

/// Form fields accompanying one submission.
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub type_of_feedback: String,
    pub subject: String,
    pub description: String,
    pub email_followup: bool,
}

impl FeedbackSubmission {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        FeedbackSubmission {
            type_of_feedback: "General".to_string(),
            subject: subject.into(),
            description: description.into(),
            email_followup: false,
        }
    }
}

/// Drives feedback submissions and exposes the in-flight flag the caller
/// uses to disable its submit control.
pub struct Submitter {
    api: ApiClient,
    submitting: Arc<AtomicBool>,
}

impl Submitter {
    pub fn new(api: ApiClient) -> Self {
        Submitter {
            api,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a submission is on the wire. Cleared on success and
    /// failure alike, so a failed attempt can always be retried.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Submit the form fields plus the `Ready`-classified files from
    /// `batch` as one multipart request.
    ///
    /// Blank subject or description fails with [`Error::Validation`]
    /// before any network call. On success the submitted files are
    /// removed from the batch (`Waiting` files stay for the next round);
    /// on failure the batch is left untouched so the user can retry
    /// without re-selecting anything.
    pub async fn submit(
        &self,
        submission: &FeedbackSubmission,
        batch: &mut FileBatchAccumulator,
        tracker: &ProgressTracker,
    ) -> Result<()> {
        if submission.subject.trim().is_empty() {
            return Err(Error::Validation("subject"));
        }
        if submission.description.trim().is_empty() {
            return Err(Error::Validation("description"));
        }

        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(Error::InFlight("feedback submission".to_string()));
        }
        let result = self.send_batch(submission, batch, tracker).await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn send_batch(
        &self,
        submission: &FeedbackSubmission,
        batch: &mut FileBatchAccumulator,
        tracker: &ProgressTracker,
    ) -> Result<()> {
        // Clone the ready set out of the batch: the selection must survive
        // a failed request untouched.
        let ready: Vec<(Uuid, String, Vec<u8>, Option<String>)> = batch
            .ready_files()
            .into_iter()
            .map(|f| {
                (
                    f.id(),
                    f.name().to_string(),
                    f.content().to_vec(),
                    f.content_type().map(str::to_string),
                )
            })
            .collect();

        let mut form = Form::new()
            .text("type_of_feedback", submission.type_of_feedback.clone())
            .text("subject", submission.subject.clone())
            .text("description", submission.description.clone())
            .text(
                "email_followup",
                if submission.email_followup { "true" } else { "false" },
            );

        let mut submitted_ids = Vec::with_capacity(ready.len());
        for (id, name, content, content_type) in ready {
            let mut part = Part::bytes(content).file_name(name.clone());
            if let Some(content_type) = content_type {
                part = part.mime_str(&content_type).map_err(|e| {
                    Error::Transfer(format!("invalid content type for {}: {}", name, e))
                })?;
            }
            form = form.part("files", part);
            submitted_ids.push(id);
        }

        let task_id = Uuid::new_v4().to_string();
        tracker.begin(&task_id);
        let outcome = self.post(form).await;
        tracker.finish(&task_id);

        match outcome {
            Ok(()) => {
                for id in submitted_ids {
                    batch.remove(id);
                }
                info!("feedback submitted: {}", submission.subject);
                Ok(())
            }
            Err(e) => {
                warn!("feedback submission failed: {}", e);
                Err(e)
            }
        }
    }

    async fn post(&self, form: Form) -> Result<()> {
        let response = self.api.post_feedback(form).await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Transfer(format!(
                "submission failed: {} - {}",
                status, text
            )));
        }
        Ok(())
    }
}
