//! HTTP client for the remote feedback service.
//!
//! Implements the four operations the core consumes:
//! - `GET /feedbacks` — full collection fetch
//! - `POST /feedbacks/{id}/status/{status}?operation=update` — status update
//! - `POST /feedbacks` — multipart submission with attachments
//! - `GET /feedbacks/{id}/file` — streamed attachment download

use reqwest::multipart::Form;
use reqwest::{Client, Response};

use crate::board::{Feedback, FeedbackStatus};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build on top of a preconfigured client (custom timeouts, proxies).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full feedback collection. One malformed entry fails the
    /// whole fetch; an unrecognized status string alone does not.
    pub async fn fetch_feedbacks(&self) -> Result<Vec<Feedback>> {
        let url = format!("{}/feedbacks", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("server returned {} - {}", status, text)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| Error::Fetch(format!("malformed payload: {}", e)))
    }

    /// Push one status change. The status segment is percent-encoded
    /// (`in progress` contains a space).
    pub async fn update_status(&self, id: i64, status: FeedbackStatus) -> Result<()> {
        let url = format!(
            "{}/feedbacks/{}/status/{}",
            self.base_url,
            id,
            urlencoding::encode(&status.to_string())
        );
        let response = self
            .client
            .post(&url)
            .query(&[("operation", "update")])
            .send()
            .await
            .map_err(|e| Error::Sync {
                id,
                cause: format!("request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(Error::Sync {
                id,
                cause: format!("server returned {}", response.status()),
            });
        }
        Ok(())
    }

    /// Start a streamed attachment download. Status checking is left to the
    /// transfer worker so it can fold it into progress handling.
    pub(crate) async fn get_attachment(&self, id: i64) -> Result<Response> {
        let url = format!("{}/feedbacks/{}/file", self.base_url, id);
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transfer(format!("download request failed: {}", e)))
    }

    /// Submit one multipart feedback form.
    pub(crate) async fn post_feedback(&self, form: Form) -> Result<Response> {
        let url = format!("{}/feedbacks", self.base_url);
        self.client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transfer(format!("submit request failed: {}", e)))
    }
}
