//! Feedback record and status column definitions

use serde::{Deserialize, Serialize};

/// One feedback item as delivered by the remote service.
///
/// Timestamps travel as opaque strings; their format is owned by the
/// service. The `status` field keeps the raw wire string so that a record
/// with an unrecognized status survives a fetch (it is simply excluded
/// from every column view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub full_name: String,
    pub user_ntid: String,
    pub type_of_feedback: String,
    pub desc: String,
    pub status: String,
    pub created_date: String,
    pub email: String,
    pub subject: String,
    pub attach: Option<String>,
    pub consent: bool,
    pub updated_date: String,
}

/// The fixed set of board columns. Transitions are unrestricted between
/// any two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
}

impl FeedbackStatus {
    /// Column order as shown on the board.
    pub const ALL: [FeedbackStatus; 3] = [
        FeedbackStatus::New,
        FeedbackStatus::InProgress,
        FeedbackStatus::Resolved,
    ];

    /// Parse a raw wire status. Returns `None` for anything outside the
    /// enumerated set so callers can drop the record from column views
    /// instead of coercing it.
    pub fn parse(value: &str) -> Option<FeedbackStatus> {
        match value {
            "new" => Some(FeedbackStatus::New),
            "in progress" => Some(FeedbackStatus::InProgress),
            "resolved" => Some(FeedbackStatus::Resolved),
            _ => None,
        }
    }

    /// Human column title.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackStatus::New => "New",
            FeedbackStatus::InProgress => "In Progress",
            FeedbackStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackStatus::New => write!(f, "new"),
            FeedbackStatus::InProgress => write!(f, "in progress"),
            FeedbackStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// One column of the board: a status plus its items in fetch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusColumn {
    pub status: FeedbackStatus,
    pub items: Vec<Feedback>,
}
