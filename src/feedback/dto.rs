use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::feedback::repo::Feedback;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub user_email: String,
    pub message: String,
    pub submitted_at: OffsetDateTime,
}

impl From<Feedback> for FeedbackItem {
    fn from(f: Feedback) -> Self {
        Self {
            user_email: f.user_email,
            message: f.message,
            submitted_at: f.submitted_at,
        }
    }
}
