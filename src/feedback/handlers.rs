use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::dto::MessageResponse;
use crate::auth::jwt::AdminUser;
use crate::error::{internal, ApiError};
use crate::feedback::dto::{FeedbackItem, SubmitFeedbackRequest};
use crate::feedback::repo::Feedback;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(submit_feedback))
        .route("/admin/feedback", get(admin_list_feedback))
}

#[instrument(skip(state, payload))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = payload.user_email.trim().to_string();
    let message = payload.message.trim().to_string();
    if email.is_empty() || message.is_empty() {
        return Err(ApiError::Validation(
            "Email and message are required.".into(),
        ));
    }

    let row = Feedback::insert(&state.db, &email, &message)
        .await
        .map_err(internal)?;

    // Notification runs detached; a dead webhook must not fail the submission.
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.feedback_received(&email, &message).await {
            warn!(error = %e, "feedback notification failed");
        }
    });

    info!(feedback_id = %row.id, "feedback submitted");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Thank you! Your feedback has been submitted successfully.".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn admin_list_feedback(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<FeedbackItem>>, ApiError> {
    let rows = Feedback::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
