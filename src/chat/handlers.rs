use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::chat::dto::{ChatRequest, ChatResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message is required.".into()));
    }

    let reply = state
        .chat
        .complete(message)
        .await
        .map_err(|e| ApiError::Upstream(format!("API Error: {e:#}")))?;

    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let state = AppState::fake();
        let err = chat(
            State(state),
            Json(ChatRequest {
                message: "   ".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn relay_returns_client_reply() {
        let state = AppState::fake();
        let Json(resp) = chat(
            State(state),
            Json(ChatRequest {
                message: "hello".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.reply, "echo: hello");
    }
}
