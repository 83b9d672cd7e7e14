//! Router for the chat API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::public;
use crate::api::state::SharedState;

/// Get the active session and its transcript
async fn chat_session(State(state): State<SharedState>) -> Json<public::SessionResponse> {
    let session = state.session.lock().await;
    Json(public::SessionResponse::new(&session))
}

/// Send a message in the active session and wait for the reply
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Response {
    if payload.message.is_empty() {
        return (StatusCode::BAD_REQUEST, "Message must not be empty").into_response();
    }

    // Requests queue here while an exchange is in flight
    let mut session = state.session.lock().await;
    let response = session.send(&payload.message).await;
    tracing::debug!(
        "Session {} now has {} turns",
        session.id(),
        session.history_view().len()
    );

    Json(public::ChatResponse {
        response,
        transcript: session.history_view().to_vec(),
    })
    .into_response()
}

/// Get the numbered, plain text rendering of the conversation
async fn chat_history(State(state): State<SharedState>) -> Json<public::HistoryResponse> {
    let session = state.session.lock().await;
    Json(public::HistoryResponse {
        started_at: session.started_at_display(),
        history: session.format_history(),
    })
}

/// Throw away the conversation and start a new one
async fn chat_reset(State(state): State<SharedState>) -> Json<public::SessionResponse> {
    let mut session = state.session.lock().await;
    session.reset();
    tracing::info!("Chat session reset. New session {}", session.id());
    Json(public::SessionResponse::new(&session))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(chat_session).post(chat_handler))
        .route("/history", get(chat_history))
        .route("/reset", post(chat_reset))
}
