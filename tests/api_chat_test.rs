//! Integration tests for the chat API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use gemchat::ai::chat::{EMPTY_HISTORY_MESSAGE, FALLBACK_RESPONSE, Role};
    use gemchat::api::public::chat::{ChatResponse, HistoryResponse, SessionResponse};
    use tower::util::ServiceExt;

    use crate::test_utils::{StubReply, body_to_json, body_to_string, test_app};

    fn post_message(message: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "message": message }).to_string(),
            ))
            .unwrap()
    }

    async fn send(app: &Router, message: &str) -> ChatResponse {
        let response = app.clone().oneshot(post_message(message)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_to_json(response.into_body()).await
    }

    async fn get(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Tests a fresh session has an empty transcript
    #[tokio::test]
    async fn it_starts_with_empty_session() {
        let app = test_app(StubReply::Echo);

        let response = get(&app, "/api/chat").await;
        assert_eq!(response.status(), StatusCode::OK);

        let session: SessionResponse = body_to_json(response.into_body()).await;
        assert!(session.transcript.is_empty());
        assert!(!session.session_id.is_empty());
        assert_eq!(session.started_at.len(), 19);
    }

    /// Tests sending a message records the user and assistant turns
    #[tokio::test]
    async fn it_sends_a_message() {
        let app = test_app(StubReply::Echo);

        let resp = send(&app, "Hello").await;

        assert_eq!(resp.response, "echo: Hello");
        assert_eq!(resp.transcript.len(), 2);
        assert_eq!(resp.transcript[0].role(), Role::User);
        assert_eq!(resp.transcript[0].content(), "Hello");
        assert_eq!(resp.transcript[0].sequence(), 1);
        assert_eq!(resp.transcript[1].role(), Role::Assistant);
        assert_eq!(resp.transcript[1].content(), "echo: Hello");
        assert_eq!(resp.transcript[1].sequence(), 2);
    }

    /// Tests the transcript persists across requests in order
    #[tokio::test]
    async fn it_keeps_the_conversation_across_requests() {
        let app = test_app(StubReply::Echo);

        send(&app, "A").await;
        send(&app, "B").await;

        let response = get(&app, "/api/chat").await;
        let session: SessionResponse = body_to_json(response.into_body()).await;
        let contents: Vec<&str> = session.transcript.iter().map(|t| t.content()).collect();
        assert_eq!(contents, vec!["A", "echo: A", "B", "echo: B"]);
    }

    /// Tests a failed request is reported as the assistant's reply
    #[tokio::test]
    async fn it_records_request_failures_in_the_transcript() {
        let app = test_app(StubReply::Fail);

        let resp = send(&app, "Hello").await;

        assert!(resp.response.starts_with("An error occurred:"));
        assert!(resp.response.contains("Resource has been exhausted"));
        assert_eq!(resp.transcript.len(), 2);
        assert_eq!(resp.transcript[0].content(), "Hello");
        assert_eq!(resp.transcript[1].content(), resp.response);

        // The session is still usable
        let resp = send(&app, "Again").await;
        assert_eq!(resp.transcript.len(), 4);
    }

    /// Tests an empty model reply is replaced by the fallback message
    #[tokio::test]
    async fn it_uses_fallback_for_empty_replies() {
        let app = test_app(StubReply::Empty);

        let resp = send(&app, "Hello").await;

        assert_eq!(resp.response, FALLBACK_RESPONSE);
        assert_eq!(resp.transcript[1].content(), FALLBACK_RESPONSE);
    }

    /// Tests an empty message is rejected before reaching the session
    #[tokio::test]
    async fn it_rejects_empty_messages() {
        let app = test_app(StubReply::Echo);

        let response = app.clone().oneshot(post_message("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(&app, "/api/chat").await;
        let session: SessionResponse = body_to_json(response.into_body()).await;
        assert!(session.transcript.is_empty());
    }

    /// Tests the formatted history endpoint
    #[tokio::test]
    async fn it_formats_history() {
        let app = test_app(StubReply::Echo);

        let response = get(&app, "/api/chat/history").await;
        let history: HistoryResponse = body_to_json(response.into_body()).await;
        assert_eq!(history.history, EMPTY_HISTORY_MESSAGE);

        send(&app, "Hello").await;

        let response = get(&app, "/api/chat/history").await;
        let history: HistoryResponse = body_to_json(response.into_body()).await;
        assert_eq!(
            history.history,
            "1. User:\nHello\n\n2. Assistant:\necho: Hello\n"
        );
    }

    /// Tests resetting clears the transcript and starts a new session
    #[tokio::test]
    async fn it_resets_the_session() {
        let app = test_app(StubReply::Echo);

        let response = get(&app, "/api/chat").await;
        let before: SessionResponse = body_to_json(response.into_body()).await;

        send(&app, "Hello").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat/reset")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let after: SessionResponse = body_to_json(response.into_body()).await;
        assert!(after.transcript.is_empty());
        assert_ne!(after.session_id, before.session_id);
        // Same fixed-width format, so string order is time order
        assert!(after.started_at >= before.started_at);

        let resp = send(&app, "Fresh start").await;
        assert_eq!(resp.transcript.len(), 2);
        assert_eq!(resp.transcript[0].sequence(), 1);
    }

    /// Tests the chat page is served as the fallback
    #[tokio::test]
    async fn it_serves_the_chat_page() {
        let app = test_app(StubReply::Echo);

        let response = get(&app, "/index.html").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("/api/chat"));
    }

    #[tokio::test]
    async fn it_serves_history_and_help_on_the_chat_page() {
        let app = test_app(StubReply::Echo);

        let body = body_to_string(get(&app, "/index.html").await.into_body()).await;
        assert!(body.contains("/api/chat/history"));
        assert!(body.contains(r#"<details id="help">"#));
    }

    #[tokio::test]
    async fn it_keeps_the_message_when_a_send_is_rejected() {
        let app = test_app(StubReply::Echo);

        let body = body_to_string(get(&app, "/index.html").await.into_body()).await;
        // Input is only cleared after the status check passes
        let status_check = body.find("if (!response.ok)").unwrap();
        let clear = body.find(r#"input.value = "";"#).unwrap();
        assert!(status_check < clear);
    }
}
