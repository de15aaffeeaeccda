//! mockito-backed tests for the generateContent round trip.

use crate::{GeminiClient, GeminiError};

fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
    GeminiClient::new(Some("test-key".into()), "gemini-2.5-flash")
        .unwrap()
        .with_base_url(server.url())
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 12, "totalTokenCount": 80 }
    })
    .to_string()
}

#[tokio::test]
async fn generate_text_returns_candidate_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("[{\"title\":\"a\",\"deadline\":\"2026-09-02\"}]"))
        .create_async()
        .await;

    let text = client_for(&server)
        .generate_text("break down my goal")
        .await
        .unwrap();
    assert_eq!(text, "[{\"title\":\"a\",\"deadline\":\"2026-09-02\"}]");
    mock.assert_async().await;
}

#[tokio::test]
async fn fenced_text_is_passed_through_untouched() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("```json\n[]\n```"))
        .create_async()
        .await;

    // Fence stripping is the caller's concern; the client reports raw text.
    let text = client_for(&server).generate_text("x").await.unwrap();
    assert_eq!(text, "```json\n[]\n```");
}

#[tokio::test]
async fn api_error_envelope_is_typed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).generate_text("x").await.unwrap_err();
    match err {
        GeminiError::Api { code, status, message } => {
            assert_eq!(code, 429);
            assert_eq!(status, "RESOURCE_EXHAUSTED");
            assert!(message.contains("quota"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_still_reports_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let err = client_for(&server).generate_text("x").await.unwrap_err();
    match err {
        GeminiError::Api { code, .. } => assert_eq!(code, 503),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidates_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;

    let err = client_for(&server).generate_text("x").await.unwrap_err();
    assert!(matches!(err, GeminiError::EmptyResponse));
}

#[tokio::test]
async fn request_body_carries_prompt_and_generation_config() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "plan it" }] }]
            })),
            mockito::Matcher::PartialJson(serde_json::json!({
                "generationConfig": { "maxOutputTokens": 2048 }
            })),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("ok"))
        .create_async()
        .await;

    client_for(&server).generate_text("plan it").await.unwrap();
    mock.assert_async().await;
}
