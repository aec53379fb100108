// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::fs;
use std::sync::Arc;

use futures::StreamExt;
use juno::cancel::CancelSignal;
use juno::chat::{DispatchOptions, Dispatcher};
use juno::error::{ApiError, JunoError};
use juno::files::FileStore;
use juno::llm::providers::LocalProvider;
use juno::llm::{CompletionRequest, LlmProvider, Message, StopReason, StreamEvent};
use juno::ui::RecordingConsole;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/v1/chat/completions";

fn request() -> CompletionRequest {
    CompletionRequest::new(vec![Message::system("be brief"), Message::user("hi")])
        .with_max_tokens(64)
        .with_stop(["User:"])
}

fn sse_body(pieces: &[&str]) -> String {
    let mut body = String::new();
    for piece in pieces {
        let chunk = json!({
            "id": "chatcmpl-1",
            "model": "local",
            "choices": [{ "index": 0, "delta": { "content": piece }, "finish_reason": null }]
        });
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    let last = json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "delta": {}, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 5, "completion_tokens": 3 }
    });
    body.push_str(&format!("data: {}\n\n", last));
    body.push_str("data: [DONE]\n\n");
    body
}

async fn mount_stream(server: &MockServer, pieces: &[&str]) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(pieces)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_complete_parses_openai_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({
            "stream": false,
            "max_tokens": 64,
            "stop": ["User:"],
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hi" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-9",
            "model": "deepseek",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hello!" },
                "finish_reason": "length"
            }],
            "usage": { "prompt_tokens": 7, "completion_tokens": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = LocalProvider::with_base_url(server.uri());
    let response = provider.complete(request()).await.unwrap();

    assert_eq!(response.text, "Hello!");
    assert_eq!(response.id, "chatcmpl-9");
    assert_eq!(response.stop_reason, Some(StopReason::MaxTokens));
    assert_eq!(response.usage.input_tokens, 7);
    assert_eq!(response.usage.output_tokens, 2);
}

#[tokio::test]
async fn test_complete_stream_decodes_sse() {
    let server = MockServer::start().await;
    mount_stream(&server, &["Hel", "lo", " there"]).await;

    let provider = LocalProvider::with_base_url(server.uri());
    let events: Vec<StreamEvent> = provider
        .complete_stream(request())
        .await
        .unwrap()
        .map(|event| event.unwrap())
        .collect()
        .await;

    let text: String = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::TextDelta { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "Hello there");
    assert!(matches!(events.first(), Some(StreamEvent::MessageStart { .. })));
    assert_eq!(events.last(), Some(&StreamEvent::MessageStop));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, StreamEvent::MessageStop))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(500).set_body_string("model failed to load"))
        .mount(&server)
        .await;

    let provider = LocalProvider::with_base_url(server.uri());
    let err = provider.complete(request()).await.unwrap_err();

    match err {
        JunoError::Api(ApiError::ServerError { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("model failed to load"));
        }
        other => panic!("Expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = LocalProvider::with_base_url(server.uri());
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(err, JunoError::Api(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let provider = LocalProvider::with_base_url(format!("http://127.0.0.1:{}", port));
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(err, JunoError::Api(ApiError::Network(_))));
}

#[tokio::test]
async fn test_external_server_needs_no_model_file() {
    let server = MockServer::start().await;
    let provider = LocalProvider::with_base_url(server.uri());
    assert!(provider.start().await.is_ok());
}

#[tokio::test]
async fn test_streamed_edit_against_local_server() {
    let server = MockServer::start().await;
    mount_stream(&server, &["```python\n", "def f():\n", "    return 2\n", "```"]).await;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("f.py"), "def f():\n    return 1\n").unwrap();
    let mut dispatcher = Dispatcher::new(
        FileStore::new(dir.path()),
        Arc::new(LocalProvider::with_base_url(server.uri())),
        DispatchOptions::default(),
        CancelSignal::new(),
    );
    let mut console = RecordingConsole::new();

    dispatcher.dispatch("load f.py", &mut console).await.unwrap();
    dispatcher
        .dispatch("edit return two", &mut console)
        .await
        .unwrap();

    assert_eq!(
        dispatcher.session().file_content(),
        Some("def f():\n    return 2")
    );
}
