//! HTTP streaming tests against a mock endpoint
//!
//! Exercises both transport variants end-to-end: the structured SSE call
//! and the raw byte-stream call, plus establishment failure and
//! cancellation behavior.

use chatline::streaming::{ChatClient, RequestOptions, StreamSession, NO_TOKEN_LIMIT};
use chatline::types::ChatTurn;
use chatline::ChatError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::from("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for fragment in fragments {
        let chunk = serde_json::json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

async fn sse_server(fragments: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(fragments), "text/event-stream"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_structured_stream_end_to_end() {
    let server = sse_server(&["Hel", "lo", " 日本"]).await;
    let client = ChatClient::with_config(&server.uri(), "default").unwrap();

    let history = vec![ChatTurn::user("Hi", None)];
    let request = client
        .build_request(&history, &RequestOptions::default())
        .unwrap();
    let handle = client.stream_chat(request).await.unwrap();

    let mut session = StreamSession::new(handle);
    while session.next_fragment().await.unwrap().is_some() {}

    let done = session.finish();
    assert_eq!(done.text, "Hello 日本");
    assert_eq!(done.stats.tokens, 3);
}

#[tokio::test]
async fn test_outgoing_body_carries_history_and_seed() {
    let server = sse_server(&["ok"]).await;
    let client = ChatClient::with_config(&server.uri(), "default").unwrap();

    let history = vec![ChatTurn::user("Hi", None)];
    let opts = RequestOptions {
        seed: 42,
        system_prompt: "be kind".to_string(),
        max_tokens: NO_TOKEN_LIMIT,
    };
    let request = client.build_request(&history, &opts).unwrap();
    let handle = client.stream_chat(request).await.unwrap();
    let mut session = StreamSession::new(handle);
    while session.next_fragment().await.unwrap().is_some() {}

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(
        body["messages"],
        serde_json::json!([
            {"role": "system", "content": "be kind"},
            {"role": "user", "content": "Hi"},
        ])
    );
    assert_eq!(body["seed"], serde_json::json!(42));
    assert_eq!(body["stream"], serde_json::json!(true));
    assert!(body.get("max_tokens").is_none());
}

#[tokio::test]
async fn test_raw_stream_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stream"))
        .and(query_param("seed", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("Hello 世界", "application/octet-stream"))
        .mount(&server)
        .await;

    let client = ChatClient::with_config(&server.uri(), "default").unwrap();
    let history = vec![ChatTurn::user("Hi", None)];
    let handle = client.stream_raw(&history, 42).await.unwrap();

    let mut session = StreamSession::new(handle);
    let mut text = String::new();
    while let Some(fragment) = session.next_fragment().await.unwrap() {
        text.push_str(&fragment);
    }

    assert_eq!(text, "Hello 世界");

    // The raw variant sends the bare turn array as the body
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!([{"role": "user", "content": "Hi"}]));
}

#[tokio::test]
async fn test_error_status_yields_no_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ChatClient::with_config(&server.uri(), "default").unwrap();
    let history = vec![ChatTurn::user("Hi", None)];
    let request = client
        .build_request(&history, &RequestOptions::default())
        .unwrap();

    let result = client.stream_chat(request).await;
    assert!(matches!(result, Err(ChatError::ApiError(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_no_stream() {
    // Nothing listens on this port
    let client = ChatClient::with_config("http://127.0.0.1:1", "default").unwrap();
    let history = vec![ChatTurn::user("Hi", None)];
    let request = client
        .build_request(&history, &RequestOptions::default())
        .unwrap();

    let result = client.stream_chat(request).await;
    assert!(matches!(result, Err(ChatError::ApiError(_))));
}

#[tokio::test]
async fn test_cancel_mid_stream_discards_partial_text() {
    let server = sse_server(&["never", " finalized"]).await;
    let client = ChatClient::with_config(&server.uri(), "default").unwrap();

    let history = vec![ChatTurn::user("Hi", None)];
    let request = client
        .build_request(&history, &RequestOptions::default())
        .unwrap();
    let handle = client.stream_chat(request).await.unwrap();

    let mut session = StreamSession::new(handle);
    let first = session.next_fragment().await.unwrap();
    assert_eq!(first.as_deref(), Some("never"));

    session.cancel();
    assert!(session.next_fragment().await.unwrap().is_none());
    assert_eq!(session.response(), "");
    assert_eq!(session.token_count(), 1);
}

#[tokio::test]
async fn test_handle_cancel_before_consumption() {
    let server = sse_server(&["unseen"]).await;
    let client = ChatClient::with_config(&server.uri(), "default").unwrap();

    let history = vec![ChatTurn::user("Hi", None)];
    let request = client
        .build_request(&history, &RequestOptions::default())
        .unwrap();
    let mut handle = client.stream_chat(request).await.unwrap();

    handle.cancel();
    assert!(handle.next().await.is_none());
}
