//! OpenAI-compatible streaming chat client
//!
//! Provides real-time fragment streaming from a configurable completion
//! endpoint:
//! - HTTP/1.1 streaming via reqwest
//! - Primary endpoint: POST `{base_url}` with an OpenAI-style body and SSE
//!   response (`data:` lines carrying `choices[0].delta.content`)
//! - Alternate endpoint: POST `{base_url}/stream?seed={seed}` returning a
//!   raw byte stream
//!
//! No request timeout is set; a hung backend stalls until the user cancels.

use crate::errors::{ChatError, Result};
use crate::streaming::decoder::Utf8Decoder;
use crate::types::ChatTurn;
use futures_util::{Stream, StreamExt};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// Default completion endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Placeholder model id; local OpenAI-compatible servers accept anything
pub const DEFAULT_MODEL: &str = "default";

/// Sentinel meaning "no token limit; let the backend decide"
pub const NO_TOKEN_LIMIT: i64 = -1;

/// Knobs applied to every outgoing completion request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Seed passed through for reproducibility where the backend supports it
    pub seed: i64,

    /// Prepended as a `system` turn when non-empty
    pub system_prompt: String,

    /// Generation length bound; [`NO_TOKEN_LIMIT`] omits the field
    pub max_tokens: i64,
}

impl RequestOptions {
    fn max_tokens_field(&self) -> Option<u32> {
        if self.max_tokens < 0 {
            None
        } else {
            Some(self.max_tokens as u32)
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            seed: 1234,
            system_prompt: String::new(),
            max_tokens: NO_TOKEN_LIMIT,
        }
    }
}

/// Serialized request body for the structured streaming call
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub stream: bool,
    pub seed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One in-flight completion stream
///
/// Iterate with [`StreamHandle::next`]; cancelling aborts the underlying
/// transport and ends the fragment sequence. A handle is single-use: a new
/// submission builds a fresh one.
pub struct StreamHandle {
    fragments: Pin<Box<dyn Stream<Item = Result<String>> + Send>>,
    cancel: CancellationToken,
}

impl StreamHandle {
    pub(crate) fn from_parts(
        fragments: Pin<Box<dyn Stream<Item = Result<String>> + Send>>,
        cancel: CancellationToken,
    ) -> Self {
        StreamHandle { fragments, cancel }
    }

    /// Next incremental fragment; `None` when the stream has ended
    pub async fn next(&mut self) -> Option<Result<String>> {
        self.fragments.next().await
    }

    /// Token shared with whatever drives cancellation
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort the underlying transport; no further fragments are produced
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Streaming chat-completion client
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    model: String,
}

impl ChatClient {
    /// Create new client against the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }

    /// Create client with custom configuration
    ///
    /// The base URL must parse as a syntactically valid http(s) URL.
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ChatError::ConfigError(format!("invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ChatError::ConfigError(format!(
                "base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = Client::builder().build().map_err(ChatError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Assemble the request body for one submission
    ///
    /// History must be non-empty (at least the pending user turn). A
    /// non-empty system prompt is prepended as a `system` turn; otherwise
    /// the history is sent as-is.
    pub fn build_request(&self, history: &[ChatTurn], opts: &RequestOptions) -> Result<ChatRequest> {
        if history.is_empty() {
            return Err(ChatError::ApiError(
                "chat history is empty; nothing to send".to_string(),
            ));
        }

        let mut messages = Vec::with_capacity(history.len() + 1);
        if !opts.system_prompt.is_empty() {
            messages.push(ChatTurn::system(opts.system_prompt.clone()));
        }
        messages.extend_from_slice(history);

        Ok(ChatRequest {
            model: self.model.clone(),
            messages,
            stream: true,
            seed: opts.seed,
            max_tokens: opts.max_tokens_field(),
        })
    }

    /// Issue a structured streaming completion call
    ///
    /// POSTs the body to `{base_url}` and parses the SSE response into text
    /// fragments. Any failure before a usable stream exists surfaces as an
    /// error; the caller folds it into the conversation as a synthetic
    /// assistant turn.
    pub async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::ApiError(format!("failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ChatError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let body = response.bytes_stream();

        let fragments = async_stream::try_stream! {
            let mut body = std::pin::pin!(body);
            let mut decoder = Utf8Decoder::new();
            let mut line_buf = String::new();
            let mut done = false;

            while !done {
                let chunk = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    chunk = body.next() => chunk,
                };
                let chunk = match chunk {
                    Some(chunk) => chunk,
                    None => break,
                };
                let bytes = chunk
                    .map_err(|e| ChatError::StreamingError(format!("stream read error: {}", e)))?;

                let text = match decoder.push(&bytes)? {
                    Some(text) => text,
                    None => continue,
                };
                line_buf.push_str(&text);

                // Process complete lines, keeping any partial one buffered
                while let Some(pos) = line_buf.find('\n') {
                    let line = line_buf[..pos].trim_end_matches('\r').to_string();
                    line_buf.drain(..=pos);
                    match parse_sse_line(&line) {
                        SseLine::Delta(fragment) => yield fragment,
                        SseLine::Done => {
                            done = true;
                            break;
                        }
                        SseLine::Ignore => {}
                    }
                }
            }

            if !done && !token.is_cancelled() {
                // A final line may arrive without a trailing newline
                if let Some(tail) = decoder.finish() {
                    line_buf.push_str(&tail);
                }
                let line = line_buf.trim().to_string();
                if !line.is_empty() {
                    if let SseLine::Delta(fragment) = parse_sse_line(&line) {
                        yield fragment;
                    }
                }
            }
        };

        Ok(StreamHandle::from_parts(Box::pin(fragments), cancel))
    }

    /// Issue a raw-byte streaming call
    ///
    /// POSTs the bare turn array to `{base_url}/stream?seed={seed}` and
    /// yields each decoded fragment of the response body directly.
    pub async fn stream_raw(&self, history: &[ChatTurn], seed: i64) -> Result<StreamHandle> {
        if history.is_empty() {
            return Err(ChatError::ApiError(
                "chat history is empty; nothing to send".to_string(),
            ));
        }

        let url = format!("{}/stream?seed={}", self.base_url, seed);
        let response = self
            .client
            .post(&url)
            .json(&history)
            .send()
            .await
            .map_err(|e| ChatError::ApiError(format!("failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ChatError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let body = response.bytes_stream();

        let fragments = async_stream::try_stream! {
            let mut body = std::pin::pin!(body);
            let mut decoder = Utf8Decoder::new();

            loop {
                let chunk = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    chunk = body.next() => chunk,
                };
                let chunk = match chunk {
                    Some(chunk) => chunk,
                    None => break,
                };
                let bytes = chunk
                    .map_err(|e| ChatError::StreamingError(format!("stream read error: {}", e)))?;

                if let Some(fragment) = decoder.push(&bytes)? {
                    yield fragment;
                }
            }

            if !token.is_cancelled() {
                if let Some(tail) = decoder.finish() {
                    yield tail;
                }
            }
        };

        Ok(StreamHandle::from_parts(Box::pin(fragments), cancel))
    }

    /// Get current model id
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// One parsed SSE line
enum SseLine {
    /// Delta content from a `data:` line (possibly empty)
    Delta(String),
    /// The `[DONE]` terminator
    Done,
    /// Blank lines, comments, other fields, malformed payloads
    Ignore,
}

/// Streamed completion chunk, OpenAI wire format
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Ignore;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseLine::Done;
    }
    match serde_json::from_str::<ChatChunk>(data) {
        Ok(chunk) => {
            let fragment = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .unwrap_or_default();
            SseLine::Delta(fragment)
        }
        // Malformed data lines are skipped rather than killing the stream
        Err(_) => SseLine::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ChatClient::new();
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_rejects_invalid_base_url() {
        assert!(ChatClient::with_config("not a url", DEFAULT_MODEL).is_err());
        assert!(ChatClient::with_config("ftp://example.com", DEFAULT_MODEL).is_err());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ChatClient::with_config("http://localhost:9999/", "m").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_build_request_rejects_empty_history() {
        let client = ChatClient::new().unwrap();
        let result = client.build_request(&[], &RequestOptions::default());
        assert!(matches!(result, Err(ChatError::ApiError(_))));
    }

    #[test]
    fn test_build_request_without_system_prompt() {
        let client = ChatClient::new().unwrap();
        let history = vec![ChatTurn::user("Hi", None)];
        let opts = RequestOptions {
            seed: 42,
            system_prompt: String::new(),
            max_tokens: NO_TOKEN_LIMIT,
        };

        let request = client.build_request(&history, &opts).unwrap();
        assert_eq!(request.messages, history);
        assert_eq!(request.seed, 42);
        assert!(request.stream);
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn test_build_request_prepends_system_prompt() {
        let client = ChatClient::new().unwrap();
        let history = vec![ChatTurn::user("Hi", None)];
        let opts = RequestOptions {
            seed: 7,
            system_prompt: "be brief".to_string(),
            max_tokens: 256,
        };

        let request = client.build_request(&history, &opts).unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatTurn::system("be brief"));
        assert_eq!(request.messages[1..], history[..]);
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn test_request_body_omits_sentinel_max_tokens() {
        let client = ChatClient::new().unwrap();
        let history = vec![ChatTurn::user("Hi", None)];
        let request = client
            .build_request(&history, &RequestOptions::default())
            .unwrap();

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["stream"], serde_json::json!(true));
        assert_eq!(body["messages"], serde_json::json!([{"role": "user", "content": "Hi"}]));
    }

    #[test]
    fn test_parse_sse_delta_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"hel"}}]}"#;
        match parse_sse_line(line) {
            SseLine::Delta(fragment) => assert_eq!(fragment, "hel"),
            _ => panic!("expected delta"),
        }
    }

    #[test]
    fn test_parse_sse_done_line() {
        assert!(matches!(parse_sse_line("data: [DONE]"), SseLine::Done));
    }

    #[test]
    fn test_parse_sse_ignores_noise() {
        assert!(matches!(parse_sse_line(""), SseLine::Ignore));
        assert!(matches!(parse_sse_line(": keep-alive"), SseLine::Ignore));
        assert!(matches!(parse_sse_line("event: ping"), SseLine::Ignore));
        assert!(matches!(parse_sse_line("data: {not json"), SseLine::Ignore));
    }

    #[test]
    fn test_parse_sse_delta_without_content() {
        // Role-only first chunk; empty fragment is skipped downstream
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        match parse_sse_line(line) {
            SseLine::Delta(fragment) => assert!(fragment.is_empty()),
            _ => panic!("expected delta"),
        }
    }
}
