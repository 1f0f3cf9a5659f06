//! Wire types for the OpenAI Chat Completions streaming API.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One streaming completion call: credential, model and the ordered messages.
#[derive(Clone)]
pub struct CompletionRequest {
    pub api_key: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Developer instruction first, then the user message.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        developer_message: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: Role::Developer,
                    content: developer_message.into(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user_message.into(),
                },
            ],
        }
    }
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("messages", &self.messages)
            .finish()
    }
}

/// Body POSTed to `/chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

impl<'a> ChatCompletionBody<'a> {
    pub fn streaming(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            stream: true,
        }
    }
}

/// One `data:` payload of the streaming response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

/// One incremental unit of generated text. `content` is `None` for deltas
/// that carry only a role, a finish reason or usage data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub content: Option<String>,
}

impl Fragment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_body_shape() {
        let request = CompletionRequest::new("sk", "gpt-4.1-mini", "Be terse.", "Hi");
        let body = serde_json::to_value(ChatCompletionBody::streaming(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    {"role": "developer", "content": "Be terse."},
                    {"role": "user", "content": "Hi"}
                ],
                "stream": true
            })
        );
    }

    #[test]
    fn test_chunk_with_null_content() {
        let chunk: ChatCompletionChunk = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"delta":{"role":"assistant","content":null},"finish_reason":null}]}"#,
        )
        .unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
    }

    #[test]
    fn test_chunk_without_choices() {
        let chunk: ChatCompletionChunk =
            serde_json::from_str(r#"{"id":"c1","choices":[],"usage":{"total_tokens":3}}"#).unwrap();
        assert!(chunk.choices.is_empty());
        assert!(chunk.error.is_none());
    }

    #[test]
    fn test_debug_hides_key() {
        let request = CompletionRequest::new("sk-secret", "m", "", "");
        assert!(!format!("{request:?}").contains("sk-secret"));
    }
}
