//! OpenAI Chat Completions client (streaming mode only).

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::sse::{SseData, SseDecoder};
use super::types::{ChatCompletionBody, ChatCompletionChunk, CompletionRequest, Fragment};
use super::{CompletionClient, FragmentStream, UpstreamError};

/// Talks to `{base_url}/chat/completions`. Holds a pooled HTTP client; the
/// credential travels with each [`CompletionRequest`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("chat-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(http, base_url))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn stream_chat(&self, request: CompletionRequest) -> Result<FragmentStream, UpstreamError> {
        let url = self.completions_url();
        debug!(url = %url, model = %request.model, "Opening upstream stream");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&ChatCompletionBody::streaming(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Upstream rejected the request");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Box::pin(decode_fragments(response.bytes_stream())))
    }
}

/// Turn a raw SSE byte stream into fragments, stopping at `[DONE]`.
pub fn decode_fragments<S>(bytes: S) -> impl Stream<Item = Result<Fragment, UpstreamError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseDecoder::new();
        let mut done = false;

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for event in decoder.push(&chunk) {
                match event {
                    SseData::Done => done = true,
                    SseData::Payload(data) => {
                        if !done {
                            yield parse_chunk(&data)?;
                        }
                    }
                }
            }
            if done {
                break;
            }
        }

        if !done {
            if let Some(SseData::Payload(data)) = decoder.finish() {
                yield parse_chunk(&data)?;
            }
        }
    }
}

fn parse_chunk(data: &str) -> Result<Fragment, UpstreamError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(UpstreamError::Api(error.message));
    }
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content);
    Ok(Fragment { content })
}
