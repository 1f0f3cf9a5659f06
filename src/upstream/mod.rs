//! Upstream completion provider.
//!
//! - [`CompletionClient`]: the seam the HTTP layer talks to
//! - [`openai`]: production client for the OpenAI Chat Completions API
//! - [`sse`]: incremental Server-Sent-Events decoder
//! - [`types`]: request/response wire types

pub mod openai;
pub mod sse;
pub mod types;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

pub use openai::OpenAiClient;
pub use types::{ChatMessage, CompletionRequest, Fragment, Role};

/// Lazy, forward-only sequence of fragments from one upstream call.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Fragment, UpstreamError>> + Send>>;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream chunk: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),
}

/// A provider that can open a streaming chat completion.
///
/// `stream_chat` resolves once the call is established (request sent and a
/// success status received); content then arrives through the returned
/// stream. Dropping the stream releases the upstream call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn stream_chat(&self, request: CompletionRequest) -> Result<FragmentStream, UpstreamError>;
}
