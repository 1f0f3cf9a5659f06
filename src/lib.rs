//! chat-relay: streaming relay for two-message chat completions.
//!
//! Accepts a developer instruction plus a user message over HTTP, opens one
//! streaming completion against an OpenAI-compatible provider and forwards
//! each generated text fragment to the caller as it arrives.

pub mod config;
pub mod server;
pub mod upstream;
