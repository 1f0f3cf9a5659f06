//! Relay of upstream fragments onto the HTTP response body.
//!
//! Each fragment with content becomes one body chunk, in arrival order and
//! without buffering. The first upstream error ends the body: hyper aborts
//! the connection, so the client keeps what was already sent and nothing is
//! appended.

use bytes::Bytes;
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::upstream::{FragmentStream, UpstreamError};

/// Convert a fragment stream into body chunks, skipping content-less fragments.
pub fn relay_body(
    mut fragments: FragmentStream,
    request_id: String,
) -> impl Stream<Item = Result<Bytes, UpstreamError>> + Send + 'static {
    async_stream::stream! {
        let mut relayed = 0usize;
        let mut failed = false;

        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    if let Some(text) = fragment.content {
                        relayed += 1;
                        yield Ok(Bytes::from(text));
                    }
                }
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, relayed, "Upstream failed mid-stream");
                    failed = true;
                    yield Err(e);
                    break;
                }
            }
        }

        if !failed {
            debug!(request_id = %request_id, relayed, "Stream complete");
        }
    }
}
