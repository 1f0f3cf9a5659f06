//! Incremental Server-Sent-Events decoder.
//!
//! Network chunks do not respect event boundaries, so bytes are buffered
//! until a full line is available. `data:` lines accumulate until a blank
//! line dispatches the event; other fields and comments are ignored.

use bytes::BytesMut;

/// A dispatched event's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseData {
    /// A `data` payload to be parsed as a chunk.
    Payload(String),
    /// The `[DONE]` sentinel that ends an OpenAI stream.
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    /// Bytes of `buffer` already known to hold no `\n`.
    scanned: usize,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseData> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            let raw = self.buffer.split_to(self.scanned + pos + 1);
            self.scanned = 0;
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        self.scanned = self.buffer.len();
        events
    }

    /// Flush whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Option<SseData> {
        if !self.buffer.is_empty() {
            self.scanned = 0;
            let raw = self.buffer.split();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseData> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseData> {
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();

        if payload.trim() == "[DONE]" {
            Some(SseData::Done)
        } else {
            Some(SseData::Payload(payload))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\n\n");
        assert_eq!(events, vec![SseData::Payload("{\"a\":1}".into())]);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        assert!(decoder.push(b":1}\n").is_empty());
        let events = decoder.push(b"\ndata: [DONE]\n\n");
        assert_eq!(
            events,
            vec![SseData::Payload("{\"a\":1}".into()), SseData::Done]
        );
    }

    #[test]
    fn test_crlf_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\r\n\r\nevent: message\r\nid: 7\r\ndata: x\r\n\r\n");
        assert_eq!(events, vec![SseData::Payload("x".into())]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: one\ndata: two\n\n");
        assert_eq!(events, vec![SseData::Payload("one\ntwo".into())]);
    }

    #[test]
    fn test_multibyte_split() {
        let text = "data: héllo\n\n".as_bytes();
        // Split inside the two-byte 'é'.
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&text[..8]).is_empty());
        let events = decoder.push(&text[8..]);
        assert_eq!(events, vec![SseData::Payload("héllo".into())]);
    }

    #[test]
    fn test_long_line_fed_bytewise() {
        let payload = "x".repeat(4096);
        let text = format!("data: {payload}\n\ndata: [DONE]\n\n");
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for byte in text.as_bytes() {
            events.extend(decoder.push(std::slice::from_ref(byte)));
            assert!(decoder.scanned <= decoder.buffer.len());
        }
        assert_eq!(events, vec![SseData::Payload(payload), SseData::Done]);
        assert!(decoder.buffer.is_empty());
        assert_eq!(decoder.scanned, 0);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), Some(SseData::Payload("tail".into())));
        assert_eq!(decoder.finish(), None);
    }
}
