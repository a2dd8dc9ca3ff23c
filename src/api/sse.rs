//! Incremental server-sent-events decoding.
//!
//! Bytes arrive in arbitrary chunks. The decoder buffers partial lines and
//! yields one payload per complete event: `data:` lines joined by `\n`.
//! Comments and the `event:`, `id:` and `retry:` fields are ignored.

#[derive(Debug, Default)]
pub struct SseDecoder {
    partial: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the payloads of every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        // Splitting on b'\n' is UTF-8 safe: it never occurs inside a
        // multi-byte sequence.
        while let Some(end) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line[..end]);
            self.line(&line, &mut payloads);
        }
        payloads
    }

    /// Flush at end of stream: a trailing event without blank line still counts.
    pub fn finish(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        if !self.partial.is_empty() {
            let rest = std::mem::take(&mut self.partial);
            let line = String::from_utf8_lossy(&rest).into_owned();
            self.line(&line, &mut payloads);
        }
        self.flush(&mut payloads);
        payloads
    }

    fn line(&mut self, raw_line: &str, payloads: &mut Vec<String>) {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            self.flush(payloads);
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }

    fn flush(&mut self, payloads: &mut Vec<String>) {
        if self.data_lines.is_empty() {
            return;
        }
        payloads.push(self.data_lines.join("\n"));
        self.data_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{sse_done_block, sse_event_block};

    #[test]
    fn multi_line_data_and_ignored_fields() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(
            b"retry: 3000\n\
              : heartbeat\n\
              event: message\n\
              data:{\"type\":\n\
              data: \"RUN_FINISHED\"}\n\
              \n\
              \n\
              id: 7\n\
              \n",
        );
        assert_eq!(payloads, vec!["{\"type\":\n\"RUN_FINISHED\"}".to_string()]);
    }

    #[test]
    fn events_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"type\":").is_empty());
        assert!(decoder.push(b" \"RUN_STARTED\"}\r").is_empty());
        assert_eq!(
            decoder.push(b"\n\r\ndata: x"),
            vec!["{\"type\": \"RUN_STARTED\"}".to_string()]
        );
        assert_eq!(decoder.finish(), vec!["x".to_string()]);
    }

    #[test]
    fn multibyte_characters_split_across_chunks() {
        let text = "data: Prüfe\n\n".as_bytes();
        let split = text.iter().position(|b| *b == 0xc3).expect("umlaut") + 1;
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&text[..split]).is_empty());
        assert_eq!(decoder.push(&text[split..]), vec!["Prüfe".to_string()]);
    }

    #[test]
    fn decodes_fixture_blocks_byte_by_byte() {
        let frame = serde_json::json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "m1", "delta": "Prüfe"});
        let stream = format!("{}{}", sse_event_block(&frame), sse_done_block());
        let mut decoder = SseDecoder::new();
        let mut payloads = Vec::new();
        for byte in stream.as_bytes() {
            payloads.extend(decoder.push(std::slice::from_ref(byte)));
        }
        payloads.extend(decoder.finish());
        assert_eq!(payloads, vec![frame.to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn field_without_colon_and_empty_data() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(b"data\n\n"), vec![String::new()]);
        assert!(decoder.finish().is_empty());
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chunk_boundaries_do_not_change_payloads(
                payloads in proptest::collection::vec(
                    proptest::string::string_regex("[ -~äöüß]{0,24}").expect("regex"),
                    0..8
                ),
                cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..6)
            ) {
                let mut stream = String::new();
                for payload in &payloads {
                    stream.push_str(": keepalive\r\n");
                    stream.push_str("data: ");
                    stream.push_str(payload);
                    stream.push_str("\r\n\r\n");
                }
                let bytes = stream.as_bytes();
                let mut offsets: Vec<usize> = cuts.iter().map(|c| c.index(bytes.len() + 1)).collect();
                offsets.sort_unstable();

                let mut decoder = SseDecoder::new();
                let mut decoded = Vec::new();
                let mut start = 0;
                for end in offsets {
                    decoded.extend(decoder.push(&bytes[start..end]));
                    start = end;
                }
                decoded.extend(decoder.push(&bytes[start..]));
                decoded.extend(decoder.finish());

                prop_assert_eq!(decoded, payloads);
            }
        }
    }
}
