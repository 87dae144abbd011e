//! SSE parsing for the streaming Messages API
//!
//! The backend streams server-sent events; the only payloads the bridge
//! cares about are `content_block_delta` text deltas and the final
//! `message_stop`. Chunks are emitted strictly in arrival order — no
//! reordering, no buffering beyond line reassembly.

/// One event of the completion stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text delta to append to the growing assistant message
    Text(String),
    /// The stream finished normally
    Done,
}

/// Incremental SSE parser. Feed it raw body chunks; it yields parsed
/// events once their lines are complete.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one transport chunk, returning the events completed by it
    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        // Consume full lines, keep the trailing partial line buffered
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end();

            let Some(payload) = line.strip_prefix("data: ") else {
                // event:/id:/empty separator lines carry no payload we need
                continue;
            };

            if let Some(event) = parse_data_payload(payload) {
                events.push(event);
            }
        }
        events
    }
}

fn parse_data_payload(payload: &str) -> Option<StreamEvent> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    match value.get("type").and_then(|t| t.as_str())? {
        "content_block_delta" => {
            let delta = value.get("delta")?;
            if delta.get("type").and_then(|t| t.as_str()) == Some("text_delta") {
                let text = delta.get("text").and_then(|t| t.as_str())?;
                Some(StreamEvent::Text(text.to_string()))
            } else {
                None
            }
        }
        "message_stop" => Some(StreamEvent::Done),
        // message_start, content_block_start, ping, message_delta…
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!(
            "data: {{\"type\":\"content_block_delta\",\"index\":0,\"delta\":{{\"type\":\"text_delta\",\"text\":{}}}}}\n",
            serde_json::to_string(text).unwrap()
        )
    }

    #[test]
    fn test_parses_text_deltas_in_order() {
        let mut parser = SseParser::new();
        let mut input = String::new();
        input.push_str("event: content_block_delta\n");
        input.push_str(&delta_line("Temos "));
        input.push_str("event: content_block_delta\n");
        input.push_str(&delta_line("sim!"));
        input.push_str("data: {\"type\":\"message_stop\"}\n");

        let events = parser.push(&input);
        assert_eq!(
            events,
            vec![
                StreamEvent::Text("Temos ".to_string()),
                StreamEvent::Text("sim!".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_reassembles_lines_split_across_chunks() {
        let mut parser = SseParser::new();
        let line = delta_line("fragmentado");
        let (a, b) = line.split_at(25);

        assert!(parser.push(a).is_empty());
        let events = parser.push(b);
        assert_eq!(events, vec![StreamEvent::Text("fragmentado".to_string())]);
    }

    #[test]
    fn test_ignores_other_event_types() {
        let mut parser = SseParser::new();
        let events = parser.push(
            "data: {\"type\":\"message_start\",\"message\":{}}\n\
             data: {\"type\":\"ping\"}\n\
             data: {\"type\":\"content_block_start\",\"index\":0}\n",
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_ignores_malformed_payloads() {
        let mut parser = SseParser::new();
        let events = parser.push("data: not json at all\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_delta_preserved() {
        let mut parser = SseParser::new();
        let events = parser.push(&delta_line(""));
        assert_eq!(events, vec![StreamEvent::Text(String::new())]);
    }
}
