use crate::errors::SessionError;
use crate::stream::{ActionField, OutputItem, StreamEvent, WorkflowAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental Server-Sent Events decoder; frames may span chunk boundaries.
#[derive(Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
    // Bytes of `buf` already searched for a delimiter.
    scanned: usize,
}

/// Longest delimiter (`\r\n\r\n`) minus one byte.
const DELIMITER_OVERLAP: usize = 3;

impl SseDecoder {
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some((idx, delim_len)) = find_frame_delimiter(&self.buf, self.scanned) {
            let frame_bytes: Vec<u8> = self.buf.drain(..idx + delim_len).take(idx).collect();
            self.scanned = 0;
            if let Some(frame) = parse_sse_frame(&frame_bytes) {
                frames.push(frame);
            }
        }
        self.scanned = self.buf.len().saturating_sub(DELIMITER_OVERLAP);
        frames
    }

    /// Returns the trailing frame when the body ends without a blank line.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buf);
        self.scanned = 0;
        parse_sse_frame(&rest)
    }
}

fn find_frame_delimiter(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i + 1 < buf.len() {
        if buf[i] == b'\n' && buf[i + 1] == b'\n' {
            return Some((i, 2));
        }
        if i + 3 < buf.len() && &buf[i..i + 4] == b"\r\n\r\n" {
            return Some((i, 4));
        }
        i += 1;
    }
    None
}

fn parse_sse_frame(bytes: &[u8]) -> Option<SseFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let text = String::from_utf8_lossy(bytes);
    let mut event: Option<String> = None;
    let mut data_lines: Vec<&str> = Vec::new();
    for raw_line in text.split('\n') {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("event:") {
            event = Some(rest.trim_start().to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if event.is_none() && data_lines.is_empty() {
        return None;
    }
    Some(SseFrame {
        event,
        data: data_lines.join("\n"),
    })
}

/// Maps one SSE frame to at most one stream event.
///
/// `error` frames, and payloads carrying a top-level `error`, fail the stream.
pub(crate) fn map_frame_to_event(frame: &SseFrame) -> Result<Option<StreamEvent>, SessionError> {
    let data = frame.data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| SessionError::transport(format!("invalid SSE JSON frame: {e}")))?;
    if frame.event.as_deref() == Some("error") {
        return Err(stream_error(&value));
    }
    map_json_to_event(value).map(Some)
}

pub(crate) fn map_json_to_event(value: serde_json::Value) -> Result<StreamEvent, SessionError> {
    let event_type = value.get("type").and_then(|v| v.as_str());
    if event_type == Some("error") || value.get("error").is_some_and(|e| !e.is_null()) {
        return Err(stream_error(&value));
    }
    let event = match event_type {
        Some("response.output_text.delta") => match value.get("delta").and_then(|v| v.as_str()) {
            Some(delta) => StreamEvent::TextDelta {
                delta: delta.to_string(),
            },
            None => StreamEvent::Unknown(value),
        },
        Some("response.output_text.done") => match value.get("text").and_then(|v| v.as_str()) {
            Some(text) => StreamEvent::TextDone {
                text: text.to_string(),
            },
            None => StreamEvent::Unknown(value),
        },
        Some("response.output_item.added") => StreamEvent::ItemAdded {
            item: output_item(value),
        },
        Some("response.output_item.done") => StreamEvent::ItemDone {
            item: output_item(value),
        },
        _ => StreamEvent::Unknown(value),
    };
    Ok(event)
}

fn output_item(event: serde_json::Value) -> OutputItem {
    let action = event
        .get("item")
        .filter(|item| item.get("type").and_then(|v| v.as_str()) == Some("workflow_action"))
        .map(|item| WorkflowAction {
            action_id: ActionField::from_item(item, "action_id"),
            status: ActionField::from_item(item, "status"),
            previous_action_id: ActionField::from_item(item, "previous_action_id"),
        });
    match action {
        Some(action) => OutputItem::WorkflowAction(action),
        None => OutputItem::Other(event),
    }
}

fn stream_error(value: &serde_json::Value) -> SessionError {
    let message = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .or_else(|| value.get("message").and_then(|v| v.as_str()))
        .unwrap_or("workflow stream reported an error");
    SessionError::provider(message, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: &str) -> SseFrame {
        SseFrame {
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn sse_decoder_handles_partial_chunk_boundaries() {
        let mut decoder = SseDecoder::default();
        let part1 =
            b"event: response.output_text.delta\ndata: {\"type\":\"response.output_text.delta\",\"delta\":\"hel";
        let part2 = b"lo\"}\n\n";
        assert!(decoder.push_chunk(part1).is_empty());
        let frames = decoder.push_chunk(part2);
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0].event.as_deref(),
            Some("response.output_text.delta")
        );
        assert!(frames[0].data.ends_with("\"delta\":\"hello\"}"));
    }

    #[test]
    fn sse_decoder_accepts_crlf_delimiters_and_skips_comments() {
        let mut decoder = SseDecoder::default();
        let frames = decoder.push_chunk(b": keep-alive\r\n\r\ndata: [DONE]\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "[DONE]");
        assert_eq!(map_frame_to_event(&frames[0]), Ok(None));
    }

    #[test]
    fn sse_decoder_finds_delimiters_split_across_single_byte_chunks() {
        let mut decoder = SseDecoder::default();
        let input = b"data: {\"type\":\"a\"}\r\n\r\ndata: {\"type\":\"b\"}\n\n";
        let mut frames = Vec::new();
        for byte in input.iter() {
            frames.extend(decoder.push_chunk(std::slice::from_ref(byte)));
        }
        let data: Vec<_> = frames.iter().map(|f| f.data.as_str()).collect();
        assert_eq!(data, [r#"{"type":"a"}"#, r#"{"type":"b"}"#]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn sse_decoder_resumes_scan_without_revisiting_searched_bytes() {
        let mut decoder = SseDecoder::default();
        let payload = "x".repeat(64);
        assert!(decoder.push_chunk(format!("data: {payload}").as_bytes()).is_empty());
        assert_eq!(decoder.scanned, decoder.buf.len() - DELIMITER_OVERLAP);
        assert!(decoder.push_chunk(b"\r\n\r").is_empty());
        let frames = decoder.push_chunk(b"\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, payload);
        assert_eq!(decoder.scanned, 0);
    }

    #[test]
    fn sse_decoder_finish_flushes_trailing_frame() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push_chunk(b"data: {\"type\":\"x\"}").is_empty());
        let trailing = decoder.finish().expect("trailing frame");
        assert_eq!(trailing.data, "{\"type\":\"x\"}");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn maps_text_events() {
        let delta = map_frame_to_event(&frame(
            r#"{"type":"response.output_text.delta","delta":"Hi"}"#,
        ))
        .expect("delta");
        assert_eq!(delta, Some(StreamEvent::TextDelta { delta: "Hi".into() }));

        let done = map_frame_to_event(&frame(
            r#"{"type":"response.output_text.done","text":"Hi there"}"#,
        ))
        .expect("done");
        assert_eq!(
            done,
            Some(StreamEvent::TextDone {
                text: "Hi there".into()
            })
        );
    }

    #[test]
    fn maps_workflow_action_items() {
        let added = map_json_to_event(serde_json::json!({
            "type": "response.output_item.added",
            "item": {"type": "workflow_action", "action_id": "A1", "status": "in_progress"}
        }))
        .expect("added");
        assert_eq!(
            added,
            StreamEvent::ItemAdded {
                item: OutputItem::WorkflowAction(WorkflowAction::new("A1").status("in_progress")),
            }
        );

        let done = map_json_to_event(serde_json::json!({
            "type": "response.output_item.done",
            "item": {
                "type": "workflow_action",
                "action_id": "A2",
                "status": "completed",
                "previous_action_id": null
            }
        }))
        .expect("done");
        assert_eq!(
            done,
            StreamEvent::ItemDone {
                item: OutputItem::WorkflowAction(
                    WorkflowAction::new("A2")
                        .status("completed")
                        .previous_action_id(ActionField::Null)
                ),
            }
        );
    }

    #[test]
    fn workflow_action_without_id_is_still_an_action() {
        let added = map_json_to_event(serde_json::json!({
            "type": "response.output_item.added",
            "item": {"type": "workflow_action"}
        }))
        .expect("added");
        assert_eq!(
            added,
            StreamEvent::ItemAdded {
                item: OutputItem::WorkflowAction(WorkflowAction::new(ActionField::Absent)),
            }
        );
    }

    #[test]
    fn other_items_keep_the_raw_event() {
        let raw = serde_json::json!({
            "type": "response.output_item.done",
            "item": {"type": "message", "id": "msg_1"}
        });
        let event = map_json_to_event(raw.clone()).expect("item");
        assert_eq!(
            event,
            StreamEvent::ItemDone {
                item: OutputItem::Other(raw)
            }
        );
    }

    #[test]
    fn unrecognized_and_malformed_events_are_unknown() {
        let created = serde_json::json!({"type": "response.created", "response": {"id": "r1"}});
        assert_eq!(
            map_json_to_event(created.clone()),
            Ok(StreamEvent::Unknown(created))
        );

        let no_text = serde_json::json!({"type": "response.output_text.done"});
        assert_eq!(
            map_json_to_event(no_text.clone()),
            Ok(StreamEvent::Unknown(no_text))
        );
    }

    #[test]
    fn error_frames_fail_the_stream() {
        let named = SseFrame {
            event: Some("error".into()),
            data: r#"{"type":"error","message":"rate limited"}"#.into(),
        };
        let err = map_frame_to_event(&named).expect_err("error frame");
        assert_eq!(err, SessionError::provider("rate limited", None));

        let nested = frame(r#"{"error":{"message":"server overloaded"}}"#);
        let err = map_frame_to_event(&nested).expect_err("error payload");
        assert_eq!(err.message(), "server overloaded");
    }

    #[test]
    fn invalid_json_is_a_transport_error() {
        let err = map_frame_to_event(&frame("{not json")).expect_err("invalid json");
        assert!(matches!(err, SessionError::Transport { .. }));
    }
}
