//! Incremental Server-Sent Events consumer for the chat stream
//!
//! The chat backend answers with a chunked body of newline-delimited SSE
//! fields. Chunk boundaries are arbitrary: they may split a line, a JSON
//! payload, or a multi-byte UTF-8 character. Consumption happens in three
//! forward-only stages:
//!
//! 1. [`Utf8Decoder`] turns bytes into text, carrying incomplete code points
//!    over to the next chunk.
//! 2. [`LineBuffer`] splits text on `\n` and holds back the trailing
//!    fragment until its terminator arrives.
//! 3. [`EventStreamConsumer`] interprets complete lines:
//!    - `event:` lines are accepted and ignored.
//!    - `data:` lines carry a JSON [`StreamPayload`]; lines that are not
//!      JSON are dropped without ending the stream.
//!    - every other line is ignored.
//!
//! Interpreted payloads are reported to a [`StreamObserver`].

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// Stateful UTF-8 decoder
///
/// Bytes of a code point split across chunks are buffered until the rest
/// arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no pending bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::chat::stream::Utf8Decoder;
    ///
    /// let mut decoder = Utf8Decoder::new();
    /// let bytes = "船".as_bytes();
    /// assert_eq!(decoder.decode(&bytes[..1]), "");
    /// assert_eq!(decoder.decode(&bytes[1..]), "船");
    /// ```
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }
        text
    }

    /// Number of bytes held back waiting for the rest of a code point
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Accumulates decoded text and yields complete lines
///
/// After every [`push`](LineBuffer::push) the buffer holds at most one
/// unterminated line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and drain every complete line, in order
    ///
    /// The `\n` terminators are not included in the returned lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::chat::stream::LineBuffer;
    ///
    /// let mut lines = LineBuffer::new();
    /// assert_eq!(lines.push("data: a\ndata:"), vec!["data: a".to_string()]);
    /// assert_eq!(lines.remainder(), "data:");
    /// assert_eq!(lines.push(" b\n"), vec!["data: b".to_string()]);
    /// assert_eq!(lines.remainder(), "");
    /// ```
    pub fn push(&mut self, text: &str) -> Vec<String> {
        // The held-back fragment has no newline, so only `text` needs scanning.
        let Some(newline_in_text) = text.rfind('\n') else {
            self.buffer.push_str(text);
            return Vec::new();
        };
        let last_newline = self.buffer.len() + newline_in_text;
        self.buffer.push_str(text);

        let remainder = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, remainder);
        complete[..last_newline]
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// The unterminated fragment waiting for its newline
    pub fn remainder(&self) -> &str {
        &self.buffer
    }
}

/// A complete SSE line, classified by its field prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// `event:` field (value untrimmed)
    Event(&'a str),
    /// `data:` field, prefix stripped and value trimmed
    Data(&'a str),
    /// Anything else: comments, blank separators, unknown fields
    Other,
}

impl<'a> SseLine<'a> {
    /// Classify a line by its prefix
    pub fn parse(line: &'a str) -> Self {
        if let Some(value) = line.strip_prefix("event:") {
            SseLine::Event(value)
        } else if let Some(value) = line.strip_prefix("data:") {
            SseLine::Data(value.trim())
        } else {
            SseLine::Other
        }
    }
}

/// JSON payload carried by a `data:` line
///
/// Fields keep whatever JSON type the backend sent. [`StreamEvent`] decides
/// which one counts and how it reads as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamPayload {
    /// Text delta to append to the answer
    #[serde(default)]
    pub content: Option<Value>,
    /// Name of a tool the backend is invoking
    #[serde(default)]
    pub tool: Option<Value>,
    /// Arguments of that tool invocation
    #[serde(default)]
    pub args: Option<Value>,
    /// Backend-reported error
    #[serde(default)]
    pub error: Option<Value>,
}

impl StreamPayload {
    /// Parse the value of a `data:` line
    ///
    /// Returns `None` for text that is not JSON and for a bare `null`. Other
    /// non-object values carry no fields and parse to an empty payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::chat::stream::{StreamEvent, StreamPayload};
    ///
    /// let payload = StreamPayload::parse(r#"{"content":"hi","tool":{"name":"x"}}"#).unwrap();
    /// assert_eq!(StreamEvent::from(payload), StreamEvent::Content("hi".into()));
    /// assert!(StreamPayload::parse("keep-alive").is_none());
    /// ```
    pub fn parse(data: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Null) => None,
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            Ok(_) => Some(Self::default()),
            Err(e) => {
                tracing::trace!("Data line is not JSON: {}", e);
                None
            }
        }
    }
}

/// Whether a field value counts as present
///
/// `null`, `false`, zero and the empty string do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a field value the way string interpolation in the browser does
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// What a payload means to the application
///
/// Fields are checked in order `content`, `tool`, `error`; the first one
/// holding a truthy value wins.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text delta
    Content(String),
    /// A tool invocation (display only)
    Tool {
        /// Tool name
        name: String,
        /// Tool arguments, if any
        args: Option<Value>,
    },
    /// A backend error message
    Error(String),
    /// Valid JSON with nothing to act on
    Ignored,
}

impl From<StreamPayload> for StreamEvent {
    fn from(payload: StreamPayload) -> Self {
        fn present(value: Option<Value>) -> Option<String> {
            value.filter(is_truthy).map(|v| display_text(&v))
        }

        if let Some(content) = present(payload.content) {
            StreamEvent::Content(content)
        } else if let Some(name) = present(payload.tool) {
            StreamEvent::Tool {
                name,
                args: payload.args,
            }
        } else if let Some(error) = present(payload.error) {
            StreamEvent::Error(error)
        } else {
            StreamEvent::Ignored
        }
    }
}

/// Totals for one consumed stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Concatenation of every content delta
    pub content: String,
    /// Number of content deltas received
    pub deltas: usize,
    /// Number of tool events received
    pub tools: usize,
    /// Number of error events received
    pub errors: usize,
    /// Number of `data:` lines dropped because they were not a JSON payload
    pub discarded: usize,
}

/// Receives interpreted stream events in order
pub trait StreamObserver {
    /// A content delta arrived; `accumulated` already includes it
    fn on_delta(&mut self, delta: &str, accumulated: &str);

    /// The backend reported a tool invocation
    fn on_tool(&mut self, name: &str, args: Option<&Value>) {
        tracing::debug!(tool = name, args = ?args, "Tool called");
    }

    /// The backend reported an error; the stream keeps going
    fn on_error(&mut self, error: &str);

    /// The transport reached end-of-stream
    fn on_done(&mut self, _summary: &StreamSummary) {}
}

/// Per-session framing and dispatch state
///
/// Owns the decoder, the line buffer and the content accumulator of one
/// stream. Nothing here is shared between sessions.
#[derive(Debug, Default)]
pub struct EventStreamConsumer {
    decoder: Utf8Decoder,
    lines: LineBuffer,
    summary: StreamSummary,
}

impl EventStreamConsumer {
    /// Create a consumer for a fresh stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw chunk into the session, dispatching complete lines
    pub fn feed<O>(&mut self, chunk: &[u8], observer: &mut O)
    where
        O: StreamObserver + ?Sized,
    {
        let text = self.decoder.decode(chunk);
        for line in self.lines.push(&text) {
            self.dispatch_line(&line, observer);
        }
    }

    fn dispatch_line<O>(&mut self, line: &str, observer: &mut O)
    where
        O: StreamObserver + ?Sized,
    {
        let data = match SseLine::parse(line) {
            SseLine::Data(data) => data,
            SseLine::Event(_) | SseLine::Other => return,
        };

        let Some(payload) = StreamPayload::parse(data) else {
            self.summary.discarded += 1;
            return;
        };

        match StreamEvent::from(payload) {
            StreamEvent::Content(delta) => {
                self.summary.content.push_str(&delta);
                self.summary.deltas += 1;
                observer.on_delta(&delta, &self.summary.content);
            }
            StreamEvent::Tool { name, args } => {
                self.summary.tools += 1;
                observer.on_tool(&name, args.as_ref());
            }
            StreamEvent::Error(error) => {
                tracing::warn!("Stream error: {}", error);
                self.summary.errors += 1;
                observer.on_error(&error);
            }
            StreamEvent::Ignored => {}
        }
    }

    /// Content accumulated so far
    pub fn content(&self) -> &str {
        &self.summary.content
    }

    /// Finish the session
    ///
    /// A trailing fragment without a newline is never dispatched.
    pub fn finish(self) -> StreamSummary {
        if !self.lines.remainder().is_empty() {
            tracing::debug!(
                "Dropping unterminated trailing line ({} bytes)",
                self.lines.remainder().len()
            );
        }
        self.summary
    }
}

/// Consume a chunked SSE body until end-of-stream
///
/// Chunks are read strictly one at a time. `observer.on_done` runs once the
/// transport reports the end of the body.
///
/// # Errors
///
/// Returns the first read error from `stream`. Events dispatched before the
/// failure have already reached the observer; `on_done` is not called.
pub async fn consume_event_stream<S, O>(stream: S, observer: &mut O) -> Result<StreamSummary>
where
    S: Stream<Item = Result<Bytes>>,
    O: StreamObserver + ?Sized,
{
    futures::pin_mut!(stream);

    let mut consumer = EventStreamConsumer::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        consumer.feed(&chunk, observer);
    }

    let summary = consumer.finish();
    observer.on_done(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<String>,
        tools: Vec<String>,
        errors: Vec<String>,
        done: Option<StreamSummary>,
    }

    impl StreamObserver for Recorder {
        fn on_delta(&mut self, delta: &str, _accumulated: &str) {
            self.deltas.push(delta.to_string());
        }

        fn on_tool(&mut self, name: &str, _args: Option<&serde_json::Value>) {
            self.tools.push(name.to_string());
        }

        fn on_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn on_done(&mut self, summary: &StreamSummary) {
            self.done = Some(summary.clone());
        }
    }

    const BODY: &str = "event: message\n\
                        data: {\"content\":\"The Suez \"}\n\
                        \n\
                        data: {\"tool\":\"get_vessels\",\"args\":{\"id\":\"suez-canal\"}}\n\
                        data: keep-alive\n\
                        data: {\"content\":\"Canal sees ~60 ships/day 🚢\"}\n\
                        : comment\n\
                        data: {\"content\":\"，謝謝\"}\n";

    fn feed_in_pieces(body: &[u8], sizes: &[usize]) -> (Recorder, StreamSummary) {
        let mut consumer = EventStreamConsumer::new();
        let mut recorder = Recorder::default();
        let mut offset = 0;
        let mut i = 0;
        while offset < body.len() {
            let size = sizes[i % sizes.len()].max(1);
            let end = (offset + size).min(body.len());
            consumer.feed(&body[offset..end], &mut recorder);
            offset = end;
            i += 1;
        }
        (recorder, consumer.finish())
    }

    #[test]
    fn test_decoder_handles_split_multibyte() {
        let mut decoder = Utf8Decoder::new();
        let bytes = "🚢".as_bytes();
        assert_eq!(decoder.decode(&bytes[..2]), "");
        assert_eq!(decoder.pending_len(), 2);
        assert_eq!(decoder.decode(&bytes[2..]), "🚢");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_line_buffer_holds_back_fragment() {
        let mut lines = LineBuffer::new();
        assert!(lines.push("data: {\"con").is_empty());
        assert_eq!(lines.remainder(), "data: {\"con");
        assert_eq!(
            lines.push("tent\":\"x\"}\nevent: y\n"),
            vec!["data: {\"content\":\"x\"}", "event: y"]
        );
        assert_eq!(lines.remainder(), "");
    }

    #[test]
    fn test_line_buffer_long_line_in_small_pieces() {
        let mut lines = LineBuffer::new();
        let line = "x".repeat(10_000);
        for piece in line.as_bytes().chunks(7) {
            let piece = std::str::from_utf8(piece).unwrap();
            assert!(lines.push(piece).is_empty());
        }
        assert_eq!(lines.remainder().len(), line.len());
        assert_eq!(lines.push("\ny"), vec![line]);
        assert_eq!(lines.remainder(), "y");
    }

    #[test]
    fn test_line_buffer_yields_blank_lines() {
        let mut lines = LineBuffer::new();
        assert_eq!(lines.push("\n\n"), vec!["", ""]);
    }

    #[test]
    fn test_sse_line_classification() {
        assert_eq!(SseLine::parse("event: tool"), SseLine::Event(" tool"));
        assert_eq!(SseLine::parse("data:  {}  "), SseLine::Data("{}"));
        assert_eq!(SseLine::parse("data:{}\r"), SseLine::Data("{}"));
        assert_eq!(SseLine::parse(": ping"), SseLine::Other);
        assert_eq!(SseLine::parse(" data: {}"), SseLine::Other);
    }

    #[test]
    fn test_payload_priority() {
        let both: StreamPayload =
            serde_json::from_str(r#"{"content":"hi","error":"boom"}"#).unwrap();
        assert_eq!(StreamEvent::from(both), StreamEvent::Content("hi".into()));

        let empty_content: StreamPayload =
            serde_json::from_str(r#"{"content":"","error":"boom"}"#).unwrap();
        assert_eq!(
            StreamEvent::from(empty_content),
            StreamEvent::Error("boom".into())
        );

        let tool: StreamPayload = serde_json::from_str(r#"{"tool":"t","error":"e"}"#).unwrap();
        assert!(matches!(StreamEvent::from(tool), StreamEvent::Tool { .. }));

        let nothing: StreamPayload = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(StreamEvent::from(nothing), StreamEvent::Ignored);
    }

    #[test]
    fn test_payload_fields_of_any_json_type() {
        let with_tool_object =
            StreamPayload::parse(r#"{"content":"hi","tool":{"name":"lookup"}}"#).unwrap();
        assert_eq!(
            StreamEvent::from(with_tool_object),
            StreamEvent::Content("hi".into())
        );

        let error_object = StreamPayload::parse(r#"{"error":{"message":"quota"}}"#).unwrap();
        assert_eq!(
            StreamEvent::from(error_object),
            StreamEvent::Error("[object Object]".into())
        );

        let numeric = StreamPayload::parse(r#"{"content":42}"#).unwrap();
        assert_eq!(StreamEvent::from(numeric), StreamEvent::Content("42".into()));

        let float = StreamPayload::parse(r#"{"content":2.0}"#).unwrap();
        assert_eq!(StreamEvent::from(float), StreamEvent::Content("2".into()));

        let list = StreamPayload::parse(r#"{"content":["a",1,null,true]}"#).unwrap();
        assert_eq!(StreamEvent::from(list), StreamEvent::Content("a,1,,true".into()));

        let tool_object = StreamPayload::parse(r#"{"tool":{"name":"lookup"},"args":[1]}"#).unwrap();
        assert_eq!(
            StreamEvent::from(tool_object),
            StreamEvent::Tool {
                name: "[object Object]".into(),
                args: Some(serde_json::json!([1])),
            }
        );
    }

    #[test]
    fn test_falsy_fields_fall_through() {
        for data in [
            r#"{"content":0,"error":"boom"}"#,
            r#"{"content":false,"error":"boom"}"#,
            r#"{"content":null,"error":"boom"}"#,
            r#"{"content":"","tool":0,"error":"boom"}"#,
        ] {
            let payload = StreamPayload::parse(data).unwrap();
            assert_eq!(StreamEvent::from(payload), StreamEvent::Error("boom".into()), "{}", data);
        }
    }

    #[test]
    fn test_non_object_json_is_ignored_not_discarded() {
        assert_eq!(StreamPayload::parse("5"), Some(StreamPayload::default()));
        assert_eq!(StreamPayload::parse(r#""text""#), Some(StreamPayload::default()));
        assert_eq!(StreamPayload::parse("null"), None);
        assert_eq!(StreamPayload::parse("{oops"), None);

        let (recorder, summary) =
            feed_in_pieces(b"data: 5\ndata: null\ndata: {\"content\":\"ok\"}\n", &[100]);
        assert_eq!(summary.content, "ok");
        assert_eq!(summary.discarded, 1);
        assert_eq!(recorder.deltas, vec!["ok"]);
    }

    #[test]
    fn test_mixed_type_payloads_reach_the_observer() {
        let body = b"data: {\"content\":\"a\",\"tool\":{\"name\":\"lookup\"}}\n\
                     data: {\"error\":{\"message\":\"quota\"}}\n";
        let (recorder, summary) = feed_in_pieces(body, &[3]);
        assert_eq!(summary.content, "a");
        assert_eq!(summary.discarded, 0);
        assert_eq!(recorder.errors, vec!["[object Object]"]);
    }

    #[test]
    fn test_whole_body_in_one_chunk() {
        let (recorder, summary) = feed_in_pieces(BODY.as_bytes(), &[BODY.len()]);
        assert_eq!(summary.content, "The Suez Canal sees ~60 ships/day 🚢，謝謝");
        assert_eq!(summary.deltas, 3);
        assert_eq!(summary.tools, 1);
        assert_eq!(summary.discarded, 1);
        assert_eq!(recorder.tools, vec!["get_vessels"]);
        assert!(recorder.errors.is_empty());
    }

    #[test]
    fn test_chunking_invariance() {
        let body = BODY.as_bytes();
        let (_, expected) = feed_in_pieces(body, &[body.len()]);

        for sizes in [
            vec![1],
            vec![2],
            vec![3],
            vec![5, 1, 7],
            vec![13],
            vec![64],
        ] {
            let (recorder, summary) = feed_in_pieces(body, &sizes);
            assert_eq!(summary, expected, "chunk sizes {:?}", sizes);
            assert_eq!(recorder.deltas.concat(), expected.content);
        }

        for split in 0..=body.len() {
            let mut consumer = EventStreamConsumer::new();
            let mut recorder = Recorder::default();
            consumer.feed(&body[..split], &mut recorder);
            consumer.feed(&body[split..], &mut recorder);
            assert_eq!(consumer.finish().content, expected.content, "split at {}", split);
        }
    }

    #[test]
    fn test_invalid_json_does_not_disturb_content() {
        let (_, summary) = feed_in_pieces(b"data: not-json\ndata: {\"content\":\"hi\"}\n", &[100]);
        assert_eq!(summary.content, "hi");
        assert_eq!(summary.discarded, 1);
    }

    #[test]
    fn test_unterminated_last_line_is_not_dispatched() {
        let (recorder, summary) = feed_in_pieces(b"data: {\"content\":\"a\"}\ndata: {\"content\":\"b\"}", &[100]);
        assert_eq!(summary.content, "a");
        assert_eq!(recorder.deltas, vec!["a"]);
    }

    #[test]
    fn test_error_does_not_reset_accumulator() {
        let body = b"data: {\"content\":\"a\"}\ndata: {\"error\":\"overloaded\"}\ndata: {\"content\":\"b\"}\n";
        let (recorder, summary) = feed_in_pieces(body, &[100]);
        assert_eq!(recorder.errors, vec!["overloaded"]);
        assert_eq!(summary.content, "ab");
        assert_eq!(summary.errors, 1);
    }

    #[tokio::test]
    async fn test_consume_event_stream_calls_on_done() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"content\":\"he")),
            Ok(Bytes::from_static(b"llo\"}\n")),
        ];
        let mut recorder = Recorder::default();
        let summary = consume_event_stream(futures::stream::iter(chunks), &mut recorder)
            .await
            .unwrap();
        assert_eq!(summary.content, "hello");
        assert_eq!(recorder.done, Some(summary));
    }

    #[tokio::test]
    async fn test_consume_event_stream_propagates_read_error() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"content\":\"partial\"}\n")),
            Err(anyhow::anyhow!("connection reset")),
            Ok(Bytes::from_static(b"data: {\"content\":\"never\"}\n")),
        ];
        let mut recorder = Recorder::default();
        let result = consume_event_stream(futures::stream::iter(chunks), &mut recorder).await;
        assert!(result.is_err());
        assert_eq!(recorder.deltas, vec!["partial"]);
        assert!(recorder.done.is_none());
    }
}
