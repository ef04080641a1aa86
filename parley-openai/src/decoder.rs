//! SSE stream decoding for chat-completions replies.
//!
//! The wire format is one frame per line:
//! ```text
//! data: {"id":"...","choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}
//! data: {"id":"...","choices":[{"delta":{"content":"lo"},"finish_reason":null}]}
//! data: [DONE]
//! ```
//!
//! Reads may split a line, or a multi-byte character, anywhere. The decoder
//! carries both across calls so the yielded deltas do not depend on how the
//! bytes were chunked.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use parley_core::ChatError;

use crate::types::StreamFrame;

/// Prefix of a data line.
pub const DATA_PREFIX: &str = "data: ";

/// Terminator line marking the end of the stream.
pub const DONE_LINE: &str = "data: [DONE]";

/// Incremental decoder for one reply.
///
/// Feed it raw chunks with [`feed`](Self::feed) and call
/// [`finish`](Self::finish) once the transport reports end-of-data. Not
/// restartable: once the terminator line has been seen or `finish` has been
/// called, further input is ignored.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence from the last chunk.
    utf8_tail: Vec<u8>,
    /// Text after the last line break; never contains `\n` between calls.
    pending: String,
    /// Set once the terminator line is seen.
    done: bool,
    /// Set by `finish`.
    closed: bool,
    /// Last `finish_reason` observed.
    finish_reason: Option<String>,
}

impl StreamDecoder {
    /// Create a decoder with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminator line has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Last `finish_reason` reported by the server.
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    /// Decode one chunk and return the deltas completed by it, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done || self.closed {
            return Vec::new();
        }
        self.decode_utf8(chunk);

        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        let mut deltas = Vec::new();
        for line in complete.split('\n') {
            self.process_line(line, &mut deltas);
            if self.done {
                self.pending.clear();
                break;
            }
        }
        deltas
    }

    /// Signal end-of-data and return any deltas from the unterminated tail.
    ///
    /// A dangling partial character is decoded as U+FFFD. A final line
    /// without a trailing newline is processed like any other.
    pub fn finish(&mut self) -> Vec<String> {
        let mut deltas = Vec::new();
        if self.done || self.closed {
            return deltas;
        }
        self.closed = true;
        if !self.utf8_tail.is_empty() {
            self.utf8_tail.clear();
            self.pending.push(char::REPLACEMENT_CHARACTER);
        }
        let tail = std::mem::take(&mut self.pending);
        self.process_line(&tail, &mut deltas);
        deltas
    }

    /// Append `chunk` to the pending text, holding back an incomplete
    /// trailing sequence for the next call.
    fn decode_utf8(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.utf8_tail);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.pending.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    self.pending.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(invalid) => {
                            self.pending.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid..];
                        }
                        None => {
                            self.utf8_tail = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    fn process_line(&mut self, line: &str, deltas: &mut Vec<String>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line == DONE_LINE {
            self.done = true;
            return;
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return;
        };

        let frame: StreamFrame = match serde_json::from_str(payload) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::trace!(error = %e, "skipping malformed stream frame");
                return;
            }
        };

        if let Some(reason) = frame.finish_reason() {
            self.finish_reason = Some(reason.to_string());
        }
        if let Some(text) = frame.delta_text() {
            deltas.push(text.to_string());
        }
    }
}

/// Decode a byte stream lazily into a stream of deltas.
///
/// Deltas are yielded as soon as the chunk completing them arrives. A
/// transport error is yielded once and ends the stream; the stream also
/// ends at the terminator line or at end-of-data.
pub fn decode_stream<S>(byte_stream: S) -> impl Stream<Item = Result<String, ChatError>> + Send
where
    S: Stream<Item = Result<Bytes, ChatError>> + Send,
{
    async_stream::stream! {
        let mut decoder = StreamDecoder::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            for delta in decoder.feed(&chunk) {
                yield Ok(delta);
            }
            if decoder.is_done() {
                return;
            }
        }

        for delta in decoder.finish() {
            yield Ok(delta);
        }
    }
}
