//! SSE frame decoding for the streaming completion response
//!
//! The wire format is newline-delimited: blank lines, `:`-prefixed
//! comments, and `data: <json>` frames, optionally terminated by a frame
//! whose payload is `[DONE]`. The transport may split a frame, or a
//! multi-byte character, at any byte offset; the decoder buffers across
//! chunk boundaries and re-queues a data frame whose JSON arrives
//! truncated. It is a pure synchronous state machine so chunk-split
//! behavior is testable without a transport.

use serde::Deserialize;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Bytes received but not yet resolved into complete lines.
///
/// Decoding is stateful across chunks: up to three trailing bytes of a
/// split UTF-8 scalar are held back and decoded exactly once, when the
/// continuation bytes arrive.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    text: String,
    partial: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw transport chunk, decoding every complete scalar.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.partial.extend_from_slice(chunk);
        loop {
            match std::str::from_utf8(&self.partial) {
                Ok(_) => {
                    self.text.push_str(&String::from_utf8_lossy(&self.partial));
                    self.partial.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    match err.error_len() {
                        // A scalar split at the chunk boundary; keep the
                        // tail until the rest of it arrives.
                        None => {
                            let tail = self.partial.split_off(valid);
                            self.text
                                .push_str(&String::from_utf8_lossy(&self.partial));
                            self.partial = tail;
                            return;
                        }
                        // Genuinely invalid bytes, not a split point.
                        Some(bad) => {
                            self.text
                                .push_str(&String::from_utf8_lossy(&self.partial[..valid]));
                            self.text.push('\u{FFFD}');
                            self.partial.drain(..valid + bad);
                        }
                    }
                }
            }
        }
    }

    /// Remove and return the prefix up to the first newline, consuming the
    /// newline and stripping a trailing carriage return.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.text.find('\n')?;
        let mut line: String = self.text.drain(..=pos).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Restore a line the caller could not consume, byte-for-byte, at the
    /// front of the buffer.
    pub fn push_back_line(&mut self, line: &str) {
        self.text.insert(0, '\n');
        self.text.insert_str(0, line);
    }
}

#[derive(Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// Incremental decoder turning raw byte chunks into ordered text deltas.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: FrameBuffer,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one transport chunk into the deltas it completes, in wire
    /// order.
    ///
    /// A `[DONE]` payload stops the line loop for this chunk only; lines
    /// still buffered behind it are picked up by the next call. A data
    /// frame whose JSON does not parse is treated as a frame split
    /// upstream: the raw line goes back to the front of the buffer and
    /// decoding resumes on the next chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend(chunk);

        let mut deltas = Vec::new();
        while let Some(line) = self.buffer.next_line() {
            if line.trim().is_empty() || line.starts_with(':') {
                continue;
            }
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = payload.trim();
            if payload == DONE_SENTINEL {
                break;
            }

            match serde_json::from_str::<StreamResponse>(payload) {
                Ok(record) => {
                    if let Some(content) = record
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        && !content.is_empty()
                    {
                        deltas.push(content);
                    }
                }
                Err(_) => {
                    tracing::debug!(len = line.len(), "re-queueing partial data frame");
                    self.buffer.push_back_line(&line);
                    break;
                }
            }
        }
        deltas
    }
}
