//! Incremental stream assembly for `streamGenerateContent` responses.
//!
//! The response body arrives as byte chunks with no alignment to line or
//! JSON-object boundaries. Chunks accumulate in a byte buffer that is split
//! on `b'\n'`; a newline byte never occurs inside a multi-byte UTF-8
//! sequence, so only complete lines are ever decoded and characters split
//! across chunk boundaries reassemble correctly. Each line is either an
//! SSE-style `data: <json>` record or a raw JSON document. Anything that
//! fails to parse is skipped, since the stream may carry keep-alive or
//! partial framing; that is not an error.

use futures_util::StreamExt;

use crate::error::TranslateError;
use crate::types::GenerateContentResponse;

pub(crate) struct StreamAssembler<'a> {
    buffer: Vec<u8>,
    translated: String,
    sink: Option<&'a mut (dyn FnMut(&str) + Send)>,
}

impl<'a> StreamAssembler<'a> {
    pub fn new(sink: Option<&'a mut (dyn FnMut(&str) + Send)>) -> Self {
        Self {
            buffer: Vec::new(),
            translated: String::new(),
            sink,
        }
    }

    /// Append one chunk and process every complete line it closes.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            self.process_line(&line);
        }
    }

    /// Flush the trailing buffer as final line(s) and return the accumulated
    /// translation. A stream that ends without a trailing newline still has
    /// its last record processed here.
    pub fn finish(mut self) -> String {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let rest = String::from_utf8_lossy(&rest).into_owned();
            for line in rest.split('\n') {
                self.process_line(line);
            }
        }
        self.translated
    }

    fn process_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "data: [DONE]" {
            return;
        }

        // SSE framing check runs on the untrimmed line.
        let json_str = match line.strip_prefix("data:") {
            Some(rest) => rest.trim(),
            None => line,
        };

        let Ok(record) = serde_json::from_str::<GenerateContentResponse>(json_str) else {
            return;
        };
        let Some(candidate) = record.candidates.first() else {
            return;
        };

        // The delta shape is only consulted when no content parts are present.
        let fragment = if candidate
            .content
            .as_ref()
            .is_some_and(|content| !content.parts.is_empty())
        {
            candidate.part_text()
        } else {
            candidate.delta_text()
        };

        if let Some(fragment) = fragment {
            self.translated.push_str(fragment);
            if let Some(sink) = self.sink.as_mut() {
                sink(&self.translated);
            }
        }
    }
}

/// Drive the live response body through a [`StreamAssembler`].
///
/// A read error aborts the loop with [`TranslateError::Stream`]; dropping the
/// body stream on that path releases the connection.
pub(crate) async fn assemble_stream(
    response: reqwest::Response,
    sink: Option<&mut (dyn FnMut(&str) + Send)>,
) -> Result<String, TranslateError> {
    let mut assembler = StreamAssembler::new(sink);
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(TranslateError::Stream)?;
        assembler.push_chunk(&chunk);
    }
    Ok(assembler.finish())
}
