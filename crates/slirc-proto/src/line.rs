//! Incremental text codec for IRC byte streams.
//!
//! Transport reads split the stream at arbitrary byte offsets, which may land
//! inside a multi-byte character. [`LineDecoder`] keeps the partial character
//! between calls so the text handed to the frame parser is always complete.

use std::borrow::Cow;

use encoding::{CoderResult, Decoder, Encoding};

use crate::error::{ProtocolError, Result};

/// Streaming byte-to-text decoder with a matching encoder.
pub struct LineDecoder {
    encoding: &'static Encoding,
    decoder: Decoder,
}

impl LineDecoder {
    /// Create a new decoder for the given encoding label (e.g. `"utf-8"`,
    /// `"iso-8859-1"`).
    pub fn new(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_string()))?;

        Ok(Self {
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
        })
    }

    /// A decoder for the same encoding with no carried-over state.
    pub fn fresh(&self) -> Self {
        Self {
            encoding: self.encoding,
            decoder: self.encoding.new_decoder_without_bom_handling(),
        }
    }

    /// Canonical name of the configured encoding.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one chunk of bytes.
    ///
    /// Bytes belonging to a character that continues in the next chunk are
    /// held back and emitted by the next call. Malformed sequences decode to
    /// U+FFFD rather than failing.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut out = String::new();
        let mut src = bytes;

        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len() * 3 + 16);
            out.reserve(needed);

            let (result, read, _had_errors) = self.decoder.decode_to_string(src, &mut out, false);
            src = &src[read..];

            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }

        out
    }

    /// Drop any partial character held from a previous chunk.
    pub fn reset(&mut self) {
        self.decoder = self.encoding.new_decoder_without_bom_handling();
    }

    /// Encode an outbound line into wire bytes.
    pub fn encode<'a>(&self, line: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _enc, _had_errors) = self.encoding.encode(line);
        bytes
    }
}

impl std::fmt::Debug for LineDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineDecoder")
            .field("encoding", &self.encoding.name())
            .finish_non_exhaustive()
    }
}
