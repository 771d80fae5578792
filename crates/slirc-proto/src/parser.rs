//! Incremental frame parser.
//!
//! [`FrameParser`] turns decoded text chunks into [`RawMessage`]s. It holds a
//! single pending buffer across calls: whatever follows the last line
//! terminator stays there until a later chunk completes it.
//!
//! ```
//! use slirc_proto::FrameParser;
//!
//! let mut parser = FrameParser::new();
//! let first: Vec<_> = parser.feed("PING :a\r\nPING :b\r\nPI").collect();
//! assert_eq!(first.len(), 2);
//!
//! let second: Vec<_> = parser.feed("NG :c\r\n").collect();
//! assert_eq!(second[0].params, ["c"]);
//! ```

use crate::message::{RawMessage, LINE_TERMINATOR};

/// Line reassembly state for one session.
#[derive(Debug, Default, Clone)]
pub struct FrameParser {
    buffer: String,
    /// Offset of the first byte not yet handed out as part of a message.
    start: usize,
}

impl FrameParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and iterate over the messages it completes.
    ///
    /// The iterator is lazy: each line is decoded when pulled. Lines that are
    /// not pulled before the iterator is dropped stay buffered and come out of
    /// the next call, so no line is lost or produced twice.
    pub fn feed(&mut self, chunk: &str) -> Messages<'_> {
        self.compact();
        self.buffer.push_str(chunk);
        Messages { parser: self }
    }

    /// Iterate over complete lines already buffered, without new input.
    pub fn messages(&mut self) -> Messages<'_> {
        Messages { parser: self }
    }

    /// Text buffered but not yet returned as a message.
    pub fn pending(&self) -> &str {
        &self.buffer[self.start..]
    }

    /// Whether anything is waiting in the buffer.
    pub fn has_pending(&self) -> bool {
        self.start < self.buffer.len()
    }

    /// Discard all buffered text.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.start = 0;
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }
    }

    fn next_message(&mut self) -> Option<RawMessage> {
        let rest = &self.buffer[self.start..];
        let end = rest.find(LINE_TERMINATOR)?;
        let message = RawMessage::parse(&rest[..end]);
        self.start += end + LINE_TERMINATOR.len();
        Some(message)
    }
}

/// Lazy sequence of messages completed by a [`FrameParser::feed`] call.
#[derive(Debug)]
pub struct Messages<'a> {
    parser: &'a mut FrameParser,
}

impl Iterator for Messages<'_> {
    type Item = RawMessage;

    fn next(&mut self) -> Option<RawMessage> {
        self.parser.next_message()
    }
}
