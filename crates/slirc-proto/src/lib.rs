//! # slirc-proto
//!
//! The wire layer of the slirc client: everything needed to turn an IRC byte
//! stream into messages and messages back into lines, with no async runtime
//! attached.
//!
//! ## Features
//!
//! - Incremental text decoding that survives characters split across reads
//! - A restartable frame parser that buffers partial lines between calls
//! - Permissive line decoding: malformed input still yields a message
//! - Numeric replies resolved to symbolic names through a static registry
//! - Outbound line framing with trailing-parameter marking
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{FrameParser, LineDecoder};
//!
//! let mut decoder = LineDecoder::new("utf-8").unwrap();
//! let mut parser = FrameParser::new();
//!
//! let text = decoder.decode(b":irc.example.net 001 me :Welcome\r\n:irc.exa");
//! let messages: Vec<_> = parser.feed(&text).collect();
//!
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].command, "RPL_WELCOME");
//! assert_eq!(parser.pending(), ":irc.exa");
//! ```
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod line;
pub mod message;
pub mod parser;
pub mod response;

pub use self::error::ProtocolError;
pub use self::line::LineDecoder;
pub use self::message::{frame_line, RawMessage, LINE_TERMINATOR, TRAILING_MARKER};
pub use self::parser::{FrameParser, Messages};
pub use self::response::{numeric_code, resolve_command, symbolic_name};
