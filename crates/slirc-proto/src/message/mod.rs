//! IRC message representation, line decoding and outbound framing.

mod nom_parser;
mod serialize;
mod types;

pub use self::serialize::{frame_line, needs_colon_prefix, LINE_TERMINATOR, TRAILING_MARKER};
pub use self::types::RawMessage;
