//! Property-based tests for frame reassembly.
//!
//! Whatever boundaries the transport picks, the parser must hand out the same
//! messages it would for the whole stream in one piece.

use proptest::prelude::*;
use slirc_proto::{FrameParser, LineDecoder, RawMessage};

// =============================================================================
// STRATEGIES
// =============================================================================

/// One line body without terminator characters.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex(":[a-z]{1,8}![a-z]{1,8}@[a-z.]{1,12} PRIVMSG #[a-z]{1,10} :[^\r\n]{0,60}")
            .expect("valid regex"),
        prop::string::string_regex(":[a-z.]{1,12} [0-9]{3} [a-z]{1,9} :[^\r\n]{0,40}")
            .expect("valid regex"),
        prop::string::string_regex("@[a-z]=[0-9]{1,4} PING :[a-z0-9]{1,10}").expect("valid regex"),
        prop::string::string_regex("[A-Z]{1,8}( [a-z#]{1,6}){0,5}").expect("valid regex"),
        Just(String::new()),
    ]
}

/// A complete stream plus the cut points used to split it.
fn stream_and_cuts() -> impl Strategy<Value = (String, Vec<usize>)> {
    prop::collection::vec(line_strategy(), 1..20).prop_flat_map(|lines| {
        let stream: String = lines.iter().map(|l| format!("{l}\r\n")).collect();
        let len = stream.len();
        (Just(stream), prop::collection::vec(0..=len, 0..12))
    })
}

/// Split on byte offsets, nudged back to char boundaries.
fn split_at_cuts(stream: &str, cuts: &[usize]) -> Vec<String> {
    let mut cuts: Vec<usize> = cuts
        .iter()
        .map(|&c| {
            let mut c = c;
            while !stream.is_char_boundary(c) {
                c -= 1;
            }
            c
        })
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(stream[start..cut].to_owned());
        start = cut;
    }
    chunks.push(stream[start..].to_owned());
    chunks
}

fn parse_whole(stream: &str) -> Vec<RawMessage> {
    FrameParser::new().feed(stream).collect()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn chunked_feed_matches_single_feed((stream, cuts) in stream_and_cuts()) {
        let expected = parse_whole(&stream);

        let mut parser = FrameParser::new();
        let mut actual = Vec::new();
        for chunk in split_at_cuts(&stream, &cuts) {
            actual.extend(parser.feed(&chunk));
        }

        prop_assert_eq!(actual, expected);
        prop_assert!(!parser.has_pending());
    }

    #[test]
    fn byte_chunks_through_decoder_match((stream, cuts) in stream_and_cuts()) {
        let expected = parse_whole(&stream);
        let bytes = stream.as_bytes();

        let mut cuts = cuts;
        cuts.sort_unstable();
        cuts.dedup();

        let mut decoder = LineDecoder::new("utf-8").expect("utf-8 is a known label");
        let mut parser = FrameParser::new();
        let mut actual = Vec::new();
        let mut start = 0;
        for cut in cuts.into_iter().chain(std::iter::once(bytes.len())) {
            let text = decoder.decode(&bytes[start..cut]);
            actual.extend(parser.feed(&text));
            start = cut;
        }

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn unterminated_tail_stays_pending(body in "[A-Z]{1,8} :[a-z ]{0,20}") {
        let mut parser = FrameParser::new();
        prop_assert_eq!(parser.feed(&body).count(), 0);
        prop_assert_eq!(parser.pending(), body.as_str());

        let messages: Vec<_> = parser.feed("\r\n").collect();
        prop_assert_eq!(messages.len(), 1);
        prop_assert_eq!(&messages[0].raw, &body);
    }

    #[test]
    fn parse_never_panics(line in "[^\r\n]{0,300}") {
        let msg = RawMessage::parse(&line);
        prop_assert_eq!(msg.raw, line);
    }
}

// =============================================================================
// FIXED CASES
// =============================================================================

#[test]
fn buffering_three_lines() {
    let mut parser = FrameParser::new();
    let first: Vec<_> = parser.feed("A\r\nB\r\nC").map(|m| m.command).collect();
    assert_eq!(first, ["A", "B"]);

    let second: Vec<_> = parser.feed("\r\n").map(|m| m.command).collect();
    assert_eq!(second, ["C"]);
}

#[test]
fn numeric_welcome_line() {
    let mut parser = FrameParser::new();
    let messages: Vec<_> = parser.feed(":host 001 nick :Welcome\r\n").collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].prefix, "host");
    assert_eq!(messages[0].command, "RPL_WELCOME");
    assert_eq!(messages[0].params, ["nick", "Welcome"]);
}
