//! Nom-based permissive line decoder.
//!
//! Every sub-parser here accepts empty input, so decoding always produces a
//! message. Semantic validation belongs to whoever consumes the message.

use nom::{
    bytes::complete::take_till,
    character::complete::{char, space0},
    combinator::opt,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use super::types::RawMessage;
use crate::response::resolve_command;

/// Skip the IRCv3 metadata segment (the part after `@` and before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_till(|c: char| c == ' '))(input)
}

/// Parse the origin prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_till(|c: char| c == ' '))(input)
}

/// Parse the command token, up to the next space or end of line.
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == ' ')(input)
}

/// Split what follows the command into parameters.
///
/// Runs of spaces separate middle parameters. A parameter starting with `:`
/// swallows the rest of the line, embedded spaces included, and loses its
/// trailing whitespace.
fn parse_params(input: &str) -> SmallVec<[&str; 15]> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.trim_end());
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

/// A decoded line with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; 15]>,
}

/// ```text
/// [@tags] [:prefix] <command> [params...] [:trailing]
/// ```
pub(crate) fn parse_message(input: &str) -> IResult<&str, ParsedLine<'_>> {
    // Metadata is recognised only so it can be skipped.
    let (input, _tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;

    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;

    let (input, command) = parse_command(input)?;
    let params = parse_params(input);

    Ok((
        "",
        ParsedLine {
            prefix,
            command,
            params,
        },
    ))
}

/// Decode one line into an owned [`RawMessage`].
pub(crate) fn parse_line(line: &str) -> RawMessage {
    match parse_message(line) {
        Ok((_, parsed)) => RawMessage {
            prefix: parsed.prefix.unwrap_or_default().to_owned(),
            command: resolve_command(parsed.command).into_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
            raw: line.to_owned(),
        },
        // None of the combinators above can fail on complete input; keep the
        // line rather than dropping it if that ever changes.
        Err(_) => RawMessage {
            command: line.to_owned(),
            raw: line.to_owned(),
            ..RawMessage::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_ping() {
        let msg = parse_line("PING :server");
        assert_eq!(msg.prefix, "");
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, ["server"]);
        assert_eq!(msg.raw, "PING :server");
    }

    #[test]
    fn test_parse_privmsg_with_prefix() {
        let msg = parse_line(":nick!user@host PRIVMSG #channel :Hello, world!");
        assert_eq!(msg.prefix, "nick!user@host");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, ["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_parse_numeric_resolves_to_symbol() {
        let msg = parse_line(":host 001 nick :Welcome");
        assert_eq!(msg.prefix, "host");
        assert_eq!(msg.command, "RPL_WELCOME");
        assert_eq!(msg.params, ["nick", "Welcome"]);
    }

    #[test]
    fn test_parse_unknown_numeric_verbatim() {
        let msg = parse_line(":host 999 nick :odd");
        assert_eq!(msg.command, "999");
    }

    #[test]
    fn test_parse_tags_are_skipped() {
        let msg = parse_line("@time=2023-01-01T00:00:00Z;msgid=abc :nick PRIVMSG #ch :Hi");
        assert_eq!(msg.prefix, "nick");
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, ["#ch", "Hi"]);
    }

    #[test]
    fn test_parse_empty_line() {
        let msg = parse_line("");
        assert_eq!(msg.command, "");
        assert_eq!(msg.prefix, "");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_trailing_keeps_inner_spaces_and_trims_end() {
        let msg = parse_line("PRIVMSG #c :  spaced   out  ");
        assert_eq!(msg.params, ["#c", "  spaced   out"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = parse_line("TOPIC #c :");
        assert_eq!(msg.params, ["#c", ""]);
    }

    #[test]
    fn test_parse_collapses_middle_spaces() {
        let msg = parse_line("MODE   #c  +o   nick");
        assert_eq!(msg.command, "MODE");
        assert_eq!(msg.params, ["#c", "+o", "nick"]);
    }

    #[test]
    fn test_parse_no_params() {
        let msg = parse_line("QUIT");
        assert_eq!(msg.command, "QUIT");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_prefix_only() {
        let msg = parse_line(":lonely");
        assert_eq!(msg.prefix, "lonely");
        assert_eq!(msg.command, "");
    }

    #[test]
    fn test_parse_command_is_case_sensitive() {
        assert_eq!(parse_line("privmsg #c :x").command, "privmsg");
    }

    #[test]
    fn test_parse_more_than_fifteen_params() {
        let line = format!("CMD {}", (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join(" "));
        assert_eq!(parse_line(&line).params.len(), 20);
    }
}
