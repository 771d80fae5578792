//! Outbound line construction.

/// Line terminator used on the wire in both directions.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Marker introducing the trailing parameter.
pub const TRAILING_MARKER: char = ':';

/// Check if a final argument needs the trailing marker.
///
/// An argument that already starts with the marker is taken as pre-marked and
/// left alone, so callers can pass `":text"` without getting `"::text"`.
#[inline]
pub fn needs_colon_prefix(s: &str) -> bool {
    !s.starts_with(TRAILING_MARKER) && (s.is_empty() || s.contains(' '))
}

/// Build one outbound line, terminator included.
///
/// Absent parameters at the end of `params` are dropped first; an absent
/// parameter in the middle is written as an empty string. The last remaining
/// parameter gets the trailing marker when [`needs_colon_prefix`] says so.
/// Anything after an embedded line break is cut so a parameter can never
/// smuggle in a second command.
///
/// ```
/// use slirc_proto::message::frame_line;
///
/// assert_eq!(
///     frame_line("PRIVMSG", &[Some("#chan"), Some("hello world")]),
///     "PRIVMSG #chan :hello world\r\n"
/// );
/// assert_eq!(frame_line::<&str>("NICK", &[Some("me"), None]), "NICK me\r\n");
/// ```
pub fn frame_line<S: AsRef<str>>(command: &str, params: &[Option<S>]) -> String {
    let used = params
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1);
    let params = &params[..used];

    let mut line = String::with_capacity(64);
    line.push_str(command);

    for (i, param) in params.iter().enumerate() {
        let param = param.as_ref().map_or("", AsRef::as_ref);
        line.push(' ');
        if i + 1 == params.len() && needs_colon_prefix(param) {
            line.push(TRAILING_MARKER);
        }
        line.push_str(param);
    }

    if let Some(pos) = line.find(['\r', '\n']) {
        line.truncate(pos);
    }

    line.push_str(LINE_TERMINATOR);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_trailing_with_space() {
        assert_eq!(
            frame_line("PRIVMSG", &[Some("#chan"), Some("hello world")]),
            "PRIVMSG #chan :hello world\r\n"
        );
    }

    #[test]
    fn test_frame_does_not_double_prefix() {
        assert_eq!(
            frame_line("PRIVMSG", &[Some("#chan"), Some(":already")]),
            "PRIVMSG #chan :already\r\n"
        );
    }

    #[test]
    fn test_frame_premarked_with_space() {
        assert_eq!(
            frame_line("PRIVMSG", &[Some("#chan"), Some(":two words")]),
            "PRIVMSG #chan :two words\r\n"
        );
    }

    #[test]
    fn test_frame_empty_last_param() {
        assert_eq!(frame_line("TOPIC", &[Some("#chan"), Some("")]), "TOPIC #chan :\r\n");
    }

    #[test]
    fn test_frame_plain_last_param() {
        assert_eq!(frame_line("JOIN", &[Some("#chan")]), "JOIN #chan\r\n");
    }

    #[test]
    fn test_frame_drops_trailing_absent_params() {
        assert_eq!(
            frame_line("JOIN", &[Some("#chan"), None, None]),
            "JOIN #chan\r\n"
        );
    }

    #[test]
    fn test_frame_absent_in_middle_is_empty() {
        assert_eq!(
            frame_line("USER", &[Some("guest"), None, Some("*")]),
            "USER guest  *\r\n"
        );
    }

    #[test]
    fn test_frame_no_params() {
        assert_eq!(frame_line::<String>("QUIT", &[]), "QUIT\r\n");
        assert_eq!(frame_line::<String>("QUIT", &[None]), "QUIT\r\n");
    }

    #[test]
    fn test_frame_truncates_injected_line() {
        assert_eq!(
            frame_line("PRIVMSG", &[Some("#c"), Some("hi\r\nQUIT :bye")]),
            "PRIVMSG #c :hi\r\n"
        );
    }

    #[test]
    fn test_frame_only_last_param_is_marked() {
        assert_eq!(
            frame_line("CMD", &[Some(""), Some("x")]),
            "CMD  x\r\n"
        );
    }
}
