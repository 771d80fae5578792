use std::fmt;

/// One decoded IRC line.
///
/// `RawMessage` is deliberately untyped: the command is kept as a string
/// (numeric replies already resolved to their symbolic name) and parameters
/// are kept in wire order. Interpreting them is left to higher layers.
///
/// # Example
///
/// ```
/// use slirc_proto::RawMessage;
///
/// let msg = RawMessage::parse(":irc.example.net 001 nick :Welcome");
/// assert_eq!(msg.prefix, "irc.example.net");
/// assert_eq!(msg.command, "RPL_WELCOME");
/// assert_eq!(msg.params, ["nick", "Welcome"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMessage {
    /// Origin prefix without the leading `:`; empty when the line had none.
    pub prefix: String,
    /// Command token, or the symbolic name of a known numeric reply.
    pub command: String,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<String>,
    /// The original line without its terminator.
    pub raw: String,
}

impl RawMessage {
    /// Decode a single line (without `\r\n`). Never fails.
    pub fn parse(line: &str) -> Self {
        super::nom_parser::parse_line(line)
    }

    /// Get the parameter at `index`.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The last parameter, which is where trailing text ends up.
    #[inline]
    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Whether the line carried an origin prefix.
    #[inline]
    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
