//! Network layer: transport streams and the connection state machine.

mod connection;
mod transport;

pub use connection::{Connection, ConnectionState};
pub(crate) use connection::is_benign;
pub use transport::{AsyncStream, BoxedStream, Connector, TcpConnector};

use std::fmt;

use serde::Serialize;

/// Target of the current or last connection.
///
/// Built once per `connect` call and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteAddress {
    pub hostname: String,
    pub port: u16,
    pub secure: bool,
}

impl RemoteAddress {
    pub fn new(hostname: impl Into<String>, port: u16, secure: bool) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            secure,
        }
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// Arguments of one `send` call, as seen by send hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    pub command: String,
    /// Positional parameters; `None` marks an absent one.
    pub params: Vec<Option<String>>,
}

impl OutboundCommand {
    pub fn new<I, P>(command: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        Self {
            command: command.into(),
            params: params.into_iter().map(|p| p.into().0).collect(),
        }
    }

    /// The line this command frames to, terminator included.
    pub fn frame(&self) -> String {
        slirc_proto::frame_line(&self.command, &self.params)
    }
}

/// One positional parameter of an outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param(pub Option<String>);

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Self(Some(s.to_owned()))
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Self(Some(s))
    }
}

impl From<&String> for Param {
    fn from(s: &String) -> Self {
        Self(Some(s.clone()))
    }
}

impl<T: Into<String>> From<Option<T>> for Param {
    fn from(s: Option<T>) -> Self {
        Self(s.map(Into::into))
    }
}
