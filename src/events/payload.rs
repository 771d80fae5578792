//! Values carried by emitted events.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use slirc_proto::RawMessage;

use crate::error::ClientError;
use crate::network::RemoteAddress;

/// Event names emitted by the core.
pub mod names {
    /// One decoded inbound line, payload [`Payload::Message`](super::Payload::Message).
    pub const RAW: &str = "raw";
    /// A connect attempt started, payload [`Payload::Address`](super::Payload::Address).
    pub const CONNECTING: &str = "connecting";
    /// A session is open, payload [`Payload::Address`](super::Payload::Address).
    pub const CONNECTED: &str = "connected";
    /// A session closed, payload is the last address.
    pub const DISCONNECTED: &str = "disconnected";
    /// The fail-fast error channel, payload [`Payload::Error`](super::Payload::Error).
    pub const ERROR: &str = "error";
}

/// Value passed to listeners.
#[derive(Clone, Default)]
pub enum Payload {
    #[default]
    None,
    Message(RawMessage),
    Address(RemoteAddress),
    Error(Arc<ClientError>),
    /// Plugin-defined value, recovered with [`Payload::downcast_ref`].
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Payload {
    /// Wrap a plugin-defined value.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    pub fn as_message(&self) -> Option<&RawMessage> {
        match self {
            Self::Message(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&RemoteAddress> {
        match self {
            Self::Address(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ClientError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Borrow a custom payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<RawMessage> for Payload {
    fn from(msg: RawMessage) -> Self {
        Self::Message(msg)
    }
}

impl From<RemoteAddress> for Payload {
    fn from(addr: RemoteAddress) -> Self {
        Self::Address(addr)
    }
}

impl From<ClientError> for Payload {
    fn from(err: ClientError) -> Self {
        Self::Error(Arc::new(err))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            Self::Address(addr) => f.debug_tuple("Address").field(addr).finish(),
            Self::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("(none)"),
            Self::Message(msg) => fmt::Display::fmt(msg, f),
            Self::Address(addr) => fmt::Display::fmt(addr, f),
            Self::Error(err) => fmt::Display::fmt(err, f),
            Self::Custom(_) => f.write_str("(custom)"),
        }
    }
}
