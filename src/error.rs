//! Unified error handling for slirc-client.
//!
//! Transport failures and plugin-domain failures share one shape,
//! [`ClientError`], and travel through the `error` event. The remaining
//! enums cover the bus itself, plugin loading and client construction.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::config::ValidationError;
use crate::events::Payload;

/// Boxed cause carried by a [`ClientError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// Client Errors (error channel payload)
// ============================================================================

/// Tag describing where a failure came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Opening the transport stream failed.
    Connect,
    /// Reading from the transport failed.
    Read,
    /// Writing to the transport failed, or no session was open.
    Write,
    /// Shutting the transport down failed.
    Close,
    /// A plugin-raised domain error, tagged by the plugin.
    Plugin(String),
}

impl ErrorKind {
    /// Short tag used in logs.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect => "connect",
            Self::Read => "read",
            Self::Write => "write",
            Self::Close => "close",
            Self::Plugin(tag) => tag,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged failure delivered through the `error` event.
#[derive(Debug, Error)]
#[error("{kind} error: {source}")]
pub struct ClientError {
    kind: ErrorKind,
    #[source]
    source: BoxError,
}

impl ClientError {
    /// Wrap a cause with a kind tag.
    pub fn new(kind: ErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// Build a plugin-domain error under the given tag.
    pub fn plugin(tag: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Plugin(tag.into()), source)
    }

    /// Where the failure came from.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The underlying cause.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// The underlying cause as an I/O error, if it is one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        self.source.downcast_ref::<std::io::Error>()
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Connect => "connect_error",
            ErrorKind::Read => "read_error",
            ErrorKind::Write => "write_error",
            ErrorKind::Close => "close_error",
            ErrorKind::Plugin(_) => "plugin_error",
        }
    }
}

/// `send` was called with no open session.
#[derive(Debug, Clone, Copy, Error)]
#[error("no open session")]
pub struct NotConnected;

// ============================================================================
// Bus Errors
// ============================================================================

/// Event bus failures.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("listener already registered for event '{0}'")]
    DuplicateListener(String),

    #[error("event '{event}' already has the maximum of {max} listeners")]
    TooManyListeners { event: String, max: usize },

    #[error("event '{0}' already exists")]
    EventExists(String),

    /// An `error` emission with nobody listening; carries the emitted value.
    #[error("unhandled error event: {0}")]
    Unhandled(Payload),

    /// The bus went away before a one-shot subscription fired.
    #[error("event bus closed")]
    Closed,
}

impl BusError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateListener(_) => "duplicate_listener",
            Self::TooManyListeners { .. } => "too_many_listeners",
            Self::EventExists(_) => "event_exists",
            Self::Unhandled(_) => "unhandled_error",
            Self::Closed => "bus_closed",
        }
    }

    /// The emitted client error, when this is an unhandled `error` emission.
    pub fn unhandled_error(&self) -> Option<&ClientError> {
        match self {
            Self::Unhandled(payload) => payload.as_error(),
            _ => None,
        }
    }
}

// ============================================================================
// Plugin Errors
// ============================================================================

/// Plugin loading failures.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' depends on unknown plugin '{dependency}'")]
    MissingDependency { plugin: String, dependency: String },

    #[error("dependency cycle through plugin '{0}'")]
    DependencyCycle(String),

    #[error("plugin '{plugin}' failed to initialize: {cause:#}")]
    Init { plugin: String, cause: anyhow::Error },
}

impl PluginError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDependency { .. } => "missing_dependency",
            Self::DependencyCycle(_) => "dependency_cycle",
            Self::Init { .. } => "plugin_init",
        }
    }
}

// ============================================================================
// Build Errors
// ============================================================================

/// Failures while assembling a [`Client`](crate::Client).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error(transparent)]
    Protocol(#[from] slirc_proto::ProtocolError),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_client_error_display_and_kind() {
        let err = ClientError::new(
            ErrorKind::Connect,
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert_eq!(err.kind(), &ErrorKind::Connect);
        assert_eq!(err.to_string(), "connect error: refused");
        assert_eq!(err.error_code(), "connect_error");
        assert_eq!(
            err.io_error().map(io::Error::kind),
            Some(io::ErrorKind::ConnectionRefused)
        );
    }

    #[test]
    fn test_plugin_error_kind_uses_tag() {
        let err = ClientError::plugin("nickserv", "bad password");
        assert_eq!(err.kind().as_str(), "nickserv");
        assert_eq!(err.error_code(), "plugin_error");
        assert!(err.io_error().is_none());
    }

    #[test]
    fn test_bus_error_codes() {
        assert_eq!(
            BusError::DuplicateListener("raw".into()).error_code(),
            "duplicate_listener"
        );
        assert_eq!(BusError::Closed.error_code(), "bus_closed");
        assert!(BusError::Closed.unhandled_error().is_none());
    }

    #[test]
    fn test_plugin_init_display_keeps_context() {
        let err = PluginError::Init {
            plugin: "ctcp".into(),
            cause: anyhow::anyhow!("inner").context("outer"),
        };
        assert_eq!(err.to_string(), "plugin 'ctcp' failed to initialize: outer: inner");
    }
}
