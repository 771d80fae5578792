//! Connection - owns the transport session for one client.
//!
//! ```text
//!            connect()                 stream open
//!   Idle ───────────────▶ Connecting ──────────────▶ Connected
//!    ▲                        │                          │
//!    │        connect failed  │          close() / EOF / │
//!    ├────────────────────────┘          read failure    │
//!    │                                                   ▼
//!    └─────────────────────────────────────────────── Closing
//! ```
//!
//! The read half of the stream lives in a background task (see
//! [`event_loop`]); the write half stays here behind an async mutex so sends
//! from one task reach the wire in call order. Every session gets a
//! generation number, and anything acting on behalf of an old session (a
//! read loop hitting EOF late, a connect attempt that was superseded) checks
//! it before touching state.
//!
//! Transport failures are never returned from these methods. They are
//! reported through the client's `error` event; only the bus's fail-fast
//! rule can turn them into a returned [`BusError`].

mod error_handling;
mod event_loop;

pub(crate) use error_handling::is_benign;

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use slirc_proto::LineDecoder;
use tokio::io::{AsyncWriteExt, WriteHalf};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{BoxedStream, Connector, OutboundCommand, RemoteAddress};
use crate::Client;
use crate::config::ConnectionConfig;
use crate::error::{BusError, ClientError, ErrorKind, NotConnected};
use crate::events::{Payload, names};
use crate::state::CONNECTION;

/// Lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Closing,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closing => "closing",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct SessionMeta {
    state: ConnectionState,
    address: Option<RemoteAddress>,
    generation: u64,
    shutdown: Option<CancellationToken>,
}

struct Writer {
    half: WriteHalf<BoxedStream>,
    generation: u64,
}

/// The connection state machine.
pub struct Connection {
    connector: Arc<dyn Connector>,
    /// Encoder for outbound lines and template for per-session decoders.
    codec: LineDecoder,
    read_buffer_size: usize,
    meta: Mutex<SessionMeta>,
    writer: tokio::sync::Mutex<Option<Writer>>,
    /// Signalled each time a close finishes and the state is back to `Idle`.
    closed: Notify,
}

impl Connection {
    pub(crate) fn new(
        connector: Arc<dyn Connector>,
        config: &ConnectionConfig,
    ) -> Result<Self, slirc_proto::ProtocolError> {
        Ok(Self {
            connector,
            codec: LineDecoder::new(&config.encoding)?,
            read_buffer_size: config.read_buffer_size,
            meta: Mutex::new(SessionMeta {
                state: ConnectionState::Idle,
                address: None,
                generation: 0,
                shutdown: None,
            }),
            writer: tokio::sync::Mutex::new(None),
            closed: Notify::new(),
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.meta.lock().state
    }

    /// Target of the open (or opening) session.
    pub fn remote_address(&self) -> Option<RemoteAddress> {
        self.meta.lock().address.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Canonical name of the wire encoding.
    pub fn encoding(&self) -> &'static str {
        self.codec.encoding_name()
    }

    /// Open a session to `address`, closing any current one first.
    ///
    /// Returns the address on success and `None` when the attempt failed or
    /// was superseded by another `connect`/`close`.
    pub(crate) async fn open(
        &self,
        client: &Client,
        address: RemoteAddress,
    ) -> Result<Option<RemoteAddress>, BusError> {
        self.close(client).await?;

        let generation = {
            let mut meta = self.meta.lock();
            meta.generation += 1;
            meta.state = ConnectionState::Connecting;
            meta.address = Some(address.clone());
            meta.generation
        };
        record_status(client, ConnectionState::Connecting, Some(&address));
        info!(address = %address, secure = address.secure, "connecting");
        client
            .events()
            .emit(names::CONNECTING, Payload::Address(address.clone()))?;

        let stream = match self.connector.connect(&address).await {
            Ok(stream) => stream,
            Err(e) => {
                self.abandon(client, generation);
                client.report(ClientError::new(ErrorKind::Connect, e))?;
                return Ok(None);
            }
        };

        let (reader, writer) = tokio::io::split(stream);
        let shutdown = CancellationToken::new();
        {
            let mut slot = self.writer.lock().await;
            let mut meta = self.meta.lock();
            if meta.generation != generation || meta.state != ConnectionState::Connecting {
                debug!(address = %address, "connect superseded");
                return Ok(None);
            }
            *slot = Some(Writer {
                half: writer,
                generation,
            });
            meta.state = ConnectionState::Connected;
            meta.shutdown = Some(shutdown.clone());
        }

        record_status(client, ConnectionState::Connected, Some(&address));
        info!(address = %address, "connected");
        client
            .events()
            .emit(names::CONNECTED, Payload::Address(address.clone()))?;

        let session = event_loop::Session {
            generation,
            address: address.clone(),
            shutdown,
            decoder: self.codec.fresh(),
            buffer_size: self.read_buffer_size,
        };
        tokio::spawn(event_loop::run(client.clone(), reader, session));

        Ok(Some(address))
    }

    /// Drop a failed connect attempt if it is still the current one.
    fn abandon(&self, client: &Client, generation: u64) {
        {
            let mut meta = self.meta.lock();
            if meta.generation != generation || meta.state != ConnectionState::Connecting {
                return;
            }
            meta.state = ConnectionState::Idle;
            meta.address = None;
        }
        record_status(client, ConnectionState::Idle, None);
    }

    /// Close the current session. A no-op when none is open.
    ///
    /// A connect still in flight is cancelled: its stream is dropped when it
    /// arrives and no `connected` event fires. A close already under way is
    /// waited for, so on return the state is `Idle` and `disconnected` has
    /// been emitted.
    pub(crate) async fn close(&self, client: &Client) -> Result<(), BusError> {
        loop {
            let closed = self.closed.notified();
            if self.state() != ConnectionState::Closing {
                break;
            }
            closed.await;
        }

        let generation = {
            let mut meta = self.meta.lock();
            match meta.state {
                ConnectionState::Idle | ConnectionState::Closing => return Ok(()),
                ConnectionState::Connected => Some(meta.generation),
                ConnectionState::Connecting => {
                    meta.generation += 1;
                    meta.state = ConnectionState::Idle;
                    meta.address = None;
                    None
                }
            }
        };

        match generation {
            Some(generation) => self.close_generation(client, generation).await,
            None => {
                debug!("pending connect cancelled");
                record_status(client, ConnectionState::Idle, None);
                Ok(())
            }
        }
    }

    /// Close the session `generation` if it is still the open one.
    pub(crate) async fn close_generation(
        &self,
        client: &Client,
        generation: u64,
    ) -> Result<(), BusError> {
        let (shutdown, address) = {
            let mut meta = self.meta.lock();
            if meta.generation != generation || meta.state != ConnectionState::Connected {
                return Ok(());
            }
            meta.state = ConnectionState::Closing;
            (meta.shutdown.take(), meta.address.clone())
        };
        record_status(client, ConnectionState::Closing, address.as_ref());

        if let Some(token) = shutdown {
            token.cancel();
        }

        let writer = {
            let mut slot = self.writer.lock().await;
            match slot.as_ref() {
                Some(w) if w.generation == generation => slot.take(),
                _ => None,
            }
        };
        let shutdown_result = match writer {
            Some(mut writer) => writer.half.shutdown().await,
            None => Ok(()),
        };

        match &address {
            Some(address) => info!(address = %address, "disconnected"),
            None => info!("disconnected"),
        }

        let reported = match shutdown_result {
            Ok(()) => Ok(()),
            Err(e) => client.report(ClientError::new(ErrorKind::Close, e)),
        };
        let payload = address.map_or(Payload::None, Payload::Address);
        let emitted = client.events().emit(names::DISCONNECTED, payload);

        // Leave `Closing` only now: a concurrent `open` waits for this, so
        // the next session's events follow `disconnected`.
        let current = {
            let mut meta = self.meta.lock();
            let current = meta.generation == generation && meta.state == ConnectionState::Closing;
            if current {
                meta.state = ConnectionState::Idle;
                meta.address = None;
            }
            current
        };
        if current {
            record_status(client, ConnectionState::Idle, None);
        } else {
            debug!(generation, "stale close left newer session untouched");
        }
        self.closed.notify_waiters();

        emitted?;
        reported
    }

    /// Frame and write one line.
    ///
    /// Returns the exact line written, or `None` when there was no session or
    /// the write failed (both reported as write errors).
    pub(crate) async fn send(
        &self,
        client: &Client,
        command: &OutboundCommand,
    ) -> Result<Option<String>, BusError> {
        let line = command.frame();
        let bytes = self.codec.encode(&line);

        let written = match self.writer.lock().await.as_mut() {
            Some(writer) => Some(write_line(&mut writer.half, &bytes).await),
            None => None,
        };

        match written {
            Some(Ok(())) => {
                debug!(line = %line.trim_end(), "sent");
                Ok(Some(line))
            }
            Some(Err(e)) => {
                client.report(ClientError::new(ErrorKind::Write, e))?;
                Ok(None)
            }
            None => {
                client.report(ClientError::new(ErrorKind::Write, NotConnected))?;
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meta = self.meta.lock();
        f.debug_struct("Connection")
            .field("state", &meta.state)
            .field("address", &meta.address)
            .field("generation", &meta.generation)
            .field("encoding", &self.codec.encoding_name())
            .finish()
    }
}

async fn write_line(half: &mut WriteHalf<BoxedStream>, bytes: &[u8]) -> io::Result<()> {
    half.write_all(bytes).await?;
    half.flush().await
}

/// Mirror the session status into shared state so mutation hooks see it.
fn record_status(client: &Client, state: ConnectionState, address: Option<&RemoteAddress>) {
    let store = client.state();
    store.set(CONNECTION, "status", state.as_str());
    let address = address.map_or(Value::Null, |a| {
        json!({ "hostname": a.hostname, "port": a.port, "secure": a.secure })
    });
    store.set(CONNECTION, "address", address);
}
