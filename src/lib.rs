//! # slirc-client
//!
//! Runtime core of an extensible IRC client. The core owns the network
//! session, turns the byte stream into [`RawMessage`]s and offers plugins
//! three primitives to build protocol features on:
//!
//! - an [`EventBus`] with ordered listeners, duplicate rejection,
//!   multi-events and a fail-fast `error` channel
//! - typed [`HookPoint`] chains around `connect`, `send` and `disconnect`,
//!   plus mutation interceptors on shared [`StateStore`] objects
//! - a dependency-ordered [`Plugin`] loader
//!
//! The core knows nothing about channels, nicknames or registration; those
//! are plugins.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slirc_client::{Client, Plugin, names};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let pong = Plugin::new("pong", |client, _config| {
//!     let responder = client.clone();
//!     client.events().on(names::RAW, move |payload| {
//!         let Some(msg) = payload.as_message() else { return };
//!         if msg.command == "PING" {
//!             let client = responder.clone();
//!             let token = msg.params.clone();
//!             tokio::spawn(async move { client.send("PONG", token).await });
//!         }
//!     })?;
//!     Ok(())
//! });
//!
//! let client = Client::builder().plugin(pong).build()?;
//! client.events().on(names::ERROR, |e| eprintln!("{e}"))?;
//! client.connect("irc.libera.chat").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod network;
pub mod plugin;
pub mod state;
pub mod telemetry;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{BuildError, BusError, ClientError, ErrorKind, PluginError};
pub use events::{EventBus, Listener, Once, Payload, Subscription, names};
pub use hooks::{HookPoint, Hooks};
pub use network::{
    Connection, ConnectionState, Connector, OutboundCommand, Param, RemoteAddress, TcpConnector,
};
pub use plugin::Plugin;
pub use slirc_proto::RawMessage;
pub use state::{Capabilities, StateStore};
