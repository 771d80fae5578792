//! The client facade plugins are written against.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{BuildError, BusError, ClientError, PluginError};
use crate::events::{EventBus, Payload, names};
use crate::hooks::Hooks;
use crate::network::{
    Connection, ConnectionState, Connector, OutboundCommand, Param, RemoteAddress, TcpConnector,
    is_benign,
};
use crate::plugin::{self, Plugin};
use crate::state::{Capabilities, StateStore};

/// Handle to one client instance. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    events: EventBus,
    hooks: Hooks,
    state: StateStore,
    utils: Capabilities,
    connection: Connection,
    loaded: Mutex<HashSet<String>>,
    /// Plugins whose init is running; guards against re-entrant loads.
    initializing: Mutex<HashSet<String>>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn hooks(&self) -> &Hooks {
        &self.inner.hooks
    }

    /// Shared state container.
    pub fn state(&self) -> &StateStore {
        &self.inner.state
    }

    /// Capability registry for cross-plugin helpers.
    pub fn utils(&self) -> &Capabilities {
        &self.inner.utils
    }

    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.connection.state()
    }

    pub fn remote_address(&self) -> Option<RemoteAddress> {
        self.inner.connection.remote_address()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connection.is_connected()
    }

    /// Connect to `hostname` on the configured default port, in plaintext.
    pub async fn connect(&self, hostname: &str) -> Result<Option<RemoteAddress>, BusError> {
        self.connect_with(hostname, None, false).await
    }

    pub async fn connect_with(
        &self,
        hostname: &str,
        port: Option<u16>,
        secure: bool,
    ) -> Result<Option<RemoteAddress>, BusError> {
        let port = port.unwrap_or(self.inner.config.connection.default_port);
        self.connect_to(RemoteAddress::new(hostname, port, secure)).await
    }

    /// Open a session to `address`, replacing any open one.
    ///
    /// Failures are reported on the `error` event and yield `Ok(None)`; an
    /// `Err` means such a report found no listener.
    pub async fn connect_to(
        &self,
        address: RemoteAddress,
    ) -> Result<Option<RemoteAddress>, BusError> {
        self.inner
            .hooks
            .connect
            .call(address, |address| self.inner.connection.open(self, address))
            .await
    }

    /// Frame and write one command.
    ///
    /// Returns the exact line written, terminator included.
    pub async fn send<I, P>(&self, command: &str, params: I) -> Result<Option<String>, BusError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        self.send_command(OutboundCommand::new(command, params)).await
    }

    pub async fn send_command(&self, command: OutboundCommand) -> Result<Option<String>, BusError> {
        self.inner
            .hooks
            .send
            .call(command, |command| async move {
                self.inner.connection.send(self, &command).await
            })
            .await
    }

    /// Close the session. A no-op when none is open.
    pub async fn disconnect(&self) -> Result<(), BusError> {
        self.inner
            .hooks
            .disconnect
            .call((), |()| self.inner.connection.close(self))
            .await
    }

    /// Deliver a failure on the `error` event.
    ///
    /// Benign I/O conditions (stream already closed, interrupted call) are
    /// dropped here. With no `error` listener the emission fails and the
    /// error comes back as [`BusError::Unhandled`].
    pub fn report(&self, error: ClientError) -> Result<(), BusError> {
        if is_benign(&error) {
            debug!(kind = %error.kind(), error = %error, "benign error swallowed");
            return Ok(());
        }

        warn!(kind = %error.kind(), code = error.error_code(), error = %error, "client error");
        self.inner
            .events
            .emit(names::ERROR, Payload::from(error))
            .map(|_| ())
    }

    /// Initialize more plugins. Names already loaded are skipped and satisfy
    /// dependencies.
    pub fn load_plugins(&self, plugins: &[Plugin]) -> Result<Vec<String>, PluginError> {
        plugin::load(self, plugins)
    }

    pub fn is_plugin_loaded(&self, name: &str) -> bool {
        self.inner.loaded.lock().contains(name)
    }

    /// Names of loaded plugins, sorted.
    pub fn plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.loaded.lock().iter().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn loaded_plugins(&self) -> &Mutex<HashSet<String>> {
        &self.inner.loaded
    }

    pub(crate) fn initializing_plugins(&self) -> &Mutex<HashSet<String>> {
        &self.inner.initializing
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.inner.connection)
            .field("events", &self.inner.events)
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

/// Assembles a [`Client`] and runs its plugins.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    connector: Option<Arc<dyn Connector>>,
    plugins: Vec<Plugin>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default [`TcpConnector`].
    pub fn connector<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    pub fn shared_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins<I: IntoIterator<Item = Plugin>>(mut self, plugins: I) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Validate the config, assemble the client and initialize every plugin
    /// in dependency order.
    pub fn build(self) -> Result<Client, BuildError> {
        self.config.validate().map_err(BuildError::Config)?;

        let connector = match self.connector {
            Some(connector) => connector,
            None => Arc::new(TcpConnector::with_timeout(
                self.config.connection.connect_timeout(),
            )),
        };
        let connection = Connection::new(connector, &self.config.connection)?;

        let client = Client {
            inner: Arc::new(ClientInner {
                events: EventBus::new(self.config.events.max_listeners),
                hooks: Hooks::new(),
                state: StateStore::new(),
                utils: Capabilities::new(),
                connection,
                loaded: Mutex::new(HashSet::new()),
                initializing: Mutex::new(HashSet::new()),
                config: self.config,
            }),
        };

        plugin::load(&client, &self.plugins)?;
        Ok(client)
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_connector", &self.connector.is_some())
            .field("plugins", &self.plugins)
            .finish()
    }
}
