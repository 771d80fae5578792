//! Event bus.
//!
//! A publish/subscribe registry with stricter guarantees than a plain
//! emitter:
//!
//! - listeners run in registration order, synchronously, on the emitting task
//! - the same listener cannot be registered twice on one name
//! - multi-events fan several source events into one subscription, and a
//!   listener reached through overlapping bindings still runs once per emission
//! - each name has a listener ceiling
//! - emitting on [`names::ERROR`] with nobody listening fails instead of
//!   dropping the error
//!
//! Emission works on a snapshot taken when `emit` starts, and the bus lock is
//! released before any listener runs, so listeners may subscribe, unsubscribe
//! or emit re-entrantly without affecting the pass in progress.

mod listener;
mod payload;
mod registry;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

pub use listener::{Listener, Once, Subscription};
pub use payload::{Payload, names};
use registry::Registry;

use crate::config::defaults::default_max_listeners;
use crate::error::BusError;

/// Shared handle to one client's listener registry.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new(max_listeners: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(max_listeners))),
        }
    }

    /// Register `listener` on one event.
    pub fn subscribe(&self, name: &str, listener: &Listener) -> Result<Subscription, BusError> {
        self.subscribe_all(&[name], listener)
    }

    /// Register one listener on several events at once.
    ///
    /// Either every name accepts the listener or none does. The returned
    /// subscription cancels all of them.
    pub fn subscribe_all<S: AsRef<str>>(
        &self,
        names: &[S],
        listener: &Listener,
    ) -> Result<Subscription, BusError> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_owned()).collect();
        self.registry.lock().insert(&names, listener, false)?;
        Ok(Subscription::new(
            Arc::downgrade(&self.registry),
            names,
            listener.id(),
        ))
    }

    /// Register a closure as a new listener.
    pub fn on<F>(&self, name: &str, callback: F) -> Result<Subscription, BusError>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        self.subscribe(name, &Listener::new(callback))
    }

    /// Wait for the next emission of `name`.
    pub fn once(&self, name: &str) -> Result<Once, BusError> {
        let (listener, rx) = Once::channel();
        let subscription = self.register_once(name, &listener)?;
        Ok(Once::new(rx, subscription))
    }

    /// Run `listener` on the next emission of `name` only.
    pub fn once_with(&self, name: &str, listener: &Listener) -> Result<Subscription, BusError> {
        self.register_once(name, listener)
    }

    fn register_once(&self, name: &str, listener: &Listener) -> Result<Subscription, BusError> {
        let names = vec![name.to_owned()];
        self.registry.lock().insert(&names, listener, true)?;
        Ok(Subscription::new(
            Arc::downgrade(&self.registry),
            names,
            listener.id(),
        ))
    }

    /// Remove `listener` from `name`. Returns whether it was registered.
    pub fn unsubscribe(&self, name: &str, listener: &Listener) -> bool {
        self.registry.lock().remove(name, listener.id())
    }

    /// Invoke every listener reached by `name`.
    ///
    /// Returns how many listeners ran. An emission on [`names::ERROR`] that
    /// reaches nobody returns [`BusError::Unhandled`] carrying the payload.
    pub fn emit(&self, name: &str, payload: Payload) -> Result<usize, BusError> {
        let listeners = self.registry.lock().snapshot(name);

        if listeners.is_empty() && name == names::ERROR {
            return Err(BusError::Unhandled(payload));
        }

        trace!(event = name, listeners = listeners.len(), "emit");
        for listener in &listeners {
            listener.call(&payload);
        }
        Ok(listeners.len())
    }

    /// Number of distinct listeners an emission of `name` would reach.
    pub fn count_listeners(&self, name: &str) -> usize {
        self.registry.lock().count(name)
    }

    /// Whether `listener` is registered directly on `name`.
    pub fn is_subscribed(&self, name: &str, listener: &Listener) -> bool {
        self.registry.lock().contains(name, listener.id())
    }

    /// Declare `name` as a virtual event fed by `sources`.
    pub fn define_multi_event<S: AsRef<str>>(&self, name: &str, sources: &[S]) -> Result<(), BusError> {
        let sources = sources.iter().map(|s| s.as_ref().to_owned()).collect();
        self.registry.lock().define_multi(name, sources)
    }

    pub fn is_multi_event(&self, name: &str) -> bool {
        self.registry.lock().is_multi(name)
    }

    /// Event names currently known to the bus, sorted.
    pub fn event_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    pub fn max_listeners(&self) -> usize {
        self.registry.lock().max_listeners()
    }

    /// Change the per-name ceiling. Existing registrations are kept.
    pub fn set_max_listeners(&self, max: usize) {
        self.registry.lock().set_max_listeners(max);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(default_max_listeners())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .finish()
    }
}
