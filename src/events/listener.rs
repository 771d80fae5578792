//! Listener handles, subscriptions and one-shot futures.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll, ready};

use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::Payload;
use super::registry::Registry;
use crate::error::BusError;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

type Callback = dyn Fn(&Payload) + Send + Sync;

/// A callable registered on the bus.
///
/// Identity is fixed at construction: clones of one `Listener` are the same
/// listener as far as duplicate detection and removal are concerned, while
/// two listeners built from the same closure are distinct.
#[derive(Clone)]
pub struct Listener {
    id: u64,
    callback: Arc<Callback>,
}

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        Self {
            id: NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed),
            callback: Arc::new(callback),
        }
    }

    /// Opaque identity shared by all clones.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn call(&self, payload: &Payload) {
        (self.callback)(payload)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish()
    }
}

/// Handle returned by a subscription; cancels every registration it made.
///
/// Dropping the handle leaves the listener registered.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    events: Vec<String>,
    listener_id: u64,
}

impl Subscription {
    pub(crate) fn new(registry: Weak<Mutex<Registry>>, events: Vec<String>, listener_id: u64) -> Self {
        Self {
            registry,
            events,
            listener_id,
        }
    }

    /// Event names this subscription covers.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn listener_id(&self) -> u64 {
        self.listener_id
    }

    /// Remove the listener from every covered event.
    ///
    /// Returns how many registrations were still present.
    pub fn unsubscribe(self) -> usize {
        self.remove()
    }

    fn remove(&self) -> usize {
        let Some(registry) = self.registry.upgrade() else {
            return 0;
        };
        let mut registry = registry.lock();
        self.events
            .iter()
            .filter(|name| registry.remove(name, self.listener_id))
            .count()
    }
}

/// Future returned by [`EventBus::once`](super::EventBus::once).
///
/// Resolves with the first matching payload. The registration is removed
/// when it fires, and also when the future is dropped unresolved.
#[derive(Debug)]
pub struct Once {
    rx: oneshot::Receiver<Payload>,
    subscription: Option<Subscription>,
}

impl Once {
    pub(crate) fn channel() -> (Listener, oneshot::Receiver<Payload>) {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let listener = Listener::new(move |payload| {
            if let Some(tx) = tx.lock().take() {
                // Receiver gone means the caller stopped waiting.
                let _ = tx.send(payload.clone());
            }
        });
        (listener, rx)
    }

    pub(crate) fn new(rx: oneshot::Receiver<Payload>, subscription: Subscription) -> Self {
        Self {
            rx,
            subscription: Some(subscription),
        }
    }
}

impl Future for Once {
    type Output = Result<Payload, BusError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = ready!(self.rx.poll_unpin(cx));
        self.subscription = None;
        Poll::Ready(result.map_err(|_| BusError::Closed))
    }
}

impl Drop for Once {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.remove();
        }
    }
}
