//! Integration test common infrastructure.
//!
//! Provides an in-memory [`Connector`] whose peer ends are handed to the
//! test as [`MockServer`]s, plus helpers for recording and awaiting events.

pub mod mock;

#[allow(unused_imports)]
pub use mock::{MockConnector, MockListener, MockServer};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slirc_client::{Client, ClientConfig, Payload};

/// Default wait used by the helpers below.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Install the tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = slirc_client::telemetry::init_tracing();
}

/// A client wired to a fresh mock connector.
#[allow(dead_code)]
pub fn client_with(config: ClientConfig) -> (Client, MockListener) {
    init_tracing();
    let (connector, listener) = mock::pair();
    let client = Client::builder()
        .config(config)
        .connector(connector)
        .build()
        .expect("client builds");
    (client, listener)
}

#[allow(dead_code)]
pub fn client() -> (Client, MockListener) {
    client_with(ClientConfig::default())
}

/// Ordered log of `name payload` strings.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Record every emission of `events` into one shared log.
#[allow(dead_code)]
pub fn record(client: &Client, events: &[&str]) -> EventLog {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    for &event in events {
        let log = Arc::clone(&log);
        let name = event.to_owned();
        client
            .events()
            .on(event, move |payload: &Payload| {
                log.lock().push(format!("{name} {payload}"));
            })
            .expect("subscribe");
    }
    log
}

/// Wait until `condition` holds, polling every few milliseconds.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

/// Wait until the log holds at least `len` entries and return a copy.
#[allow(dead_code)]
pub async fn wait_for_len(log: &EventLog, len: usize) -> Vec<String> {
    eventually(|| log.lock().len() >= len).await;
    log.lock().clone()
}
