//! Integration tests for the event bus as plugins see it through a client.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::client_with;
use parking_lot::Mutex;
use slirc_client::{BusError, ClientConfig, EventBus, Listener, Payload, names};

fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
    let log = Arc::clone(log);
    Listener::new(move |payload: &Payload| log.lock().push(format!("{tag}:{payload}")))
}

#[test]
fn test_listeners_run_in_registration_order() {
    let bus = EventBus::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        bus.subscribe("tick", &recorder(&log, tag)).unwrap();
    }

    assert_eq!(bus.emit("tick", Payload::custom(1u8)).unwrap(), 3);
    assert_eq!(
        *log.lock(),
        ["first:(custom)", "second:(custom)", "third:(custom)"]
    );
}

#[test]
fn test_duplicate_subscription_is_rejected() {
    let bus = EventBus::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    let listener = recorder(&log, "only");

    bus.subscribe("tick", &listener).unwrap();
    let err = bus.subscribe("tick", &listener).unwrap_err();
    assert!(matches!(err, BusError::DuplicateListener(ref name) if name == "tick"));

    bus.emit("tick", Payload::None).unwrap();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_multi_event_fans_in_without_duplicates() {
    let bus = EventBus::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    bus.define_multi_event("membership", &["join", "part"]).unwrap();

    let both = recorder(&log, "both");
    bus.subscribe_all(&["membership", "part"], &both).unwrap();
    bus.subscribe("part", &recorder(&log, "part")).unwrap();

    assert_eq!(bus.count_listeners("part"), 2);
    assert_eq!(bus.emit("part", Payload::None).unwrap(), 2);
    assert_eq!(*log.lock(), ["both:(none)", "part:(none)"]);

    log.lock().clear();
    assert_eq!(bus.emit("join", Payload::None).unwrap(), 1);
    assert_eq!(*log.lock(), ["both:(none)"]);

    log.lock().clear();
    assert_eq!(bus.emit("quit", Payload::None).unwrap(), 0);
    assert!(log.lock().is_empty());
}

#[test]
fn test_multi_event_name_cannot_shadow_an_event() {
    let bus = EventBus::default();
    bus.on("join", |_| {}).unwrap();
    assert!(matches!(
        bus.define_multi_event("join", &["part"]),
        Err(BusError::EventExists(_))
    ));
}

#[test]
fn test_unhandled_error_fails_fast() {
    let bus = EventBus::default();
    let err = bus.emit(names::ERROR, Payload::custom(String::from("boom"))).unwrap_err();
    let BusError::Unhandled(payload) = err else {
        panic!("expected an unhandled error, got {err:?}");
    };
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom"));

    bus.on(names::ERROR, |_| {}).unwrap();
    assert_eq!(bus.emit(names::ERROR, Payload::None).unwrap(), 1);
}

#[test]
fn test_other_events_without_listeners_are_fine() {
    let bus = EventBus::default();
    assert_eq!(bus.emit("nobody-listens", Payload::None).unwrap(), 0);
}

#[test]
fn test_unsubscribe_from_inside_a_listener() {
    let bus = EventBus::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<slirc_client::Subscription>>> = Arc::new(Mutex::new(None));

    let counter = Arc::clone(&calls);
    let own = Arc::clone(&slot);
    let subscription = bus
        .on("tick", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = own.lock().take() {
                subscription.unsubscribe();
            }
        })
        .unwrap();
    *slot.lock() = Some(subscription);

    bus.emit("tick", Payload::None).unwrap();
    bus.emit("tick", Payload::None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(bus.count_listeners("tick"), 0);
}

#[test]
fn test_configured_listener_ceiling() {
    let config = ClientConfig::from_toml_str("[events]\nmax_listeners = 2\n").unwrap();
    let (client, _listener) = client_with(config);
    let bus = client.events();

    bus.on("tick", |_| {}).unwrap();
    bus.on("tick", |_| {}).unwrap();
    bus.on("tock", |_| {}).unwrap();
    let err = bus.on("tick", |_| {}).unwrap_err();
    assert!(matches!(err, BusError::TooManyListeners { ref event, max: 2 } if event == "tick"));
    assert_eq!(bus.max_listeners(), 2);
}

#[tokio::test]
async fn test_once_resolves_across_tasks() {
    let bus = EventBus::default();
    let once = bus.once("ready").unwrap();
    assert_eq!(bus.count_listeners("ready"), 1);

    let waiter = tokio::spawn(once);
    let emitter = bus.clone();
    tokio::spawn(async move {
        emitter.emit("ready", Payload::custom(42u32)).unwrap();
    });

    let payload = tokio::time::timeout(common::TIMEOUT, waiter)
        .await
        .expect("once resolved in time")
        .expect("task joined")
        .expect("payload delivered");
    assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
    assert_eq!(bus.count_listeners("ready"), 0);
}

#[tokio::test]
async fn test_dropped_once_unsubscribes() {
    let bus = EventBus::default();
    let once = bus.once("ready").unwrap();
    drop(once);
    assert_eq!(bus.count_listeners("ready"), 0);
    assert_eq!(bus.emit("ready", Payload::None).unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_emitters_reach_every_listener() {
    let bus = EventBus::default();
    let hits = Arc::new(AtomicUsize::new(0));
    for _ in 0..4 {
        let hits = Arc::clone(&hits);
        bus.on("tick", move |_| {
            hits.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    bus.emit("tick", Payload::None).unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(hits.load(Ordering::Relaxed), 8 * 100 * 4);
}
