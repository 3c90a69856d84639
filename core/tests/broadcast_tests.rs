// tests/broadcast_tests.rs
mod common; // Reference the common module

use aquashop::CartBus;
use common::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_publish_reaches_every_subscriber_once() {
  setup_tracing();
  let bus = CartBus::new();
  let hits = Arc::new([AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)]);

  let subs: Vec<_> = (0..3)
    .map(|i| {
      let hits = Arc::clone(&hits);
      bus.subscribe(move || {
        hits[i].fetch_add(1, Ordering::SeqCst);
      })
    })
    .collect();

  bus.publish();

  for counter in hits.iter() {
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }
  drop(subs);
}

#[test]
fn test_subscribers_run_in_registration_order() {
  let bus = CartBus::new();
  let order = Arc::new(Mutex::new(Vec::new()));

  let subs: Vec<_> = ["first", "second", "third"]
    .iter()
    .map(|name| {
      let order = Arc::clone(&order);
      bus.subscribe(move || order.lock().push(*name))
    })
    .collect();

  bus.publish();

  assert_eq!(*order.lock(), vec!["first", "second", "third"]);
  drop(subs);
}

#[test]
fn test_panicking_subscriber_does_not_block_the_rest() {
  setup_tracing();
  let bus = CartBus::new();
  let first = Arc::new(AtomicUsize::new(0));
  let third = Arc::new(AtomicUsize::new(0));

  let first_clone = Arc::clone(&first);
  let _s1 = bus.subscribe(move || {
    first_clone.fetch_add(1, Ordering::SeqCst);
  });
  let _s2 = bus.subscribe(|| panic!("subscriber blew up"));
  let third_clone = Arc::clone(&third);
  let _s3 = bus.subscribe(move || {
    third_clone.fetch_add(1, Ordering::SeqCst);
  });

  bus.publish();

  assert_eq!(first.load(Ordering::SeqCst), 1);
  assert_eq!(third.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_subscription_detaches_handler() {
  let bus = CartBus::new();
  let hits = Arc::new(AtomicUsize::new(0));

  let hits_clone = Arc::clone(&hits);
  let sub = bus.subscribe(move || {
    hits_clone.fetch_add(1, Ordering::SeqCst);
  });
  assert_eq!(bus.subscriber_count(), 1);

  bus.publish();
  sub.unsubscribe();
  assert_eq!(bus.subscriber_count(), 0);
  bus.publish();

  assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reentrant_publish_from_handler_terminates() {
  let bus = CartBus::new();
  let hits = Arc::new(AtomicUsize::new(0));
  let republished = Arc::new(AtomicBool::new(false));

  let bus_clone = bus.clone();
  let hits_clone = Arc::clone(&hits);
  let republished_clone = Arc::clone(&republished);
  let _sub = bus.subscribe(move || {
    hits_clone.fetch_add(1, Ordering::SeqCst);
    // One nested publish, as a mutation performed from inside a handler
    // would trigger.
    if !republished_clone.swap(true, Ordering::SeqCst) {
      bus_clone.publish();
    }
  });

  bus.publish();

  assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_handler_subscribing_during_publish_joins_next_round() {
  let bus = CartBus::new();
  let late_hits = Arc::new(AtomicUsize::new(0));
  let late_sub = Arc::new(Mutex::new(None));

  let bus_clone = bus.clone();
  let late_hits_clone = Arc::clone(&late_hits);
  let late_sub_clone = Arc::clone(&late_sub);
  let _sub = bus.subscribe(move || {
    let mut slot = late_sub_clone.lock();
    if slot.is_none() {
      let late_hits = Arc::clone(&late_hits_clone);
      *slot = Some(bus_clone.subscribe(move || {
        late_hits.fetch_add(1, Ordering::SeqCst);
      }));
    }
  });

  bus.publish();
  assert_eq!(late_hits.load(Ordering::SeqCst), 0); // snapshot excluded it

  bus.publish();
  assert_eq!(late_hits.load(Ordering::SeqCst), 1);
}
