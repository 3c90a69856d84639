// aquashop/src/cart/broadcast.rs

//! In-tab cart synchronization bus.
//!
//! Any component may `publish()` after a mutating cart operation; every
//! mounted component subscribes to learn that its projection is stale. The
//! bus replaces a DOM custom event: delivery is synchronous and in-process,
//! scoped to this client instance, never persisted.
//!
//! Delivery runs over a snapshot of the subscriber list, so a handler may
//! subscribe, unsubscribe, or publish again from inside its own invocation
//! without corrupting the list. A panicking handler is logged and isolated;
//! the remaining handlers still run.

use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::error;

type Handler = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct BusInner {
  subscribers: Mutex<Vec<(u64, Handler)>>,
  next_id: AtomicU64,
}

/// Cheaply cloneable handle to one bus. All clones share the subscriber list.
#[derive(Clone, Default)]
pub struct CartBus {
  inner: Arc<BusInner>,
}

impl CartBus {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a zero-argument handler, returning its [`Subscription`]. The
  /// subscription detaches on drop; hold it for as long as the subscribing
  /// component is mounted and no longer.
  pub fn subscribe(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
    let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
    self.inner.subscribers.lock().push((id, Arc::new(handler)));
    Subscription {
      bus: Arc::downgrade(&self.inner),
      id,
    }
  }

  /// Invokes all currently-subscribed handlers synchronously, in registration
  /// order. Handlers registered during delivery are not invoked until the
  /// next publish.
  pub fn publish(&self) {
    let snapshot: Vec<Handler> = {
      let subscribers = self.inner.subscribers.lock();
      subscribers.iter().map(|(_, h)| Arc::clone(h)).collect()
    };
    for handler in snapshot {
      if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
        error!("cart bus subscriber panicked; continuing with remaining subscribers");
      }
    }
  }

  pub fn subscriber_count(&self) -> usize {
    self.inner.subscribers.lock().len()
  }
}

/// RAII registration on a [`CartBus`]. Dropping it unsubscribes, which keeps
/// handlers from firing against torn-down component state.
pub struct Subscription {
  bus: Weak<BusInner>,
  id: u64,
}

impl Subscription {
  /// Explicit form of drop, for call sites where the intent reads better.
  pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(inner) = self.bus.upgrade() {
      inner.subscribers.lock().retain(|(id, _)| *id != self.id);
    }
  }
}
