// aquashop/src/cart/controller.rs

//! Per-surface cart view controller.
//!
//! Each mounted UI surface (header badge, product-card stepper, cart page)
//! owns one controller scoped to the slice of the cart it renders. The
//! controller holds a local projection, applies optimistic mutations with
//! named rollback transitions, and converges to server truth by re-fetching
//! and re-aggregating after every broadcast.
//!
//! Consistency is eventual, not transactional: two rapid increments from two
//! surfaces both complete and both broadcast; the resync bounds the
//! divergence window, nothing locks.

use crate::cart::aggregate::{self, GroupedCartEntry};
use crate::cart::broadcast::{CartBus, Subscription};
use crate::error::{Result, StoreError};
use crate::gateway::cart::CartApi;
use crate::models::{Product, ProductId, RowId};
use crate::session::SessionContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// The slice of the cart a controller instance renders.
#[derive(Debug, Clone, PartialEq)]
pub enum CartScope {
  /// A single product's stepper (product card, detail page).
  Product(ProductId),
  /// The whole cart (cart page, header badge).
  FullCart,
}

impl CartScope {
  pub fn covers(&self, product: &ProductId) -> bool {
    match self {
      CartScope::Product(p) => p == product,
      CartScope::FullCart => true,
    }
  }
}

/// Lifecycle of a controller. `Ready` is re-entered after every resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeStatus {
  Uninitialized,
  Loading,
  Ready,
}

/// Per-entry mutation state, making the optimistic window observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
  Idle,
  /// An optimistic mutation is in flight; the local quantity is ahead of (or
  /// behind) confirmed server truth.
  Pending,
  /// A broadcast arrived; the entry is awaiting the next refresh.
  Reconciling,
}

/// The controller's local projection of one grouped entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryProjection {
  pub product_id: ProductId,
  pub quantity: u32,
  pub row_ids: Vec<RowId>,
  pub product: Option<Product>,
  pub status: EntryStatus,
}

impl EntryProjection {
  fn empty(product_id: ProductId) -> Self {
    EntryProjection {
      product_id,
      quantity: 0,
      row_ids: Vec::new(),
      product: None,
      status: EntryStatus::Idle,
    }
  }

  fn from_grouped(entry: GroupedCartEntry) -> Self {
    EntryProjection {
      product_id: entry.product_id,
      quantity: entry.display_quantity,
      row_ids: entry.row_ids,
      product: entry.product,
      status: EntryStatus::Idle,
    }
  }

  // Named transitions of the optimistic state machine. Keeping them here, as
  // methods, is what makes the rollback path a transition instead of ad hoc
  // compensating code at each call site.

  fn begin_increment(&mut self) {
    self.quantity += 1;
    self.status = EntryStatus::Pending;
  }

  fn commit_increment(&mut self, row: RowId) {
    self.row_ids.push(row);
    self.status = EntryStatus::Idle;
  }

  fn rollback_increment(&mut self) {
    self.quantity = self.quantity.saturating_sub(1);
    self.status = EntryStatus::Idle;
  }

  fn begin_decrement(&mut self) -> Option<RowId> {
    let row = self.row_ids.pop()?;
    self.quantity = self.quantity.saturating_sub(1);
    self.status = EntryStatus::Pending;
    Some(row)
  }

  fn commit_decrement(&mut self) {
    self.status = EntryStatus::Idle;
  }

  fn rollback_decrement(&mut self, row: RowId) {
    self.row_ids.push(row);
    self.quantity += 1;
    self.status = EntryStatus::Idle;
  }

  fn mark_reconciling(&mut self) {
    self.status = EntryStatus::Reconciling;
  }
}

/// One mounted cart-aware component's logic.
pub struct CartController {
  api: Arc<dyn CartApi>,
  session: SessionContext,
  bus: CartBus,
  scope: CartScope,
  status: ScopeStatus,
  entries: Vec<EntryProjection>,
  /// Set by the bus callback; drained by [`CartController::sync`].
  stale: Arc<AtomicBool>,
  subscription: Option<Subscription>,
}

impl CartController {
  pub fn new(api: Arc<dyn CartApi>, session: SessionContext, bus: CartBus, scope: CartScope) -> Self {
    CartController {
      api,
      session,
      bus,
      scope,
      status: ScopeStatus::Uninitialized,
      entries: Vec::new(),
      stale: Arc::new(AtomicBool::new(false)),
      subscription: None,
    }
  }

  /// Subscribes to the bus and loads the initial projection. Call once when
  /// the owning surface mounts.
  pub async fn mount(&mut self) -> Result<()> {
    let stale = Arc::clone(&self.stale);
    self.subscription = Some(self.bus.subscribe(move || {
      stale.store(true, Ordering::SeqCst);
    }));
    self.refresh().await
  }

  /// Drops the bus subscription and the projection. After this, broadcasts no
  /// longer touch the instance.
  pub fn unmount(&mut self) {
    self.subscription = None;
    self.entries.clear();
    self.status = ScopeStatus::Uninitialized;
  }

  /// Re-fetches and re-aggregates, replacing the local projection with server
  /// truth. Optimistic-but-unconfirmed state is discarded by construction.
  pub async fn refresh(&mut self) -> Result<()> {
    self.status = ScopeStatus::Loading;
    // Clear before fetching: a broadcast that lands mid-fetch re-marks us
    // stale and the next sync fetches again.
    self.stale.store(false, Ordering::SeqCst);

    if !self.session.is_authenticated() {
      self.entries.clear();
      self.status = ScopeStatus::Ready;
      return Ok(());
    }

    let api = Arc::clone(&self.api);
    let rows = match api.list_rows().await {
      Ok(rows) => rows,
      Err(e) => {
        // Keep the previous projection on a failed resync; it is no staler
        // than it already was.
        self.status = ScopeStatus::Ready;
        return Err(e);
      }
    };

    self.entries = aggregate::aggregate(&rows)
      .into_iter()
      .filter(|entry| self.scope.covers(&entry.product_id))
      .map(EntryProjection::from_grouped)
      .collect();
    self.status = ScopeStatus::Ready;
    debug!(scope = ?self.scope, entries = self.entries.len(), "projection refreshed");
    Ok(())
  }

  /// If a broadcast arrived since the last refresh, re-runs the mount
  /// sequence. Returns whether a resync happened. Surfaces call this from
  /// their event loop; it is the delivery point the bus callback arms.
  pub async fn sync(&mut self) -> Result<bool> {
    if !self.stale.load(Ordering::SeqCst) {
      return Ok(false);
    }
    for entry in &mut self.entries {
      entry.mark_reconciling();
    }
    self.refresh().await?;
    Ok(true)
  }

  /// Optimistic add-one-unit. The local quantity moves first; on gateway
  /// failure it rolls back and no broadcast goes out.
  pub async fn increment(&mut self, product: &ProductId) -> Result<()> {
    if !self.session.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    self.entry_mut_or_insert(product).begin_increment();

    let api = Arc::clone(&self.api);
    match api.add_one(product).await {
      Ok(row_id) => {
        if let Some(entry) = self.entry_mut(product) {
          entry.commit_increment(row_id);
        }
        self.bus.publish();
        Ok(())
      }
      Err(e) => {
        warn!(%product, error = %e, "add-one failed; rolling back optimistic increment");
        if let Some(entry) = self.entry_mut(product) {
          entry.rollback_increment();
        }
        self.prune_empty(product);
        Err(e)
      }
    }
  }

  /// Optimistic remove-one-unit. Targets the most recently added row (the
  /// back of the local row list). With no local row to remove this is a
  /// no-op: the projection already shows zero and deleting blind would race
  /// the resync.
  pub async fn decrement(&mut self, product: &ProductId) -> Result<()> {
    if !self.session.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    let row_id = match self.entry_mut(product).and_then(EntryProjection::begin_decrement) {
      Some(row_id) => row_id,
      None => {
        debug!(%product, "decrement with no local row; nothing to do");
        return Ok(());
      }
    };

    let api = Arc::clone(&self.api);
    match api.remove_row(&row_id).await {
      Ok(()) => {
        if let Some(entry) = self.entry_mut(product) {
          entry.commit_decrement();
        }
        self.prune_empty(product);
        self.bus.publish();
        Ok(())
      }
      Err(e) => {
        warn!(%product, %row_id, error = %e, "row removal failed; rolling back optimistic decrement");
        if let Some(entry) = self.entry_mut(product) {
          entry.rollback_decrement(row_id);
        }
        Err(e)
      }
    }
  }

  // --- Read accessors ---

  pub fn status(&self) -> ScopeStatus {
    self.status
  }

  pub fn scope(&self) -> &CartScope {
    &self.scope
  }

  pub fn entries(&self) -> &[EntryProjection] {
    &self.entries
  }

  pub fn quantity_of(&self, product: &ProductId) -> u32 {
    self
      .entries
      .iter()
      .find(|e| &e.product_id == product)
      .map_or(0, |e| e.quantity)
  }

  /// Total units in scope; for a `FullCart` controller this is the header
  /// badge number.
  pub fn badge_count(&self) -> u32 {
    self.entries.iter().map(|e| e.quantity).sum()
  }

  /// Whether a broadcast has arrived since the last refresh.
  pub fn is_stale(&self) -> bool {
    self.stale.load(Ordering::SeqCst)
  }

  // --- Internals ---

  fn entry_mut(&mut self, product: &ProductId) -> Option<&mut EntryProjection> {
    self.entries.iter_mut().find(|e| &e.product_id == product)
  }

  fn entry_mut_or_insert(&mut self, product: &ProductId) -> &mut EntryProjection {
    if let Some(pos) = self.entries.iter().position(|e| &e.product_id == product) {
      &mut self.entries[pos]
    } else {
      self.entries.push(EntryProjection::empty(product.clone()));
      self.entries.last_mut().expect("entry just pushed")
    }
  }

  /// Drops an entry whose projection went back to zero with no rows left.
  fn prune_empty(&mut self, product: &ProductId) {
    self
      .entries
      .retain(|e| !(&e.product_id == product && e.quantity == 0 && e.row_ids.is_empty()));
  }
}
