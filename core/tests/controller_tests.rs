// tests/controller_tests.rs
mod common; // Reference the common module

use aquashop::{
  CartApi, CartBus, CartController, CartScope, EntryStatus, ProductId, RowId, ScopeStatus,
  SessionContext, StoreError,
};
use common::*;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn full_cart_controller(api: Arc<FakeCartApi>, session: SessionContext) -> CartController {
  CartController::new(api, session, CartBus::new(), CartScope::FullCart)
}

#[tokio::test]
#[serial]
async fn test_mount_loads_scoped_projection() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1"), row("r2", "p1"), row("r3", "p2")]);

  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(ProductId::from("p1")),
  );
  assert_eq!(card.status(), ScopeStatus::Uninitialized);

  card.mount().await.unwrap();

  assert_eq!(card.status(), ScopeStatus::Ready);
  assert_eq!(card.entries().len(), 1);
  assert_eq!(card.quantity_of(&ProductId::from("p1")), 2);
  assert_eq!(card.quantity_of(&ProductId::from("p2")), 0); // out of scope
}

#[tokio::test]
#[serial]
async fn test_mount_without_session_yields_empty_ready_projection() {
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1")]);

  let mut badge = full_cart_controller(Arc::clone(&api), SessionContext::new());
  badge.mount().await.unwrap();

  assert_eq!(badge.status(), ScopeStatus::Ready);
  assert_eq!(badge.badge_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_increment_appends_row_and_publishes() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  let bus = CartBus::new();
  let broadcasts = Arc::new(AtomicUsize::new(0));
  let broadcasts_clone = Arc::clone(&broadcasts);
  let _probe = bus.subscribe(move || {
    broadcasts_clone.fetch_add(1, Ordering::SeqCst);
  });

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    bus,
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  card.increment(&p1).await.unwrap();

  assert_eq!(card.quantity_of(&p1), 1);
  assert_eq!(card.entries()[0].row_ids.len(), 1);
  assert_eq!(card.entries()[0].status, EntryStatus::Idle);
  assert_eq!(broadcasts.load(Ordering::SeqCst), 1);
  assert_eq!(api.row_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_failed_increment_rolls_back_and_stays_silent() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1")]);
  api.fail_next_add();

  let bus = CartBus::new();
  let broadcasts = Arc::new(AtomicUsize::new(0));
  let broadcasts_clone = Arc::clone(&broadcasts);
  let _probe = bus.subscribe(move || {
    broadcasts_clone.fetch_add(1, Ordering::SeqCst);
  });

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    bus,
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  let err = card.increment(&p1).await.unwrap_err();
  assert!(matches!(err, StoreError::Remote { status: 500, .. }));

  // Local quantity is back to the pre-increment value, no broadcast went out.
  assert_eq!(card.quantity_of(&p1), 1);
  assert_eq!(broadcasts.load(Ordering::SeqCst), 0);
  assert_eq!(api.row_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_failed_increment_on_empty_scope_leaves_no_ghost_entry() {
  let api = Arc::new(FakeCartApi::new());
  api.fail_next_add();

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  assert!(card.increment(&p1).await.is_err());
  assert!(card.entries().is_empty());
}

#[tokio::test]
#[serial]
async fn test_decrement_removes_last_added_row_first() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1"), row("r2", "p1"), row("r3", "p1")]);

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  card.decrement(&p1).await.unwrap();
  card.decrement(&p1).await.unwrap();

  assert_eq!(api.removed_rows(), vec![RowId::from("r3"), RowId::from("r2")]);
  assert_eq!(card.quantity_of(&p1), 1);
  assert_eq!(card.entries()[0].row_ids, vec![RowId::from("r1")]);
}

#[tokio::test]
#[serial]
async fn test_failed_decrement_restores_row_and_quantity() {
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1"), row("r2", "p1")]);
  api.fail_next_remove();

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  assert!(card.decrement(&p1).await.is_err());

  assert_eq!(card.quantity_of(&p1), 2);
  assert_eq!(card.entries()[0].row_ids, vec![RowId::from("r1"), RowId::from("r2")]);
  assert_eq!(api.row_count(), 2);
}

#[tokio::test]
#[serial]
async fn test_decrement_of_row_already_gone_converges() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  api.seed_rows(vec![row("r1", "p1"), row("r2", "p1")]);

  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  // Another surface already deleted r2 server-side.
  api.drop_row_silently(&RowId::from("r2"));

  // The stale reference resolves as success, not a user-facing error.
  card.decrement(&p1).await.unwrap();
  assert_eq!(card.quantity_of(&p1), 1);

  // And the projection converges fully on the next resync.
  card.refresh().await.unwrap();
  assert_eq!(card.quantity_of(&p1), 1);
  assert_eq!(api.row_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_decrement_with_no_local_rows_is_a_noop() {
  let api = Arc::new(FakeCartApi::new());
  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  card.decrement(&p1).await.unwrap();
  assert!(api.removed_rows().is_empty());
}

#[tokio::test]
#[serial]
async fn test_mutations_require_a_session() {
  let api = Arc::new(FakeCartApi::new());
  let p1 = ProductId::from("p1");
  let mut card = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    SessionContext::new(),
    CartBus::new(),
    CartScope::Product(p1.clone()),
  );
  card.mount().await.unwrap();

  assert!(matches!(card.increment(&p1).await, Err(StoreError::Unauthenticated)));
  assert!(matches!(card.decrement(&p1).await, Err(StoreError::Unauthenticated)));
}

#[tokio::test]
#[serial]
async fn test_sync_refreshes_only_after_a_broadcast() {
  setup_tracing();
  let api = Arc::new(FakeCartApi::new());
  let bus = CartBus::new();

  let mut badge = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    bus.clone(),
    CartScope::FullCart,
  );
  badge.mount().await.unwrap();

  assert!(!badge.is_stale());
  assert!(!badge.sync().await.unwrap());

  api.seed_rows(vec![row("r1", "p1")]);
  bus.publish();

  assert!(badge.is_stale());
  assert!(badge.sync().await.unwrap());
  assert_eq!(badge.badge_count(), 1);
  assert!(!badge.is_stale());
}

#[tokio::test]
#[serial]
async fn test_unmount_detaches_from_the_bus() {
  let api = Arc::new(FakeCartApi::new());
  let bus = CartBus::new();

  let mut badge = CartController::new(
    Arc::clone(&api) as Arc<dyn CartApi>,
    authenticated_session(),
    bus.clone(),
    CartScope::FullCart,
  );
  badge.mount().await.unwrap();
  assert_eq!(bus.subscriber_count(), 1);

  badge.unmount();
  assert_eq!(bus.subscriber_count(), 0);
  assert_eq!(badge.status(), ScopeStatus::Uninitialized);

  // A later broadcast no longer marks the unmounted controller stale.
  bus.publish();
  assert!(!badge.is_stale());
}
