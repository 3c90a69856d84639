// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use aquashop::{CartApi, CartRow, Product, ProductId, Result, RowId, SessionContext, StoreError};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::Mutex;
use tracing::Level;

// --- Tracing setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Session helpers ---

/// Fabricates a JWT-shaped token whose payload decodes to the given claims.
/// No signature: the client never verifies one.
pub fn token_for(email: &str, role: &str) -> String {
  let payload = serde_json::json!({ "email": email, "role": role }).to_string();
  format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(payload))
}

pub fn authenticated_session() -> SessionContext {
  let session = SessionContext::new();
  assert!(session.install_token(&token_for("test@example.com", "user")));
  session
}

// --- Model builders ---

pub fn product(id: &str, name: &str, price: f64) -> Product {
  serde_json::from_value(serde_json::json!({
    "_id": id,
    "name": name,
    "price": price,
  }))
  .expect("product builder json")
}

pub fn row(row_id: &str, product_id: &str) -> CartRow {
  CartRow::bare(row_id, product_id)
}

pub fn row_with_product(row_id: &str, p: &Product) -> CartRow {
  let mut r = CartRow::bare(row_id, p.id.as_str());
  r.product = Some(p.clone());
  r
}

// --- In-memory cart gateway ---

#[derive(Default)]
struct FakeCartState {
  rows: Vec<CartRow>,
  next_row: u64,
  fail_next_add: bool,
  fail_next_remove: bool,
  removed: Vec<RowId>,
}

/// Scriptable stand-in for the HTTP cart gateway. Mirrors the gateway's
/// remove-converges semantics: deleting a row the server no longer has
/// succeeds.
#[derive(Default)]
pub struct FakeCartApi {
  state: Mutex<FakeCartState>,
  catalog: Mutex<Vec<Product>>,
}

impl FakeCartApi {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pre-populates the server-side cart.
  pub fn seed_rows(&self, rows: Vec<CartRow>) {
    let mut state = self.state.lock();
    state.next_row = rows.len() as u64;
    state.rows = rows;
  }

  /// Makes product joins available on rows created by `add_one`.
  pub fn seed_catalog(&self, products: Vec<Product>) {
    *self.catalog.lock() = products;
  }

  pub fn fail_next_add(&self) {
    self.state.lock().fail_next_add = true;
  }

  pub fn fail_next_remove(&self) {
    self.state.lock().fail_next_remove = true;
  }

  /// Drops a row server-side without telling anyone, as another tab would.
  pub fn drop_row_silently(&self, row: &RowId) {
    self.state.lock().rows.retain(|r| &r.row_id != row);
  }

  /// Row removals observed, in order.
  pub fn removed_rows(&self) -> Vec<RowId> {
    self.state.lock().removed.clone()
  }

  pub fn row_count(&self) -> usize {
    self.state.lock().rows.len()
  }
}

#[async_trait]
impl CartApi for FakeCartApi {
  async fn add_one(&self, product: &ProductId) -> Result<RowId> {
    let joined = self
      .catalog
      .lock()
      .iter()
      .find(|p| &p.id == product)
      .cloned();
    let mut state = self.state.lock();
    if state.fail_next_add {
      state.fail_next_add = false;
      return Err(StoreError::Remote {
        status: 500,
        message: "scripted add failure".to_string(),
      });
    }
    state.next_row += 1;
    let row_id = RowId(format!("r{}", state.next_row));
    let mut row = CartRow::bare(row_id.as_str(), product.as_str());
    row.product = joined;
    state.rows.push(row);
    Ok(row_id)
  }

  async fn remove_row(&self, row: &RowId) -> Result<()> {
    let mut state = self.state.lock();
    if state.fail_next_remove {
      state.fail_next_remove = false;
      return Err(StoreError::Remote {
        status: 500,
        message: "scripted remove failure".to_string(),
      });
    }
    state.removed.push(row.clone());
    // Absent row: already satisfied, same as the HTTP gateway's 404 path.
    state.rows.retain(|r| &r.row_id != row);
    Ok(())
  }

  async fn list_rows(&self) -> Result<Vec<CartRow>> {
    Ok(self.state.lock().rows.clone())
  }
}
