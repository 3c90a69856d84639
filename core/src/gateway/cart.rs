// aquashop/src/gateway/cart.rs

//! The remote cart gateway (`/cart` endpoints).
//!
//! The server's contract is one row per unit: `add_one` always creates a new
//! quantity-1 row and never increments an existing one. Grouping rows into
//! per-product quantities is read-time work done by `cart::aggregate`.

use crate::error::{Result, StoreError};
use crate::gateway::http::{created_id, ApiClient};
use crate::models::{CartRow, ProductId, RowId};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Seam between view controllers and the cart endpoints. Implemented over
/// HTTP here and by in-memory fakes in tests.
#[async_trait]
pub trait CartApi: Send + Sync {
  /// Creates exactly one new quantity-1 row for the product under the
  /// current session and returns its id.
  async fn add_one(&self, product: &ProductId) -> Result<RowId>;

  /// Deletes one row. A row the server no longer has counts as success: the
  /// caller's goal state is already satisfied, and surfacing it would only
  /// stall convergence.
  async fn remove_row(&self, row: &RowId) -> Result<()>;

  /// Fetches all rows for the current user, product projections normalized.
  async fn list_rows(&self) -> Result<Vec<CartRow>>;
}

pub struct HttpCartGateway {
  client: Arc<ApiClient>,
}

impl HttpCartGateway {
  pub fn new(client: Arc<ApiClient>) -> Self {
    HttpCartGateway { client }
  }

  fn require_session(&self) -> Result<()> {
    if self.client.session().is_authenticated() {
      Ok(())
    } else {
      Err(StoreError::Unauthenticated)
    }
  }
}

#[async_trait]
impl CartApi for HttpCartGateway {
  #[instrument(skip(self), err(Display))]
  async fn add_one(&self, product: &ProductId) -> Result<RowId> {
    self.require_session()?;
    let body = json!({ "product_id": product, "quantity": 1 });
    let ack: Value = self.client.post_json("/cart/add", &body).await?;
    let row_id = RowId(created_id(&ack, "cart add")?);
    debug!(%product, %row_id, "cart row created");
    Ok(row_id)
  }

  #[instrument(skip(self), err(Display))]
  async fn remove_row(&self, row: &RowId) -> Result<()> {
    self.require_session()?;
    match self.client.delete(&format!("/cart/{row}")).await {
      Ok(()) => Ok(()),
      Err(e) if e.is_status(404) => {
        debug!(%row, "row already gone server-side; treating removal as satisfied");
        Ok(())
      }
      Err(e) => Err(e),
    }
  }

  #[instrument(skip(self), err(Display))]
  async fn list_rows(&self) -> Result<Vec<CartRow>> {
    self.require_session()?;
    self.client.get_json("/cart").await
  }
}
