// aquashop/src/gateway/favorites.rs

//! The favorites gateway (`/favorites` endpoints).

use crate::error::{Result, StoreError};
use crate::gateway::http::{created_id, ApiClient};
use crate::models::{Favorite, FavoriteId, ProductId};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;

#[async_trait]
pub trait FavoritesApi: Send + Sync {
  async fn add(&self, product: &ProductId) -> Result<FavoriteId>;
  /// Favorites joined with their product projections.
  async fn list(&self) -> Result<Vec<Favorite>>;
  async fn remove(&self, favorite: &FavoriteId) -> Result<()>;
  /// Dedicated existence check backing the controller's check-then-insert.
  async fn is_favorite(&self, product: &ProductId) -> Result<bool>;
}

pub struct HttpFavoritesGateway {
  client: Arc<ApiClient>,
}

impl HttpFavoritesGateway {
  pub fn new(client: Arc<ApiClient>) -> Self {
    HttpFavoritesGateway { client }
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
impl FavoritesApi for HttpFavoritesGateway {
  #[instrument(skip(self), err(Display))]
  async fn add(&self, product: &ProductId) -> Result<FavoriteId> {
    self.require_session()?;
    let body = json!({ "product_id": product });
    let ack: Value = self.client.post_json("/favorites", &body).await?;
    Ok(FavoriteId(created_id(&ack, "favorite add")?))
  }

  async fn list(&self) -> Result<Vec<Favorite>> {
    self.require_session()?;
    self.client.get_json("/favorites/products").await
  }

  #[instrument(skip(self), err(Display))]
  async fn remove(&self, favorite: &FavoriteId) -> Result<()> {
    self.require_session()?;
    self.client.delete(&format!("/favorites/{favorite}")).await
  }

  async fn is_favorite(&self, product: &ProductId) -> Result<bool> {
    self.require_session()?;
    let ack: Value = self
      .client
      .get_json(&format!("/favorites/check/{product}"))
      .await?;
    Ok(check_flag(&ack))
  }
}

/// The check endpoint answers with either a boolean flag (two observed
/// spellings) or the favorite row itself; read whichever is there.
fn check_flag(ack: &Value) -> bool {
  ack
    .get("isFavorite")
    .or_else(|| ack.get("is_favorite"))
    .and_then(Value::as_bool)
    .unwrap_or_else(|| ack.get("favorite").map(|f| !f.is_null()).unwrap_or(false))
}
