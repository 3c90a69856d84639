// aquashop/src/favorites.rs

//! Favorites view logic: thin next to the cart (no optimism, no grouping),
//! but the duplicate guard lives here, not in the gateway.

use crate::error::{Result, StoreError};
use crate::gateway::favorites::FavoritesApi;
use crate::models::{Favorite, FavoriteId, Product, ProductId};
use crate::session::SessionContext;
use std::sync::Arc;
use tracing::debug;

pub struct FavoritesController {
  api: Arc<dyn FavoritesApi>,
  session: SessionContext,
}

impl FavoritesController {
  pub fn new(api: Arc<dyn FavoritesApi>, session: SessionContext) -> Self {
    FavoritesController { api, session }
  }

  /// Adds a product to favorites unless it already is one. Returns whether a
  /// new favorite was created.
  ///
  /// The guard is a check-then-insert; two concurrent tabs can still produce
  /// a duplicate row, which the list view tolerates.
  pub async fn add_favorite(&self, product: &ProductId) -> Result<bool> {
    if !self.session.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    if self.api.is_favorite(product).await? {
      debug!(%product, "already a favorite; skipping insert");
      return Ok(false);
    }
    self.api.add(product).await?;
    Ok(true)
  }

  pub async fn remove_favorite(&self, favorite: &FavoriteId) -> Result<()> {
    if !self.session.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    self.api.remove(favorite).await
  }

  pub async fn is_favorite(&self, product: &ProductId) -> Result<bool> {
    if !self.session.is_authenticated() {
      return Ok(false);
    }
    self.api.is_favorite(product).await
  }

  /// Favorites that arrived with a product projection, ready for display.
  /// Rows whose join is missing are skipped the way the favorites page skips
  /// them (a favorite without a product cannot be rendered).
  pub async fn favorites_with_products(&self) -> Result<Vec<(FavoriteId, Product)>> {
    if !self.session.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    let favorites = self.api.list().await?;
    Ok(
      favorites
        .into_iter()
        .filter_map(|f: Favorite| f.product.map(|p| (f.favorite_id, p)))
        .collect(),
    )
  }
}
