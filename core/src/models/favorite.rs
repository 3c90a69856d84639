// aquashop/src/models/favorite.rs

use super::cart_row::ProductJoin;
use super::ids::{FavoriteId, ProductId};
use super::product::Product;
use serde::Deserialize;

/// One server-persisted favorite entry. One row per (user, product) pair;
/// duplicate prevention is a check-then-insert done by the controller, not a
/// constraint this type can see.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "FavoriteWire")]
pub struct Favorite {
  pub favorite_id: FavoriteId,
  pub product_id: ProductId,
  /// Product projection joined by `GET /favorites/products`, when available.
  pub product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct FavoriteWire {
  #[serde(rename = "_id", alias = "id")]
  id: FavoriteId,
  product_id: ProductId,
  #[serde(default)]
  product: Option<ProductJoin>,
}

impl From<FavoriteWire> for Favorite {
  fn from(wire: FavoriteWire) -> Self {
    Favorite {
      favorite_id: wire.id,
      product_id: wire.product_id,
      product: ProductJoin::normalize(wire.product),
    }
  }
}
