// aquashop/src/models/cart_row.rs

use super::ids::{ProductId, RowId};
use super::product::Product;
use serde::Deserialize;

/// One server-persisted cart row: a single unit-addition event.
///
/// The server stores one row per add-to-cart call (quantity is written as 1;
/// it never increments an existing row). The visible per-product quantity is
/// the sum over rows, computed client-side by `cart::aggregate`.
///
/// `GET /cart` may join a product projection onto each row as a single
/// object, a one-element array, or not at all. Deserialization normalizes all
/// three into `product: Option<Product>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CartRowWire")]
pub struct CartRow {
  pub row_id: RowId,
  pub product_id: ProductId,
  pub quantity: u32,
  pub product: Option<Product>,
}

impl CartRow {
  /// Bare row without a product join, as used in tests and degraded views.
  pub fn bare(row_id: impl Into<RowId>, product_id: impl Into<ProductId>) -> Self {
    CartRow {
      row_id: row_id.into(),
      product_id: product_id.into(),
      quantity: 1,
      product: None,
    }
  }
}

/// The product join as it appears on the wire: object, array, or absent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductJoin {
  One(Product),
  Many(Vec<Product>),
}

impl ProductJoin {
  pub(crate) fn normalize(join: Option<ProductJoin>) -> Option<Product> {
    match join {
      None => None,
      Some(ProductJoin::One(p)) => Some(p),
      Some(ProductJoin::Many(v)) => v.into_iter().next(),
    }
  }
}

fn one() -> u32 {
  1
}

#[derive(Debug, Deserialize)]
struct CartRowWire {
  #[serde(rename = "_id", alias = "id")]
  id: RowId,
  product_id: ProductId,
  #[serde(default = "one")]
  quantity: u32,
  #[serde(default)]
  product: Option<ProductJoin>,
}

impl From<CartRowWire> for CartRow {
  fn from(wire: CartRowWire) -> Self {
    CartRow {
      row_id: wire.id,
      product_id: wire.product_id,
      quantity: wire.quantity,
      product: ProductJoin::normalize(wire.product),
    }
  }
}
