// aquashop/src/models/product.rs

use super::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Catalog product as served by `GET /products`.
///
/// Only `name` and `price` are reliably present; everything else is optional
/// so a partial projection (e.g. the join inside a cart row) still
/// deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  #[serde(rename = "_id", alias = "id")]
  pub id: ProductId,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: f64,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub subcategory: Option<String>,
  #[serde(default)]
  pub stock: Option<i64>,
  #[serde(default)]
  pub discount: Option<f64>,
  #[serde(rename = "originalPrice", default)]
  pub original_price: Option<f64>,
}

impl Product {
  /// `price` is the sale price; `original_price` is the struck-through one.
  pub fn has_discount(&self) -> bool {
    self.discount.map_or(false, |d| d > 0.0)
  }

  pub fn in_stock(&self) -> bool {
    self.stock.map_or(true, |s| s > 0)
  }
}

/// Payload for creating or replacing a product through the admin surface.
/// The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub price: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subcategory: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stock: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub discount: Option<f64>,
  #[serde(rename = "originalPrice", skip_serializing_if = "Option::is_none")]
  pub original_price: Option<f64>,
}

impl From<&Product> for ProductDraft {
  fn from(p: &Product) -> Self {
    ProductDraft {
      name: p.name.clone(),
      description: p.description.clone(),
      price: p.price,
      image: p.image.clone(),
      category: p.category.clone(),
      subcategory: p.subcategory.clone(),
      stock: p.stock,
      discount: p.discount,
      original_price: p.original_price,
    }
  }
}

/// A category's subcategory as served by `GET /subcategories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
  #[serde(rename = "_id", alias = "id", default)]
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub category: Option<String>,
}
