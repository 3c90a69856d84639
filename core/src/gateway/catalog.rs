// aquashop/src/gateway/catalog.rs

//! Catalog reads plus the admin product/stock surface.

use crate::error::{Result, StoreError};
use crate::gateway::http::ApiClient;
use crate::models::{Product, ProductDraft, ProductId, Subcategory};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{info, instrument};

/// Route keys mapped to the category names the catalog stores. The two
/// sides currently coincide.
const CATEGORY_MAP: &[(&str, &str)] = &[
  ("chemicals", "chemicals"),
  ("cleaning", "cleaning"),
  ("construction", "construction"),
  ("sauna-spa", "sauna-spa"),
  ("garden", "garden"),
  ("water-systems", "water-systems"),
];

pub fn category_name(key: &str) -> &str {
  CATEGORY_MAP
    .iter()
    .find(|(k, _)| *k == key)
    .map(|(_, name)| *name)
    .unwrap_or(key)
}

pub struct CatalogGateway {
  client: Arc<ApiClient>,
}

impl CatalogGateway {
  pub fn new(client: Arc<ApiClient>) -> Self {
    CatalogGateway { client }
  }

  pub async fn all_products(&self) -> Result<Vec<Product>> {
    self.client.get_json("/products").await
  }

  pub async fn products_by_category(
    &self,
    category: &str,
    subcategory: Option<&str>,
  ) -> Result<Vec<Product>> {
    let category = category_name(category);
    let mut query = vec![("category", category)];
    if let Some(sub) = subcategory {
      query.push(("subcategory", sub));
    }
    self.client.get_json_query("/products", &query).await
  }

  pub async fn product_by_id(&self, id: &ProductId) -> Result<Product> {
    self.client.get_json(&format!("/products/{id}")).await
  }

  /// A random sample of the catalog for the landing page.
  pub async fn featured_products(&self, limit: usize) -> Result<Vec<Product>> {
    let products = self.all_products().await?;
    Ok(sample(products, limit))
  }

  pub async fn all_subcategories(&self) -> Result<Vec<Subcategory>> {
    self.client.get_json("/subcategories").await
  }

  pub async fn subcategories_by_parent(&self, category: &str) -> Result<Vec<Subcategory>> {
    let category = category_name(category);
    self
      .client
      .get_json(&format!("/categories/{category}/subcategories"))
      .await
  }

  // --- Admin surface ---

  #[instrument(skip(self, draft), fields(name = %draft.name), err(Display))]
  pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
    self.client.post_json("/admin/products", draft).await
  }

  #[instrument(skip(self, draft), err(Display))]
  pub async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product> {
    self
      .client
      .put_json(&format!("/admin/products/{id}"), draft)
      .await
  }

  #[instrument(skip(self), err(Display))]
  pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
    let trimmed = id.as_str().trim();
    if trimmed.is_empty() {
      return Err(StoreError::Config("product id is empty".to_string()));
    }
    self.client.delete(&format!("/admin/products/{trimmed}")).await
  }

  /// Stock intake: read-modify-write of the stock field via the admin update
  /// endpoint (there is no dedicated adjustment endpoint).
  #[instrument(skip(self, product), fields(product = %product.id), err(Display))]
  pub async fn add_stock(&self, product: &Product, amount: i64) -> Result<Product> {
    let mut draft = ProductDraft::from(product);
    draft.stock = Some(product.stock.unwrap_or(0) + amount);
    let updated = self.update_product(&product.id, &draft).await?;
    info!(product = %product.id, amount, "stock adjusted");
    Ok(updated)
  }

  pub async fn add_subcategory(&self, name: &str, category: &str) -> Result<Subcategory> {
    let body = serde_json::json!({ "name": name, "category": category_name(category) });
    self.client.post_json("/subcategories", &body).await
  }

  pub async fn delete_subcategory(&self, id: &str) -> Result<()> {
    self.client.delete(&format!("/subcategories/{id}")).await
  }
}

/// Shuffles and takes at most `limit` products. A limit beyond the catalog
/// size returns the whole catalog.
fn sample(mut products: Vec<Product>, limit: usize) -> Vec<Product> {
  products.shuffle(&mut rand::rng());
  products.truncate(limit);
  products
}
