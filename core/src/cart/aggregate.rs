// aquashop/src/cart/aggregate.rs

//! Read-time projection of flat unit rows into per-product entries.
//!
//! The server never coalesces rows; the visible quantity of a product is the
//! sum over its rows, and removal targets individual rows. Everything here is
//! a pure function over borrowed input: entries are recomputed from scratch
//! on every pass, never patched in place.

use crate::models::{CartRow, Product, ProductId, RowId};

/// Client-derived grouping of the rows sharing a product. Ephemeral: built
/// fresh on every aggregation pass, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCartEntry {
  pub product_id: ProductId,
  /// Sum of the quantities of the contributing rows.
  pub display_quantity: u32,
  /// Contributing row ids, in server return order. Removal pops from the
  /// back (last added, first removed).
  pub row_ids: Vec<RowId>,
  /// Product projection from the first row that carried one.
  pub product: Option<Product>,
}

/// Groups rows by product in first-seen order. Deterministic for a given
/// input order and content; empty input yields empty output.
pub fn aggregate(rows: &[CartRow]) -> Vec<GroupedCartEntry> {
  let mut entries: Vec<GroupedCartEntry> = Vec::new();
  for row in rows {
    match entries.iter_mut().find(|e| e.product_id == row.product_id) {
      Some(entry) => {
        entry.display_quantity += row.quantity;
        entry.row_ids.push(row.row_id.clone());
        if entry.product.is_none() {
          entry.product = row.product.clone();
        }
      }
      None => entries.push(GroupedCartEntry {
        product_id: row.product_id.clone(),
        display_quantity: row.quantity,
        row_ids: vec![row.row_id.clone()],
        product: row.product.clone(),
      }),
    }
  }
  entries
}

/// Total units across all rows; the header badge number. 0 for an empty cart.
pub fn total_item_count(rows: &[CartRow]) -> u32 {
  rows.iter().map(|r| r.quantity).sum()
}

/// A computed cart subtotal. Entries whose price could not be resolved
/// contribute 0 and are flagged here instead of being silently dropped, so a
/// UI can show "price unavailable" next to the figure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subtotal {
  pub total: f64,
  pub missing_price: Vec<ProductId>,
}

/// Sums `price(product) * quantity` over the entries with the given lookup.
pub fn subtotal<F>(entries: &[GroupedCartEntry], price_of: F) -> Subtotal
where
  F: Fn(&ProductId) -> Option<f64>,
{
  let mut out = Subtotal::default();
  for entry in entries {
    match price_of(&entry.product_id) {
      Some(price) => out.total += price * f64::from(entry.display_quantity),
      None => out.missing_price.push(entry.product_id.clone()),
    }
  }
  out
}

/// Subtotal using each entry's own joined product projection as the price
/// source (the common case, since `GET /cart` returns rows pre-joined).
pub fn projected_subtotal(entries: &[GroupedCartEntry]) -> Subtotal {
  subtotal(entries, |pid| {
    entries
      .iter()
      .find(|e| &e.product_id == pid)
      .and_then(|e| e.product.as_ref())
      .map(|p| p.price)
  })
}
