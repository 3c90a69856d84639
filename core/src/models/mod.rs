// aquashop/src/models/mod.rs

//! Data structures for server-owned entities and their identifiers.
//!
//! The backing store is document-oriented: ids arrive as opaque strings under
//! `_id` (sometimes `id`), and joined projections are denormalized into the
//! row. All wire-shape tolerance lives in this module; nothing past it sees
//! the variance.

pub mod cart_row;
pub mod favorite;
pub mod ids;
pub mod product;

pub use cart_row::CartRow;
pub use favorite::Favorite;
pub use ids::{FavoriteId, ProductId, RowId};
pub use product::{Product, ProductDraft, Subcategory};
