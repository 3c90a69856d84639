// src/lib.rs

//! aquashop: client core for a pool/sauna/water-treatment storefront.
//!
//! The centerpiece is the cart consistency model. The backend stores one row
//! per unit added (an add never increments an existing row), so the client
//! owns:
//!  - read-time aggregation of flat rows into per-product entries,
//!  - an in-tab synchronization bus notifying every mounted cart surface
//!    after a mutating operation,
//!  - per-surface view controllers with optimistic updates, named rollback
//!    transitions, and LIFO row removal.
//!
//! Around that core: typed HTTP gateways for cart, catalog (including the
//! admin product/stock surface), favorites, and credentials; an explicit
//! session context; and a single configuration point for the API base URL.

pub mod cart;
pub mod config;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod models;
pub mod session;

// --- Re-exports for the Public API ---

pub use crate::cart::aggregate::{
  aggregate, projected_subtotal, subtotal, total_item_count, GroupedCartEntry, Subtotal,
};
pub use crate::cart::broadcast::{CartBus, Subscription};
pub use crate::cart::controller::{
  CartController, CartScope, EntryProjection, EntryStatus, ScopeStatus,
};

pub use crate::config::ApiConfig;
pub use crate::error::{Result, StoreError};
pub use crate::favorites::FavoritesController;
pub use crate::gateway::{
  ApiClient, AuthGateway, CartApi, CatalogGateway, FavoritesApi, HttpCartGateway,
  HttpFavoritesGateway,
};
pub use crate::models::{
  CartRow, Favorite, FavoriteId, Product, ProductDraft, ProductId, RowId, Subcategory,
};
pub use crate::session::{
  AuthSession, Claims, CredentialStore, MemoryCredentialStore, SessionContext,
};
