// aquashop/src/gateway/mod.rs

//! Remote gateways: thin wrappers around the storefront HTTP endpoints.
//!
//! Gateways do network I/O and wire normalization only; no business logic and
//! no local state. The cart and favorites gateways sit behind traits so view
//! controllers can be driven by in-memory fakes in tests.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod http;

pub use auth::AuthGateway;
pub use cart::{CartApi, HttpCartGateway};
pub use catalog::CatalogGateway;
pub use favorites::{FavoritesApi, HttpFavoritesGateway};
pub use http::ApiClient;
