// aquashop/src/cart/mod.rs

//! The cart consistency core: read-time aggregation of unit rows, the in-tab
//! synchronization bus, and the per-surface view controllers that keep
//! independently-mounted components convergent with server truth.

pub mod aggregate;
pub mod broadcast;
pub mod controller;

pub use aggregate::{
  aggregate, projected_subtotal, subtotal, total_item_count, GroupedCartEntry, Subtotal,
};
pub use broadcast::{CartBus, Subscription};
pub use controller::{CartController, CartScope, EntryProjection, EntryStatus, ScopeStatus};
